//! A set of built-in tools that models can use.

mod filters;
mod weather;

use aiagent_core::OrchestratorBuilder;

pub use filters::{BeautyFilterTool, CartoonFilterTool, CyberpunkTool, GrayEdgesTool};
pub use weather::WeatherTool;

/// Registers every built-in tool on `builder`.
pub fn with_builtin_tools(builder: OrchestratorBuilder) -> OrchestratorBuilder {
    builder
        .with_tool(WeatherTool::NAME, WeatherTool::definition(), WeatherTool)
        .with_tool(
            GrayEdgesTool::NAME,
            GrayEdgesTool::definition(),
            GrayEdgesTool,
        )
        .with_tool(
            BeautyFilterTool::NAME,
            BeautyFilterTool::definition(),
            BeautyFilterTool,
        )
        .with_tool(
            CartoonFilterTool::NAME,
            CartoonFilterTool::definition(),
            CartoonFilterTool,
        )
        .with_tool(
            CyberpunkTool::NAME,
            CyberpunkTool::definition(),
            CyberpunkTool,
        )
}

#[cfg(test)]
mod tests {
    use aiagent_core::ConfigBuilder;
    use aiagent_test_model::ScriptedTransport;

    use super::*;

    #[test]
    fn test_builtin_tools() {
        let builder = OrchestratorBuilder::with_transport(
            ConfigBuilder::with_api_key("sk-test").build(),
            ScriptedTransport::new(),
        );
        let orchestrator = with_builtin_tools(builder).build();
        let names: Vec<_> = orchestrator
            .tool_definitions()
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "get_current_weather",
                "convert_color_img_to_gray_img",
                "apply_beauty_filter",
                "apply_cartoon_filter",
                "convert_image_to_cyberpunk_style",
            ]
        );
    }
}
