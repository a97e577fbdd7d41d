use aiagent_core::tool::{FunctionResult, ToolArguments, ToolContext, ToolFunction};
use aiagent_model::{ArgValue, ToolDefinition};

/// A demo tool that reports a fixed temperature for any location.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeatherTool;

impl WeatherTool {
    /// The name the tool is registered under.
    pub const NAME: &'static str = "get_current_weather";

    /// Returns the definition advertised to the model.
    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(Self::NAME, "Get the current weather in a given location")
            .with_parameter(
                "location",
                "string",
                "The city and state, e.g. San Francisco, CA",
                true,
            )
            .with_parameter(
                "unit",
                "string",
                "The unit of temperature, either 'celsius' or 'fahrenheit'",
                true,
            )
    }
}

impl ToolFunction for WeatherTool {
    fn call(&self, arguments: &ToolArguments, _context: &ToolContext) -> FunctionResult {
        let Some(location) = arguments.get("location").and_then(ArgValue::as_str) else {
            return FunctionResult::failure("Invalid or missing 'location' parameter");
        };
        let Some(unit) = arguments.get("unit").and_then(ArgValue::as_str) else {
            return FunctionResult::failure("Invalid or missing 'unit' parameter");
        };
        info!("returning dummy weather data for {location}");
        FunctionResult::success(format!("{location} weather is 25 degrees {unit}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(raw: &str) -> FunctionResult {
        let arguments = aiagent_core::tool::parse_arguments(raw).unwrap();
        let context = ToolContext::new(WeatherTool::NAME, "call_1");
        WeatherTool.call(&arguments, &context)
    }

    #[test]
    fn test_weather() {
        let result = call(r#"{"location":"Paris","unit":"celsius"}"#);
        assert!(result.is_success());
        assert_eq!(
            result.value,
            Some(ArgValue::from("Paris weather is 25 degrees celsius"))
        );
    }

    #[test]
    fn test_invalid_arguments() {
        let result = call(r#"{"unit":"celsius"}"#);
        assert_eq!(result.code, -1);
        assert_eq!(result.description, "Invalid or missing 'location' parameter");

        let result = call(r#"{"location":"Paris","unit":1}"#);
        assert_eq!(result.description, "Invalid or missing 'unit' parameter");
    }

    #[test]
    fn test_definition() {
        let definition = WeatherTool::definition();
        assert_eq!(definition.name, "get_current_weather");
        assert_eq!(definition.parameters.required, vec!["location", "unit"]);
    }
}
