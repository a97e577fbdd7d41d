use aiagent_core::tool::{FunctionResult, ToolArguments, ToolContext, ToolFunction};
use aiagent_model::ToolDefinition;
use image::{DynamicImage, Rgb};

use super::apply;

const SHADOW: [f32; 3] = [12.0, 16.0, 72.0];
const MIDTONE: [f32; 3] = [214.0, 38.0, 176.0];
const HIGHLIGHT: [f32; 3] = [110.0, 236.0, 255.0];
const CONTRAST: f32 = 1.3;
/// Share of the original color kept in the output.
const DETAIL: f32 = 0.25;

/// Recolors an image with neon shadows and highlights.
#[derive(Clone, Copy, Debug, Default)]
pub struct CyberpunkTool;

impl CyberpunkTool {
    /// The name the tool is registered under.
    pub const NAME: &'static str = "convert_image_to_cyberpunk_style";

    /// Returns the definition advertised to the model.
    pub fn definition() -> ToolDefinition {
        super::definition(Self::NAME, "Convert an image to cyberpunk style")
    }
}

impl ToolFunction for CyberpunkTool {
    fn call(&self, arguments: &ToolArguments, _context: &ToolContext) -> FunctionResult {
        apply(Self::NAME, arguments, cyberpunk)
    }
}

fn cyberpunk(img: &DynamicImage) -> DynamicImage {
    let mut out = img.to_rgb8();
    for px in out.pixels_mut() {
        *px = recolor(*px);
    }
    DynamicImage::ImageRgb8(out)
}

fn recolor(px: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = px.0.map(f32::from);
    let luma = (0.2126 * r + 0.7152 * g + 0.0722 * b) / 255.0;
    let luma = ((luma - 0.5) * CONTRAST + 0.5).clamp(0.0, 1.0);

    let tone = if luma < 0.5 {
        mix(SHADOW, MIDTONE, luma * 2.0)
    } else {
        mix(MIDTONE, HIGHLIGHT, (luma - 0.5) * 2.0)
    };
    let tone = mix(tone, [r, g, b], DETAIL);
    Rgb(tone.map(|v| v.round().clamp(0.0, 255.0) as u8))
}

#[inline]
fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    std::array::from_fn(|c| a[c] + (b[c] - a[c]) * t)
}
