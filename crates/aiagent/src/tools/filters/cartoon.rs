use aiagent_core::tool::{FunctionResult, ToolArguments, ToolContext, ToolFunction};
use aiagent_model::ToolDefinition;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::median_filter;

use super::apply;

const EDGE_THRESHOLD: f32 = 10.0;
const COLOR_STEP: u8 = 32;

/// Flattens colors and draws dark outlines.
#[derive(Clone, Copy, Debug, Default)]
pub struct CartoonFilterTool;

impl CartoonFilterTool {
    /// The name the tool is registered under.
    pub const NAME: &'static str = "apply_cartoon_filter";

    /// Returns the definition advertised to the model.
    pub fn definition() -> ToolDefinition {
        super::definition(
            Self::NAME,
            "Apply a cartoon filter to an image to make it look like a cartoon",
        )
    }
}

impl ToolFunction for CartoonFilterTool {
    fn call(&self, arguments: &ToolArguments, _context: &ToolContext) -> FunctionResult {
        apply(Self::NAME, arguments, cartoonify)
    }
}

fn cartoonify(img: &DynamicImage) -> DynamicImage {
    let gray = median_filter(&img.to_luma8(), 3, 3);
    let edges = canny(&gray, EDGE_THRESHOLD / 2.0, EDGE_THRESHOLD);
    let smooth = median_filter(&img.to_rgb8(), 2, 2);

    let out = RgbImage::from_fn(smooth.width(), smooth.height(), |x, y| {
        if edges.get_pixel(x, y)[0] > 0 {
            return Rgb([0, 0, 0]);
        }
        let px = smooth.get_pixel(x, y);
        Rgb(px.0.map(posterize))
    });
    DynamicImage::ImageRgb8(out)
}

/// Snaps a channel to the middle of its color band.
#[inline]
fn posterize(v: u8) -> u8 {
    v / COLOR_STEP * COLOR_STEP + COLOR_STEP / 2
}
