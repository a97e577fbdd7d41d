use aiagent_core::tool::{FunctionResult, ToolArguments, ToolContext, ToolFunction};
use aiagent_model::ToolDefinition;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use super::{apply, invert};

/// Converts a color image to grayscale and traces its edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrayEdgesTool;

impl GrayEdgesTool {
    /// The name the tool is registered under.
    pub const NAME: &'static str = "convert_color_img_to_gray_img";

    /// Returns the definition advertised to the model.
    pub fn definition() -> ToolDefinition {
        super::definition(
            Self::NAME,
            "Convert a color image to a grayscale image and perform edge detection",
        )
    }
}

impl ToolFunction for GrayEdgesTool {
    fn call(&self, arguments: &ToolArguments, _context: &ToolContext) -> FunctionResult {
        apply(Self::NAME, arguments, gray_edges)
    }
}

fn gray_edges(img: &DynamicImage) -> DynamicImage {
    let blurred = gaussian_blur_f32(&img.to_luma8(), 0.8);
    let edges = invert(&canny(&blurred, 40.0, 100.0));
    let out = GrayImage::from_fn(blurred.width(), blurred.height(), |x, y| {
        Luma([blurred.get_pixel(x, y)[0].min(edges.get_pixel(x, y)[0])])
    });
    DynamicImage::ImageLuma8(out)
}

#[cfg(test)]
mod tests {
    use image::{ColorType, Rgb, RgbImage};

    use super::*;
    use crate::tools::filters::tests::run_on_sample;

    #[test]
    fn test_gray_edges() {
        let output = run_on_sample(&GrayEdgesTool, GrayEdgesTool::NAME);
        assert_eq!(output.color(), ColorType::L8);
    }

    #[test]
    fn test_edges_are_dark() {
        let img = RgbImage::from_fn(40, 40, |x, _| {
            if x < 20 { Rgb([100, 100, 100]) } else { Rgb([200, 200, 200]) }
        });
        let out = gray_edges(&DynamicImage::ImageRgb8(img)).to_luma8();
        assert!(out.get_pixel(5, 20)[0] > 80);
        assert!(out.get_pixel(35, 20)[0] > 180);
        assert!((17..23).any(|x| out.get_pixel(x, 20)[0] == 0));
    }
}
