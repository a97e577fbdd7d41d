use aiagent_core::tool::{FunctionResult, ToolArguments, ToolContext, ToolFunction};
use aiagent_model::ToolDefinition;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

use super::{apply, invert};

const SMOOTH_STRENGTH: f32 = 0.4;

/// Smooths skin while keeping facial features such as eyes and lips sharp.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeautyFilterTool;

impl BeautyFilterTool {
    /// The name the tool is registered under.
    pub const NAME: &'static str = "apply_beauty_filter";

    /// Returns the definition advertised to the model.
    pub fn definition() -> ToolDefinition {
        super::definition(
            Self::NAME,
            "Apply a beauty filter to an image to make it more beautiful",
        )
    }
}

impl ToolFunction for BeautyFilterTool {
    fn call(&self, arguments: &ToolArguments, _context: &ToolContext) -> FunctionResult {
        apply(Self::NAME, arguments, |img| beautify(img, SMOOTH_STRENGTH))
    }
}

/// Blends a blurred copy over the areas away from edges.
///
/// `strength` ranges from `0.0` to `1.0`.
fn beautify(img: &DynamicImage, strength: f32) -> DynamicImage {
    let src = img.to_rgb8();
    let mask = gaussian_blur_f32(&invert(&canny(&img.to_luma8(), 30.0, 90.0)), 1.0);
    let smoothed = gaussian_blur_f32(&src, 1.0 + strength * 2.0);

    let out = RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let weight = f32::from(mask.get_pixel(x, y)[0]) / 255.0;
        let (orig, soft) = (src.get_pixel(x, y), smoothed.get_pixel(x, y));
        Rgb(std::array::from_fn(|c| {
            let v = f32::from(orig[c]) * (1.0 - weight) + f32::from(soft[c]) * weight;
            v.round().clamp(0.0, 255.0) as u8
        }))
    });
    DynamicImage::ImageRgb8(out)
}
