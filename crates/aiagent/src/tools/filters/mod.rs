//! Filters that read an image from disk and write the result next to it.
//!
//! Every tool takes a single `src_img` path and answers with the path of
//! the written file, `<src_dir>/output_<n>.jpg`.

mod beauty;
mod cartoon;
mod cyberpunk;
mod gray;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use aiagent_core::tool::{FunctionResult, ToolArguments};
use aiagent_model::{ArgValue, ToolDefinition};
use image::{DynamicImage, GrayImage, ImageResult, Luma};

pub use beauty::BeautyFilterTool;
pub use cartoon::CartoonFilterTool;
pub use cyberpunk::CyberpunkTool;
pub use gray::GrayEdgesTool;

const SRC_IMG: &str = "src_img";

fn definition(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description).with_parameter(
        SRC_IMG,
        "string",
        "The source image file path",
        true,
    )
}

/// Loads `src_img`, runs `filter` over it and saves the result.
fn apply<F>(name: &str, arguments: &ToolArguments, filter: F) -> FunctionResult
where
    F: FnOnce(&DynamicImage) -> DynamicImage,
{
    let src = match arguments.get(SRC_IMG) {
        None => {
            error!("{name}: missing '{SRC_IMG}' parameter");
            return FunctionResult::failure("Missing 'src_img' parameter");
        }
        Some(ArgValue::String(src)) => Path::new(src),
        Some(_) => {
            error!("{name}: invalid '{SRC_IMG}' parameter type");
            return FunctionResult::failure("Invalid 'src_img' parameter type");
        }
    };
    let Some(dst) = output_path(src) else {
        error!("{name}: no parent directory for {}", src.display());
        return FunctionResult::failure("Failed to resolve the directory of 'src_img'");
    };

    match process(src, &dst, filter) {
        Ok(()) => {
            info!("{name}: saved {}", dst.display());
            FunctionResult::success(dst.to_string_lossy().into_owned())
        }
        Err(err) => {
            error!("{name}: failed to process {}: {err}", src.display());
            FunctionResult::failure(format!("{name} failed: {err}"))
        }
    }
}

fn process<F>(src: &Path, dst: &Path, filter: F) -> ImageResult<()>
where
    F: FnOnce(&DynamicImage) -> DynamicImage,
{
    let img = image::open(src)?;
    filter(&img).save(dst)
}

fn output_path(src: &Path) -> Option<PathBuf> {
    let dir = src.parent().filter(|dir| !dir.as_os_str().is_empty())?;
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    Some(dir.join(format!("output_{}.jpg", millis % 100_000)))
}

/// Inverts an edge map: edges turn black, everything else white.
fn invert(edges: &GrayImage) -> GrayImage {
    GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
        Luma([255 - edges.get_pixel(x, y)[0]])
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use aiagent_core::tool::{ToolContext, ToolFunction, parse_arguments};
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    use super::*;

    /// Writes a small colorful image into a fresh directory.
    pub(crate) fn sample_image() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        let img = RgbImage::from_fn(48, 32, |x, y| {
            if (12..36).contains(&x) && (8..24).contains(&y) {
                Rgb([220, 40, 40])
            } else {
                Rgb([(x * 5) as u8, (y * 7) as u8, 128])
            }
        });
        img.save(&path).unwrap();
        (dir, path)
    }

    pub(crate) fn call<T: ToolFunction>(
        tool: &T,
        name: &str,
        raw: &str,
    ) -> FunctionResult {
        let arguments = parse_arguments(raw).unwrap();
        tool.call(&arguments, &ToolContext::new(name, "call_1"))
    }

    /// Runs `tool` over the sample image and returns the decoded output.
    pub(crate) fn run_on_sample<T: ToolFunction>(tool: &T, name: &str) -> DynamicImage {
        let (dir, src) = sample_image();
        let raw = src_arguments(&src);
        let result = call(tool, name, &raw);
        assert!(result.is_success(), "{}", result.description);

        let dst = match result.value {
            Some(ArgValue::String(dst)) => PathBuf::from(dst),
            other => panic!("expected a path, got {other:?}"),
        };
        assert_eq!(dst.parent(), Some(dir.path()));
        let file_name = dst.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("output_"));
        assert!(file_name.ends_with(".jpg"));

        let output = image::open(&dst).unwrap();
        assert_eq!((output.width(), output.height()), (48, 32));
        output
    }

    fn src_arguments(path: &Path) -> String {
        format!(r#"{{"src_img":"{}"}}"#, path.display())
    }

    #[test]
    fn test_argument_errors() {
        let result = call(&GrayEdgesTool, GrayEdgesTool::NAME, "{}");
        assert_eq!(result.code, -1);
        assert_eq!(result.description, "Missing 'src_img' parameter");

        let result = call(&CyberpunkTool, CyberpunkTool::NAME, r#"{"src_img":42}"#);
        assert_eq!(result.description, "Invalid 'src_img' parameter type");

        let result = call(
            &CartoonFilterTool,
            CartoonFilterTool::NAME,
            r#"{"src_img":"cat.jpg"}"#,
        );
        assert_eq!(
            result.description,
            "Failed to resolve the directory of 'src_img'"
        );
    }

    #[test]
    fn test_unreadable_image() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("missing.png");
        let result = call(
            &BeautyFilterTool,
            BeautyFilterTool::NAME,
            &src_arguments(&src),
        );
        assert!(!result.is_success());
        assert!(result.description.starts_with("apply_beauty_filter failed"));
    }

    #[test]
    fn test_output_path() {
        let dst = output_path(Path::new("/tmp/photos/cat.png")).unwrap();
        assert_eq!(dst.parent(), Some(Path::new("/tmp/photos")));
        assert!(output_path(Path::new("cat.png")).is_none());
    }

    #[test]
    fn test_invert() {
        let edges = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 255 } else { 0 }]));
        let inverted = invert(&edges);
        assert_eq!(inverted.get_pixel(0, 0)[0], 0);
        assert_eq!(inverted.get_pixel(1, 0)[0], 255);
    }
}
