// src/processing/libvips/resize.rs

//! Exact-size resize mapped onto libvips operations.

use libvips::{ops, VipsImage};
use crate::utils::OptimizerError;

type Result<T> = std::result::Result<T, OptimizerError>;

/// Resizes `image` to exactly `width`×`height`.
///
/// Returns the image unchanged when it already has that size. Uses
/// `thumbnail_image` so libvips can apply its shrink-on-load optimisation;
/// the planner has already fixed the aspect ratio, so the size is forced.
pub fn resize_exact(image: VipsImage, width: u32, height: u32) -> Result<VipsImage> {
    if image.get_width() == width as i32 && image.get_height() == height as i32 {
        return Ok(image);
    }

    use ops::{Size, ThumbnailImageOptions};

    let opts = ThumbnailImageOptions {
        height: height as i32,
        size: Size::Force,
        ..ThumbnailImageOptions::default()
    };

    ops::thumbnail_image_with_opts(&image, width as i32, &opts)
        .map_err(|e| OptimizerError::processing(format!("Resize to {width}x{height} failed: {e}")))
}
