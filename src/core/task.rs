//! Image task definition.

use std::path::PathBuf;
use crate::utils::ImageFormat;

/// Target pixel dimensions of a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
}

/// How a single image gets re-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    /// Output format, `None` when the source format has no re-encoding
    pub format: Option<ImageFormat>,
    /// `None` when the source dimensions are unknown
    pub resize: Option<ResizePlan>,
    /// Encoder quality, 30 to 90
    pub quality: u8,
}

/// Represents a single image commit.
///
/// Contains the source path, both candidate output paths and the encode
/// settings for processing one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    /// Path to the source image file
    pub input_path: PathBuf,
    /// Where a reduced image is written, extension matching the output format
    pub primary_output: PathBuf,
    /// Where the original is copied when no reduction is committed
    pub fallback_output: PathBuf,
    pub settings: EncodeSettings,
}
