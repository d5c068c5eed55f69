// src/processing/libvips/formats.rs

//! Maps output format and quality to libvips format-specific buffer savers.

use libvips::ops::{self, ForeignHeifCompression, ForeignKeep, ForeignSubsample};
use libvips::VipsImage;
use crate::utils::{ImageFormat, OptimizerError};

type Result<T> = std::result::Result<T, OptimizerError>;

const PNG_COMPRESSION: i32 = 9; // 0-9, zlib level
const PNG_EFFORT: i32 = 7;
const WEBP_EFFORT: i32 = 4;
const AVIF_EFFORT: i32 = 4;
const HEIF_EFFORT: i32 = 4;

/// Encodes `image` as JPEG with mozjpeg-style settings.
pub fn encode_jpeg(image: &VipsImage, quality: u8) -> Result<Vec<u8>> {
    let opts = ops::JpegsaveBufferOptions {
        q: quality as i32,
        optimize_coding: true,
        optimize_scans: true,
        trellis_quant: true,
        overshoot_deringing: true,
        // quant_table 3 = mozjpeg quantisation table (higher quality at same byte count)
        quant_table: 3,
        subsample_mode: ForeignSubsample::On, // 4:2:0 chroma subsampling
        keep: ForeignKeep::None,              // strip metadata
        ..ops::JpegsaveBufferOptions::default()
    };

    ops::jpegsave_buffer_with_opts(image, &opts)
        .map_err(|e| OptimizerError::processing(format!("JPEG encode failed: {e}")))
}

/// Encodes `image` as PNG with palette quantisation at `quality`.
pub fn encode_png(image: &VipsImage, quality: u8) -> Result<Vec<u8>> {
    let opts = ops::PngsaveBufferOptions {
        compression: PNG_COMPRESSION,
        palette: true,
        q: quality as i32,
        effort: PNG_EFFORT,
        keep: ForeignKeep::None,
        ..ops::PngsaveBufferOptions::default()
    };

    ops::pngsave_buffer_with_opts(image, &opts)
        .map_err(|e| OptimizerError::processing(format!("PNG encode failed: {e}")))
}

/// Encodes `image` as lossy WebP.
pub fn encode_webp(image: &VipsImage, quality: u8) -> Result<Vec<u8>> {
    let q = quality as i32;
    let opts = ops::WebpsaveBufferOptions {
        q,
        lossless: false,
        alpha_q: q,             // alpha quality matches overall quality
        effort: WEBP_EFFORT,
        smart_subsample: false,
        keep: ForeignKeep::None,
        ..ops::WebpsaveBufferOptions::default()
    };

    ops::webpsave_buffer_with_opts(image, &opts)
        .map_err(|e| OptimizerError::processing(format!("WebP encode failed: {e}")))
}

/// Encodes `image` in a HEIF container, AV1 for AVIF and HEVC for HEIC.
pub fn encode_heif(image: &VipsImage, quality: u8, compression: ForeignHeifCompression) -> Result<Vec<u8>> {
    let effort = match compression {
        ForeignHeifCompression::Av1 => AVIF_EFFORT,
        _ => HEIF_EFFORT,
    };

    let opts = ops::HeifsaveBufferOptions {
        q: quality as i32,
        lossless: false,
        compression,
        effort,
        subsample_mode: ForeignSubsample::On, // 4:2:0
        keep: ForeignKeep::None,
        ..ops::HeifsaveBufferOptions::default()
    };

    ops::heifsave_buffer_with_opts(image, &opts)
        .map_err(|e| OptimizerError::processing(format!("HEIF encode failed: {e}")))
}

/// Dispatches to the correct encoder based on `format`.
pub fn encode_as(image: &VipsImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(image, quality),
        ImageFormat::Png => encode_png(image, quality),
        ImageFormat::WebP => encode_webp(image, quality),
        ImageFormat::Avif => encode_heif(image, quality, ForeignHeifCompression::Av1),
        ImageFormat::Heif => encode_heif(image, quality, ForeignHeifCompression::Hevc),
        other => Err(OptimizerError::format(format!("Unsupported for re-encode: {other}"))),
    }
}
