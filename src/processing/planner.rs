//! Pure planning: target size, quality, output format and output paths.

use std::path::{Path, PathBuf};
use crate::core::{PngOutputFormat, ResizePlan};
use crate::utils::ImageFormat;

pub const MIN_QUALITY: u8 = 30;
pub const MAX_QUALITY: u8 = 90;

/// Scales the source size by `rate`, clamps the width to `max_width` and
/// derives the height from the width actually applied.
///
/// Returns `None` when the source size is unknown.
pub fn plan_resize(
    source_width: Option<u32>,
    source_height: Option<u32>,
    rate: f64,
    max_width: Option<u32>,
) -> Option<ResizePlan> {
    let (width, height) = match (source_width, source_height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return None,
    };

    let scaled = ((width as f64 * rate).round() as u32).max(1);
    let limited = match max_width {
        Some(max) => scaled.min(max),
        None => scaled,
    };

    // Recomputed so the max-width clamp keeps the aspect ratio.
    let applied = limited as f64 / width as f64;
    let target_height = ((height as f64 * applied).round() as u32).max(1);

    Some(ResizePlan { width: limited, height: target_height })
}

/// Encoder quality for a rate: `round(rate * 100)` kept within 30..=90.
pub fn clamp_quality(rate: f64) -> u8 {
    (rate * 100.0)
        .round()
        .clamp(MIN_QUALITY as f64, MAX_QUALITY as f64) as u8
}

/// PNG follows the configured format; other re-encodable formats keep
/// their own; TIFF and GIF have no re-encoding.
pub fn resolve_output_format(source: ImageFormat, png_output: PngOutputFormat) -> Option<ImageFormat> {
    match source {
        ImageFormat::Png => Some(png_output.target()),
        other if other.is_reencodable() => Some(other),
        _ => None,
    }
}

/// Output locations of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Written when a reduction is committed
    pub primary: PathBuf,
    /// Original relative path, written when the original is copied
    pub fallback: PathBuf,
}

pub fn output_paths(
    output_dir: &Path,
    relative: &Path,
    source_format: ImageFormat,
    output_format: Option<ImageFormat>,
) -> OutputPaths {
    let fallback = output_dir.join(relative);
    let primary = match output_format {
        Some(format) if format != source_format => {
            fallback.with_extension(format.primary_extension())
        }
        _ => fallback.clone(),
    };

    OutputPaths { primary, fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scales_by_rate() {
        assert_eq!(
            plan_resize(Some(1000), Some(800), 0.5, None),
            Some(ResizePlan { width: 500, height: 400 })
        );
    }

    #[test]
    fn unknown_dimensions_yield_no_plan() {
        assert_eq!(plan_resize(None, Some(10), 0.5, None), None);
        assert_eq!(plan_resize(Some(10), None, 0.5, None), None);
        assert_eq!(plan_resize(Some(0), Some(10), 0.5, None), None);
    }

    #[test]
    fn max_width_drives_height() {
        // 4000 * 0.9 = 3600 > 1200, so height follows 1200 / 4000, not 0.9
        assert_eq!(
            plan_resize(Some(4000), Some(3000), 0.9, Some(1200)),
            Some(ResizePlan { width: 1200, height: 900 })
        );
        // Below the clamp the max width is irrelevant
        assert_eq!(
            plan_resize(Some(1000), Some(500), 0.5, Some(1200)),
            Some(ResizePlan { width: 500, height: 250 })
        );
    }

    #[test]
    fn never_below_one_pixel() {
        assert_eq!(
            plan_resize(Some(1), Some(3000), 0.01, None),
            Some(ResizePlan { width: 1, height: 3000 })
        );
        assert_eq!(
            plan_resize(Some(3000), Some(1), 0.01, None),
            Some(ResizePlan { width: 30, height: 1 })
        );
    }

    #[test]
    fn quality_floor_and_ceiling() {
        assert_eq!(clamp_quality(0.5), 50);
        assert_eq!(clamp_quality(0.1), 30);
        assert_eq!(clamp_quality(1.0), 90);
        assert_eq!(clamp_quality(0.76), 76);
    }

    #[test]
    fn output_format_mapping() {
        use ImageFormat::*;
        assert_eq!(resolve_output_format(Png, PngOutputFormat::Native), Some(Png));
        assert_eq!(resolve_output_format(Png, PngOutputFormat::WebP), Some(WebP));
        assert_eq!(resolve_output_format(Png, PngOutputFormat::Avif), Some(Avif));
        assert_eq!(resolve_output_format(Jpeg, PngOutputFormat::Avif), Some(Jpeg));
        assert_eq!(resolve_output_format(Heif, PngOutputFormat::WebP), Some(Heif));
        assert_eq!(resolve_output_format(Gif, PngOutputFormat::Native), None);
        assert_eq!(resolve_output_format(Tiff, PngOutputFormat::WebP), None);
    }

    #[test]
    fn extension_rewritten_only_for_converted_png() {
        let out = Path::new("/out");
        let paths = output_paths(out, Path::new("a/b.png"), ImageFormat::Png, Some(ImageFormat::WebP));
        assert_eq!(paths.primary, PathBuf::from("/out/a/b.webp"));
        assert_eq!(paths.fallback, PathBuf::from("/out/a/b.png"));

        let paths = output_paths(out, Path::new("c.JPG"), ImageFormat::Jpeg, Some(ImageFormat::Jpeg));
        assert_eq!(paths.primary, PathBuf::from("/out/c.JPG"));
        assert_eq!(paths.primary, paths.fallback);

        let paths = output_paths(out, Path::new("d.gif"), ImageFormat::Gif, None);
        assert_eq!(paths.primary, paths.fallback);
    }

    proptest! {
        #[test]
        fn quality_is_bounded_and_monotonic(a in 0.0001f64..=1.0, b in 0.0001f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (q_lo, q_hi) = (clamp_quality(lo), clamp_quality(hi));
            prop_assert!((MIN_QUALITY..=MAX_QUALITY).contains(&q_lo));
            prop_assert!((MIN_QUALITY..=MAX_QUALITY).contains(&q_hi));
            prop_assert!(q_lo <= q_hi);
        }

        #[test]
        fn aspect_ratio_is_preserved(w in 1u32..10_000, h in 1u32..10_000, rate in 0.01f64..=1.0) {
            let plan = plan_resize(Some(w), Some(h), rate, None).unwrap();
            let applied = plan.width as f64 / w as f64;
            // Height is within rounding (or the 1px floor) of the applied ratio
            let expected = h as f64 * applied;
            prop_assert!((plan.height as f64 - expected).abs() <= 0.5 || plan.height == 1);
            prop_assert!(plan.width >= 1 && plan.height >= 1);
        }

        #[test]
        fn clamped_width_is_exact(w in 100u32..10_000, h in 1u32..10_000, rate in 0.5f64..=1.0, max in 1u32..50) {
            let plan = plan_resize(Some(w), Some(h), rate, Some(max)).unwrap();
            prop_assert_eq!(plan.width, max);
            let expected = ((h as f64 * (max as f64 / w as f64)).round() as u32).max(1);
            prop_assert_eq!(plan.height, expected);
        }
    }
}
