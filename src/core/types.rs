//! Core types for the run configuration and per-file results.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use chrono::{DateTime, Utc};
use crate::utils::{ImageFormat, OptimizerError, ValidationError};

/// File name of the progress record kept in each source directory.
pub const METADATA_FILE_NAME: &str = ".image-shrink.json";

/// What PNG sources are written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngOutputFormat {
    /// PNG stays PNG
    #[default]
    Native,
    /// PNG becomes lossy WebP
    WebP,
    /// PNG becomes lossy AVIF
    Avif,
}

impl PngOutputFormat {
    pub fn target(&self) -> ImageFormat {
        match self {
            Self::Native => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
            Self::Avif => ImageFormat::Avif,
        }
    }
}

impl FromStr for PngOutputFormat {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" | "png" => Ok(Self::Native),
            "webp" => Ok(Self::WebP),
            "avif" => Ok(Self::Avif),
            other => Err(ValidationError::settings(format!(
                "Invalid PNG output format: {other}. Expected native, webp or avif"
            ))
            .into()),
        }
    }
}

/// Where the "since" instant of a run comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselineOverride {
    /// Use the persisted progress record
    #[default]
    Persisted,
    /// Explicit instant given on the command line
    Since(DateTime<Utc>),
    /// The instant the run started; also forces the record to be written
    FromNow,
}

/// What a run does, decided from SOURCE and the watch flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// One image, no progress record
    SingleFile(PathBuf),
    Batch,
    Watch,
}

/// Validated, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Reduction rate in (0, 1]
    pub rate: f64,
    pub max_output_width: Option<u32>,
    pub png_output_format: PngOutputFormat,
    pub baseline: BaselineOverride,
    /// Watch mode cycle interval
    pub interval: Duration,
    pub metadata_path: PathBuf,
    /// Upper bound for encoding a single file
    pub file_timeout: Option<Duration>,
}

impl RunConfig {
    pub fn default_metadata_path(source_dir: &Path) -> PathBuf {
        source_dir.join(METADATA_FILE_NAME)
    }
}

/// An image found below the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// Path relative to the source directory
    pub relative: PathBuf,
    pub modified_at: DateTime<Utc>,
}

/// Which file ended up at the output location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitDecision {
    /// The re-encoded candidate was strictly smaller and was committed
    Reduced,
    /// The candidate was not smaller, so the original was copied
    Fallback,
    /// The format has no re-encoding, so the original was copied
    Passthrough,
}

/// Result of committing one image.
///
/// Contains the original and written file information along with
/// compression statistics.
#[derive(Debug, Clone)]
pub struct CommitReport {
    /// Path to the original input file
    pub original_path: PathBuf,
    /// Path that was actually written
    pub written_path: PathBuf,
    /// Original file size in bytes
    pub original_size: u64,
    /// Written file size in bytes
    pub optimized_size: u64,
    pub decision: CommitDecision,
}

impl CommitReport {
    /// Bytes saved (never negative, the commit refuses to grow a file)
    pub fn saved_bytes(&self) -> u64 {
        self.original_size.saturating_sub(self.optimized_size)
    }

    /// Savings as a percentage of the original size
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.original_size as f64 * 100.0
    }
}

/// Outcome of one candidate within a cycle.
#[derive(Debug)]
pub enum FileOutcome {
    Committed(CommitReport),
    Failed(OptimizerError),
}

#[derive(Debug)]
pub struct FileReport {
    pub relative: PathBuf,
    pub modified_at: Option<DateTime<Utc>>,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_committed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Committed(_))
    }
}

/// Per-cycle inputs handed to the batch runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleRequest {
    /// Explicit baseline that wins over the persisted record
    pub since_override: Option<DateTime<Utc>>,
    /// Persist the record even when nothing was processed
    pub force_write: bool,
    /// Log the cycle start and an empty summary at info level
    pub announce: bool,
}
