//! Error types for the image shrinker.
//!
//! Provides a hierarchy of error types using `thiserror`. Configuration
//! problems are fatal before any I/O, per-file errors are reported and
//! skipped, and metadata corruption fails the whole cycle.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Validation errors for the run configuration.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// File path errors.
#[derive(Error, Debug)]
pub enum PathError {
    /// Path does not exist
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotDirectory(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
}

/// Main error type for the shrinker.
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// The run configuration is invalid
    #[error("Configuration error: {0}")]
    Configuration(#[from] ValidationError),

    /// Image decoding, resizing or encoding failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Unsupported or invalid image format
    #[error("Format error: {0}")]
    Format(String),

    /// The progress record exists but cannot be parsed
    #[error("Metadata file {} is corrupt: {message}", .path.display())]
    MetadataCorruption { path: PathBuf, message: String },

    /// Encoding one file took longer than the configured limit
    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Convenience result type for shrinker operations.
pub type OptimizerResult<T> = Result<T, OptimizerError>;

// Helper methods for error creation
impl OptimizerError {
    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    /// IO error annotated with the path it happened on.
    pub fn io_at(path: impl AsRef<std::path::Path>, err: io::Error) -> Self {
        Self::IO(format!("{}: {err}", path.as_ref().display()))
    }

    pub fn metadata_corruption(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::MetadataCorruption {
            path: path.into(),
            message: msg.to_string(),
        }
    }
}

// Helper methods for validation error creation
impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotDirectory(path.into()))
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFile(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

// Convert std::io::Error to OptimizerError
impl From<io::Error> for OptimizerError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

// Convert PathError to OptimizerError
impl From<PathError> for OptimizerError {
    fn from(err: PathError) -> Self {
        Self::Configuration(ValidationError::Path(err))
    }
}

impl From<tokio::task::JoinError> for OptimizerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Processing(format!("Task panicked: {err}"))
    }
}
