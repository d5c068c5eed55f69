use std::path::{Path, PathBuf};
use crate::core::{RunConfig, RunMode};
use crate::utils::{OptimizerResult, ValidationError};

/// Validates a run configuration before any processing I/O happens.
///
/// The watch interval is not checked here; the scheduler applies its floor.
pub fn validate_config(config: &RunConfig) -> OptimizerResult<()> {
    validate_rate(config.rate)?;
    validate_max_width(config.max_output_width)?;
    validate_source_dir(&config.source_dir)?;
    validate_output_dir(&config.output_dir)?;

    if same_dir(&config.source_dir, &config.output_dir) {
        return Err(ValidationError::settings(format!(
            "Output directory cannot be the source directory: {}",
            config.output_dir.display()
        ))
        .into());
    }

    Ok(())
}

/// Path equality, resolving symlinks when both sides exist.
fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// A file SOURCE selects single-file mode, which cannot be watched.
pub fn resolve_mode(source: &Path, watch: bool) -> OptimizerResult<RunMode> {
    match (source.is_file(), watch) {
        (true, true) => Err(ValidationError::settings(format!(
            "Watch mode needs a source directory, {} is a file",
            source.display()
        ))
        .into()),
        (true, false) => Ok(RunMode::SingleFile(source.to_path_buf())),
        (false, true) => Ok(RunMode::Watch),
        (false, false) => Ok(RunMode::Batch),
    }
}

/// Rate must be a finite number in (0, 1].
pub fn validate_rate(rate: f64) -> OptimizerResult<()> {
    if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
        return Err(ValidationError::settings(format!(
            "Invalid rate: {rate}. Must be greater than 0 and at most 1"
        ))
        .into());
    }
    Ok(())
}

pub fn validate_max_width(max_width: Option<u32>) -> OptimizerResult<()> {
    if max_width == Some(0) {
        return Err(ValidationError::settings("Max width cannot be 0").into());
    }
    Ok(())
}

/// Validates the source directory
pub fn validate_source_dir(path: &Path) -> OptimizerResult<()> {
    if !path.is_absolute() {
        return Err(ValidationError::settings(format!(
            "Source directory must be absolute: {}",
            path.display()
        ))
        .into());
    }

    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_dir() {
        return Err(ValidationError::not_a_directory(path).into());
    }

    Ok(())
}

/// Validates the single input file of single-file mode
pub fn validate_input_file(path: &Path) -> OptimizerResult<()> {
    if !path.exists() {
        return Err(ValidationError::path_not_found(path).into());
    }

    if !path.is_file() {
        return Err(ValidationError::not_a_file(path).into());
    }

    Ok(())
}

/// The output directory may not exist yet, but must not be a file.
pub fn validate_output_dir(path: &Path) -> OptimizerResult<()> {
    if path.as_os_str().is_empty() || !path.is_absolute() {
        return Err(ValidationError::settings(format!(
            "Output directory must be absolute: {}",
            path.display()
        ))
        .into());
    }

    if path.exists() && !path.is_dir() {
        return Err(ValidationError::not_a_directory(path).into());
    }

    Ok(())
}

/// Turns a possibly relative path into an absolute one against the working directory.
pub fn absolutize(path: &Path) -> OptimizerResult<PathBuf> {
    Ok(std::path::absolute(path)?)
}
