//! Reduce-or-fall-back output commit.
//!
//! A reduced image only ever becomes visible through an atomic rename of a
//! fully written `.tmp` sibling, and only when it is strictly smaller than
//! the original. Otherwise the original is copied verbatim to its own
//! relative path.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::core::{CommitDecision, CommitReport, ImageTask};
use crate::processing::codec::{bounded, EncodeRequest, ImageCodec};
use crate::utils::fs::remove_if_exists;
use crate::utils::{ensure_parent_dir, get_file_size, temp_path, ImageFormat, OptimizerError, OptimizerResult};

pub struct OutputCommitter {
    codec: Arc<dyn ImageCodec>,
    timeout: Option<Duration>,
}

impl OutputCommitter {
    pub fn new(codec: Arc<dyn ImageCodec>, timeout: Option<Duration>) -> Self {
        Self { codec, timeout }
    }

    /// Commits one image and reports what was written where.
    pub async fn commit(&self, task: &ImageTask) -> OptimizerResult<CommitReport> {
        ensure_parent_dir(&task.primary_output).await?;
        ensure_parent_dir(&task.fallback_output).await?;

        let original_size = get_file_size(&task.input_path).await?;

        let Some(format) = task.settings.format else {
            debug!("{} is unsupported for re-encode, copying as is", task.input_path.display());
            return self.copy_original(task, original_size, CommitDecision::Passthrough).await;
        };

        let candidate = temp_path(&task.primary_output);
        match self.reduce(task, format, &candidate, original_size).await {
            Ok(report) => Ok(report),
            Err(e) => {
                remove_if_exists(&candidate).await;
                Err(e)
            }
        }
    }

    async fn reduce(
        &self,
        task: &ImageTask,
        format: ImageFormat,
        candidate: &Path,
        original_size: u64,
    ) -> OptimizerResult<CommitReport> {
        let request = EncodeRequest {
            format,
            width: task.settings.resize.map(|r| r.width),
            height: task.settings.resize.map(|r| r.height),
            quality: task.settings.quality,
        };

        let bytes = self.encode(&task.input_path, &request).await?;
        fs::write(candidate, &bytes)
            .await
            .map_err(|e| OptimizerError::io_at(candidate, e))?;

        let candidate_size = get_file_size(candidate).await?;
        let original_size = get_file_size(&task.input_path).await.unwrap_or(original_size);

        if candidate_size >= original_size {
            debug!(
                "Candidate for {} is {} bytes, original {} bytes; keeping the original",
                task.input_path.display(),
                candidate_size,
                original_size
            );
            remove_if_exists(candidate).await;
            return self.copy_original(task, original_size, CommitDecision::Fallback).await;
        }

        fs::rename(candidate, &task.primary_output)
            .await
            .map_err(|e| OptimizerError::io_at(&task.primary_output, e))?;

        Ok(CommitReport {
            original_path: task.input_path.clone(),
            written_path: task.primary_output.clone(),
            original_size,
            optimized_size: candidate_size,
            decision: CommitDecision::Reduced,
        })
    }

    async fn encode(&self, source: &Path, request: &EncodeRequest) -> OptimizerResult<Vec<u8>> {
        bounded(self.timeout, self.codec.encode(source, request)).await
    }

    /// Copies the original to the fallback path through a `.tmp` sibling.
    async fn copy_original(
        &self,
        task: &ImageTask,
        original_size: u64,
        decision: CommitDecision,
    ) -> OptimizerResult<CommitReport> {
        let staged = temp_path(&task.fallback_output);

        let copied = match fs::copy(&task.input_path, &staged).await {
            Ok(copied) => copied,
            Err(e) => {
                remove_if_exists(&staged).await;
                return Err(OptimizerError::io_at(&task.input_path, e));
            }
        };

        if let Err(e) = fs::rename(&staged, &task.fallback_output).await {
            remove_if_exists(&staged).await;
            return Err(OptimizerError::io_at(&task.fallback_output, e));
        }

        Ok(CommitReport {
            original_path: task.input_path.clone(),
            written_path: task.fallback_output.clone(),
            original_size,
            optimized_size: copied,
            decision,
        })
    }
}
