//! Persistence of the per-directory progress record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use crate::core::{Clock, ProgressRecord};
use crate::utils::{ensure_parent_dir, temp_path, OptimizerError, OptimizerResult};

/// A loaded record and whether it came from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecord {
    pub record: ProgressRecord,
    pub existed: bool,
}

/// Sole owner of the on-disk progress record.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the record, synthesizing a fresh one when the file is missing.
    ///
    /// A file that exists but does not parse is a [`OptimizerError::MetadataCorruption`].
    pub async fn load(&self, clock: &dyn Clock) -> OptimizerResult<LoadedRecord> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No progress record at {}, starting fresh", self.path.display());
                return Ok(LoadedRecord {
                    record: ProgressRecord::initial(clock.now()),
                    existed: false,
                });
            }
            Err(e) => return Err(OptimizerError::io_at(&self.path, e)),
        };

        let record = serde_json::from_slice(&raw)
            .map_err(|e| OptimizerError::metadata_corruption(&self.path, e))?;

        Ok(LoadedRecord { record, existed: true })
    }

    /// Writes the record to a temporary sibling, syncs it and renames it
    /// over the real file.
    pub async fn save(&self, record: &ProgressRecord) -> OptimizerResult<()> {
        ensure_parent_dir(&self.path).await?;
        let tmp = temp_path(&self.path);
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| OptimizerError::processing(format!("Failed to serialize progress record: {e}")))?;

        if let Err(e) = write_synced(&tmp, &json).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(OptimizerError::io_at(&tmp, e));
        }

        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| OptimizerError::io_at(&self.path, e))?;

        debug!("Progress record saved: {:?}", record);
        Ok(())
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}
