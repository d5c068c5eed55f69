use std::path::Path;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::{
    CandidateFile, Clock, CommitDecision, CommitReport, CycleCompletion, CycleRequest, FileOutcome,
    FileReport, ProgressRecord, RunConfig,
};
use crate::processing::baseline;
use crate::processing::codec::ImageCodec;
use crate::processing::metadata::MetadataStore;
use crate::processing::optimizer::ImageOptimizer;
use crate::processing::selector::{is_newer, FileSelector, ScanEntry};
use crate::utils::{OptimizerError, OptimizerResult};

use super::metrics::CycleTotals;

/// Everything one pass did.
#[derive(Debug)]
pub struct CycleReport {
    /// Baseline the pass filtered against
    pub effective_since: DateTime<Utc>,
    pub processed: usize,
    pub failed: usize,
    /// Files not newer than the baseline
    pub skipped: usize,
    /// Latest mtime among processed files, or the baseline
    pub latest_processed_at: DateTime<Utc>,
    /// Progress record after the pass
    pub record: ProgressRecord,
    pub metadata_written: bool,
    /// The pass stopped early on shutdown
    pub cancelled: bool,
    pub files: Vec<FileReport>,
    pub totals: CycleTotals,
}

impl CycleReport {
    pub fn completion(&self) -> CycleCompletion {
        CycleCompletion {
            metadata_written: self.metadata_written,
            persisted_baseline: self.record.last_processed_at,
        }
    }
}

/// Runs one full pass over the source directory.
pub struct BatchRunner {
    config: Arc<RunConfig>,
    optimizer: ImageOptimizer,
    store: MetadataStore,
    clock: Arc<dyn Clock>,
}

impl BatchRunner {
    pub fn new(config: Arc<RunConfig>, codec: Arc<dyn ImageCodec>, clock: Arc<dyn Clock>) -> Self {
        let store = MetadataStore::new(config.metadata_path.clone());
        let optimizer = ImageOptimizer::new(config.clone(), codec);
        Self { config, optimizer, store, clock }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Load metadata, select newer files, commit each, then persist the
    /// record if the pass is write-eligible.
    ///
    /// Per-file failures are collected in the report. Metadata failures
    /// fail the whole pass.
    pub async fn run_cycle(
        &self,
        request: CycleRequest,
        cancel: &CancellationToken,
    ) -> OptimizerResult<CycleReport> {
        let loaded = self.store.load(self.clock.as_ref()).await?;
        let previous = loaded.record.last_processed_at;
        let effective_since = baseline::resolve(previous, request.since_override);

        if request.announce {
            info!(
                "Shrinking {} -> {} (since {})",
                self.config.source_dir.display(),
                self.config.output_dir.display(),
                effective_since
            );
        } else {
            debug!(
                "Cycle over {} -> {} (since {})",
                self.config.source_dir.display(),
                self.config.output_dir.display(),
                effective_since
            );
        }

        let selector = FileSelector::new(&self.config.source_dir).excluding(&self.config.output_dir);
        let entries = tokio::task::spawn_blocking(move || selector.scan().collect::<Vec<_>>()).await?;

        let mut files = Vec::new();
        let mut totals = CycleTotals::default();
        let (mut processed, mut failed, mut skipped) = (0usize, 0usize, 0usize);
        let mut latest: Option<DateTime<Utc>> = None;
        let mut cancelled = false;

        for entry in entries {
            let candidate = match entry {
                ScanEntry::Candidate(candidate) => candidate,
                ScanEntry::Unreadable { path, error } => {
                    warn!("Cannot read {}: {}", path.display(), error);
                    failed += 1;
                    files.push(FileReport {
                        relative: self.relative(&path).to_path_buf(),
                        modified_at: None,
                        outcome: FileOutcome::Failed(OptimizerError::io_at(&path, error)),
                    });
                    continue;
                }
            };

            if !is_newer(&candidate, effective_since) {
                skipped += 1;
                continue;
            }

            // The current file always finishes; shutdown is only honored between files.
            if cancel.is_cancelled() {
                info!("Shutdown requested, stopping before {}", candidate.relative.display());
                cancelled = true;
                break;
            }

            let outcome = match self.optimizer.optimize(&candidate.path, &candidate.relative).await {
                Ok(report) => {
                    processed += 1;
                    latest = Some(latest.map_or(candidate.modified_at, |l| l.max(candidate.modified_at)));
                    totals.record(&report);
                    self.log_commit(&candidate, &report);
                    FileOutcome::Committed(report)
                }
                Err(e) => {
                    failed += 1;
                    warn!("Failed to shrink {}: {}", candidate.relative.display(), e);
                    FileOutcome::Failed(e)
                }
            };

            files.push(FileReport {
                relative: candidate.relative,
                modified_at: Some(candidate.modified_at),
                outcome,
            });
        }

        // A partial pass cannot move the baseline: unvisited files may be older
        // than the newest visited one.
        let eligible = !cancelled && (processed > 0 || !loaded.existed || request.force_write);
        let record = if eligible {
            let at = next_baseline(previous, request.since_override, latest);
            let record = ProgressRecord::new(at, self.config.rate);
            self.store.save(&record).await?;
            record
        } else {
            loaded.record
        };

        let report = CycleReport {
            effective_since,
            processed,
            failed,
            skipped,
            latest_processed_at: latest.unwrap_or(effective_since),
            record,
            metadata_written: eligible,
            cancelled,
            files,
            totals,
        };
        self.log_summary(&report, request.announce);

        Ok(report)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.config.source_dir).unwrap_or(path)
    }

    fn log_commit(&self, candidate: &CandidateFile, report: &CommitReport) {
        let written = report
            .written_path
            .strip_prefix(&self.config.output_dir)
            .unwrap_or(&report.written_path);
        let note = match report.decision {
            CommitDecision::Reduced => "",
            CommitDecision::Fallback => " (original kept, reduction was not smaller)",
            CommitDecision::Passthrough => " (original kept, unsupported for re-encode)",
        };

        info!(
            "{} -> {}: {} -> {} bytes ({:.1}% saved){}",
            candidate.relative.display(),
            written.display(),
            report.original_size,
            report.optimized_size,
            report.savings_percent(),
            note
        );
    }

    fn log_summary(&self, report: &CycleReport, announce: bool) {
        if !announce && report.processed == 0 && report.failed == 0 {
            debug!("Nothing new since {}", report.effective_since);
            return;
        }

        let totals = &report.totals;
        info!(
            "{} file(s) processed ({} reduced, {} kept, {} copied as is), {} failed, {} bytes saved ({:.1}%)",
            report.processed,
            totals.reduced,
            totals.fallbacks,
            totals.passthroughs,
            report.failed,
            totals.saved_bytes(),
            totals.savings_percent()
        );
    }
}

/// `lastProcessedAt` of a write-eligible pass.
///
/// With nothing processed the override (if any) becomes the baseline;
/// otherwise the newest processed mtime, never going backwards.
pub fn next_baseline(
    previous: DateTime<Utc>,
    since_override: Option<DateTime<Utc>>,
    latest_processed: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    match latest_processed {
        None => since_override.unwrap_or(previous),
        Some(latest) => previous.max(latest),
    }
}
