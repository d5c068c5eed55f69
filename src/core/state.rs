//! Watch-mode scheduler state.

use chrono::{DateTime, Utc};
use tracing::debug;
use crate::core::CycleRequest;

/// Explicit state of the watch scheduler.
///
/// The whole state machine is `idle → running → idle`; leaving `running`
/// may advance the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchState {
    /// Single-flight guard
    pub running: bool,
    /// Baseline override in effect, seeded from `--since`/`--from-now`
    pub effective_since: Option<DateTime<Utc>>,
    /// A `--from-now` write that has not happened yet
    pub force_write: bool,
    pub cycles_completed: u64,
    pub cycles_skipped: u64,
}

/// What the state needs to know about a finished cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleCompletion {
    pub metadata_written: bool,
    /// `lastProcessedAt` of the record after the cycle
    pub persisted_baseline: DateTime<Utc>,
}

impl WatchState {
    pub fn new(since_override: Option<DateTime<Utc>>, force_write: bool) -> Self {
        Self {
            effective_since: since_override,
            force_write,
            ..Self::default()
        }
    }

    /// Moves to `running` and returns the request for the new cycle, or
    /// `None` when the previous cycle has not finished (the tick is dropped).
    pub fn begin_cycle(&mut self) -> Option<CycleRequest> {
        if self.running {
            self.cycles_skipped += 1;
            debug!("Previous cycle still running, skipping this tick");
            return None;
        }

        self.running = true;
        Some(CycleRequest {
            since_override: self.effective_since,
            force_write: self.force_write,
            announce: false,
        })
    }

    /// Moves back to idle. `completion` is `None` when the cycle failed.
    pub fn complete_cycle(&mut self, completion: Option<CycleCompletion>) {
        self.running = false;
        self.cycles_completed += 1;

        let Some(done) = completion else {
            return;
        };

        if done.metadata_written {
            self.force_write = false;

            // Without this the original override would match the same,
            // already processed files on every cycle.
            if self.effective_since.is_some() {
                debug!("Advancing watch baseline to {}", done.persisted_baseline);
                self.effective_since = Some(done.persisted_baseline);
            }
        }
    }
}
