//! Watch mode: run the batch pass on a fixed interval until shutdown.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::WatchState;
use crate::processing::batch::{BatchRunner, CycleReport};
use crate::utils::OptimizerResult;

/// Shortest interval the scheduler accepts.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Drives [`BatchRunner`] cycles, one at a time.
pub struct WatchScheduler {
    runner: Arc<BatchRunner>,
    interval: Duration,
}

impl WatchScheduler {
    pub fn new(runner: Arc<BatchRunner>, interval: Duration) -> Self {
        Self {
            runner,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs an immediate first cycle, then one per interval, until `shutdown`
    /// fires. A tick that arrives while a cycle is running is dropped.
    ///
    /// On shutdown no new cycle starts; the in-flight one finishes its
    /// current file and is awaited. Returns the final state.
    pub async fn run(self, mut state: WatchState, shutdown: CancellationToken) -> WatchState {
        let config = self.runner.config();
        info!(
            "Watching {} -> {} every {}s",
            config.source_dir.display(),
            config.output_dir.display(),
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let (done_tx, mut done_rx) = mpsc::channel::<OptimizerResult<CycleReport>>(1);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(request) = state.begin_cycle() else {
                        continue;
                    };

                    let runner = self.runner.clone();
                    let cancel = shutdown.clone();
                    let done = done_tx.clone();
                    tokio::spawn(async move {
                        let cycle = tokio::spawn(async move { runner.run_cycle(request, &cancel).await });
                        // A panicking cycle still has to release the single-flight guard.
                        let result = cycle.await.unwrap_or_else(|e| Err(e.into()));
                        let _ = done.send(result).await;
                    });
                }
                Some(result) = done_rx.recv() => finish_cycle(&mut state, result),
            }
        }

        if state.running {
            info!("Waiting for the running cycle to finish");
            if let Some(result) = done_rx.recv().await {
                finish_cycle(&mut state, result);
            }
        }

        info!(
            "Stopped watching after {} cycle(s) ({} skipped)",
            state.cycles_completed, state.cycles_skipped
        );
        state
    }
}

fn finish_cycle(state: &mut WatchState, result: OptimizerResult<CycleReport>) {
    match result {
        Ok(report) => state.complete_cycle(Some(report.completion())),
        Err(e) => {
            error!("Watch cycle failed: {}", e);
            state.complete_cycle(None);
        }
    }
}
