//! Command handlers for the three run modes.

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::{Clock, CommitReport, CycleRequest, RunConfig, WatchState};
use crate::processing::baseline::resolve_startup;
use crate::processing::{BatchRunner, CycleReport, ImageCodec, ImageOptimizer, WatchScheduler};
use crate::utils::{validate_config, OptimizerError, OptimizerResult};
use crate::utils::validation::validate_input_file;

/// Shrinks a single image into `output_dir/<file name>`.
///
/// Single-file mode never reads or writes the progress record.
pub async fn optimize_image(
    config: Arc<RunConfig>,
    codec: Arc<dyn ImageCodec>,
    file: &Path,
) -> OptimizerResult<CommitReport> {
    validate_input_file(file)?;
    let name = file
        .file_name()
        .ok_or_else(|| OptimizerError::processing(format!("No file name in {}", file.display())))?;
    debug!("Received optimize_image command for {}", file.display());

    let optimizer = ImageOptimizer::new(config.clone(), codec);
    let report = optimizer.optimize(file, Path::new(name)).await?;

    info!(
        "{} -> {}: {} -> {} bytes ({:.1}% saved)",
        file.display(),
        report.written_path.display(),
        report.original_size,
        report.optimized_size,
        report.savings_percent()
    );
    Ok(report)
}

/// Runs one batch pass over the source directory.
///
/// Any cycle-level error, corrupt metadata included, is returned to the caller.
pub async fn optimize_directory(
    config: Arc<RunConfig>,
    codec: Arc<dyn ImageCodec>,
    clock: Arc<dyn Clock>,
) -> OptimizerResult<CycleReport> {
    validate_config(&config)?;
    let startup = resolve_startup(config.baseline, clock.as_ref());

    let request = CycleRequest {
        since_override: startup.since,
        force_write: startup.force_write,
        announce: true,
    };

    let runner = BatchRunner::new(config, codec, clock);
    runner.run_cycle(request, &CancellationToken::new()).await
}

/// Watches the source directory until `shutdown` fires.
pub async fn watch_directory(
    config: Arc<RunConfig>,
    codec: Arc<dyn ImageCodec>,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
) -> OptimizerResult<WatchState> {
    validate_config(&config)?;
    let startup = resolve_startup(config.baseline, clock.as_ref());
    let state = WatchState::new(startup.since, startup.force_write);

    let interval = config.interval;
    let runner = Arc::new(BatchRunner::new(config, codec, clock));
    Ok(WatchScheduler::new(runner, interval).run(state, shutdown).await)
}
