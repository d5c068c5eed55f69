use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::core::{CommitReport, EncodeSettings, ImageTask, RunConfig};
use crate::processing::codec::{bounded, ImageCodec};
use crate::processing::committer::OutputCommitter;
use crate::processing::planner::{clamp_quality, output_paths, plan_resize, resolve_output_format};
use crate::utils::OptimizerResult;

/// Per-file pipeline shared by batch, watch and single-file mode:
/// probe, plan, commit.
pub struct ImageOptimizer {
    config: Arc<RunConfig>,
    codec: Arc<dyn ImageCodec>,
    committer: OutputCommitter,
}

impl ImageOptimizer {
    pub fn new(config: Arc<RunConfig>, codec: Arc<dyn ImageCodec>) -> Self {
        let committer = OutputCommitter::new(codec.clone(), config.file_timeout);
        Self { config, codec, committer }
    }

    /// Builds the commit task for `source`, written under `output_dir/relative`.
    pub async fn plan(&self, source: &Path, relative: &Path) -> OptimizerResult<ImageTask> {
        let probe = bounded(self.config.file_timeout, self.codec.probe(source)).await?;

        let format = resolve_output_format(probe.format, self.config.png_output_format);
        let resize = plan_resize(
            probe.width,
            probe.height,
            self.config.rate,
            self.config.max_output_width,
        );
        let paths = output_paths(&self.config.output_dir, relative, probe.format, format);

        debug!(
            "Planned {}: {:?}x{:?} {} -> {:?} {:?}",
            relative.display(),
            probe.width,
            probe.height,
            probe.format,
            format,
            resize
        );

        Ok(ImageTask {
            input_path: source.to_path_buf(),
            primary_output: paths.primary,
            fallback_output: paths.fallback,
            settings: EncodeSettings {
                format,
                resize,
                quality: clamp_quality(self.config.rate),
            },
        })
    }

    pub async fn optimize(&self, source: &Path, relative: &Path) -> OptimizerResult<CommitReport> {
        let task = self.plan(source, relative).await?;
        self.committer.commit(&task).await
    }
}
