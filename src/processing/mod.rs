//! The incremental processing engine.

pub mod baseline;
pub mod batch;
pub mod codec;
pub mod committer;
#[cfg(feature = "libvips")]
pub mod libvips;
pub mod metadata;
pub mod optimizer;
pub mod planner;
pub mod selector;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchRunner, CycleReport, CycleTotals};
pub use codec::{EncodeRequest, ImageCodec, ImageProbe};
pub use committer::OutputCommitter;
pub use metadata::{LoadedRecord, MetadataStore};
pub use optimizer::ImageOptimizer;
pub use selector::FileSelector;
pub use watch::WatchScheduler;
