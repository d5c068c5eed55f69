// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{
    BaselineOverride, Clock, CommitDecision, CommitReport, FileOutcome, FileReport, FixedClock,
    PngOutputFormat, ProgressRecord, RunConfig, RunMode, SystemClock, WatchState, DEFAULT_RATE,
    METADATA_FILE_NAME,
};
pub use crate::processing::{CycleReport, EncodeRequest, ImageCodec, ImageProbe};
#[cfg(feature = "libvips")]
pub use crate::processing::libvips::VipsCodec;
pub use crate::utils::{ImageFormat, OptimizerError, OptimizerResult};
pub use crate::commands::*;

// This library file is the public API of the crate.
// The command-line entry point is in main.rs.
