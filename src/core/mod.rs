//! Core types and state.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`RunConfig`]: Validated settings for a run
//! - [`ProgressRecord`]: The persisted progress of a source directory
//! - [`ImageTask`]: One image to commit, with its encode settings
//! - [`CommitReport`]: Result of committing one image
//! - [`WatchState`]: Watch-mode scheduler state
//! - [`Clock`]: Injectable source of "now"

mod clock;
mod progress;
mod state;
mod task;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use progress::{ProgressRecord, DEFAULT_RATE};
pub use state::{CycleCompletion, WatchState};
pub use task::{EncodeSettings, ImageTask, ResizePlan};
pub use types::{
    BaselineOverride, CandidateFile, CommitDecision, CommitReport, CycleRequest, FileOutcome,
    FileReport, PngOutputFormat, RunConfig, RunMode, METADATA_FILE_NAME,
};
