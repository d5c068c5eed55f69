//! Command handlers invoked by the binary.
//!
//! - [`optimize_image`]: Shrink a single image
//! - [`optimize_directory`]: One incremental pass over a directory
//! - [`watch_directory`]: Repeated passes until shutdown

mod image;

pub use image::*;
