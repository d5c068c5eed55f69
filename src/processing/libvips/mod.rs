// src/processing/libvips/mod.rs

//! Native image codec via libvips-rs.
//!
//! # Architecture
//!
//! - [`VipsCodec`]: Implements [`ImageCodec`](crate::processing::ImageCodec) on the blocking pool.
//! - [`resize`]: Maps a resize plan to `ops::thumbnail_image_with_opts`.
//! - [`formats`]: Maps output format and quality to `ops::*save_buffer_with_opts` calls.

mod codec;
mod formats;
mod resize;

pub use codec::VipsCodec;
