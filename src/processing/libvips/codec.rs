// src/processing/libvips/codec.rs

//! [`ImageCodec`] backed by libvips.
//!
//! Each call runs inside `tokio::task::spawn_blocking` so the async runtime
//! is never blocked. libvips manages its own internal thread pool for
//! per-image parallelism, so one image at a time is enough to saturate the
//! CPU.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;

use libvips::VipsImage;

use crate::processing::codec::{EncodeRequest, ImageCodec, ImageProbe};
use crate::utils::{format_from_extension, OptimizerError, OptimizerResult};

use super::formats::encode_as;
use super::resize::resize_exact;

/// Thread-safe guard for the libvips `VipsApp` lifecycle.
///
/// `VipsApp` initializes the libvips thread pool and global state on creation
/// and shuts it down on drop. Wrapping in Arc ensures exactly one shutdown
/// call when the last reference is released.
struct VipsAppGuard(libvips::VipsApp);

// libvips is designed for concurrent use; individual VipsImage instances must
// not be shared between threads, but concurrent creation on separate threads is safe.
unsafe impl Send for VipsAppGuard {}
unsafe impl Sync for VipsAppGuard {}

/// Codec that decodes, resizes and encodes through libvips.
#[derive(Clone)]
pub struct VipsCodec {
    /// Keeps libvips initialized until the last clone is dropped.
    _vips: Arc<VipsAppGuard>,
}

impl VipsCodec {
    /// Initializes libvips for the lifetime of the codec.
    pub fn new() -> OptimizerResult<Self> {
        let vips = libvips::VipsApp::default("image-shrink")
            .map_err(|e| OptimizerError::processing(format!("Failed to initialize libvips: {e}")))?;
        // 0 = let libvips decide based on available CPU cores
        vips.concurrency_set(0);
        debug!("libvips initialized (concurrency: {})", vips.concurency_get());

        Ok(Self {
            _vips: Arc::new(VipsAppGuard(vips)),
        })
    }
}

#[async_trait]
impl ImageCodec for VipsCodec {
    async fn probe(&self, source: &Path) -> OptimizerResult<ImageProbe> {
        let source = source.to_path_buf();
        tokio::task::spawn_blocking(move || probe_blocking(&source)).await?
    }

    async fn encode(&self, source: &Path, request: &EncodeRequest) -> OptimizerResult<Vec<u8>> {
        let source = source.to_path_buf();
        let request = *request;
        tokio::task::spawn_blocking(move || encode_blocking(&source, &request)).await?
    }
}

// ── Blocking image work (runs on tokio's blocking thread pool) ────────────────────────

fn load(source: &Path) -> OptimizerResult<VipsImage> {
    let path = path_str(source)?;
    VipsImage::new_from_file(&path)
        .map_err(|e| OptimizerError::processing(format!("Failed to load '{path}': {e}")))
}

fn probe_blocking(source: &Path) -> OptimizerResult<ImageProbe> {
    let format = format_from_extension(source)?;
    // Header-only: libvips decodes pixels lazily.
    let image = load(source)?;

    let dimension = |v: i32| u32::try_from(v).ok().filter(|v| *v > 0);
    Ok(ImageProbe {
        width: dimension(image.get_width()),
        height: dimension(image.get_height()),
        format,
    })
}

fn encode_blocking(source: &Path, request: &EncodeRequest) -> OptimizerResult<Vec<u8>> {
    let image = load(source)?;

    debug!(
        "Loaded '{}': {}×{}",
        source.display(),
        image.get_width(),
        image.get_height()
    );

    let image = match (request.width, request.height) {
        (Some(width), Some(height)) => resize_exact(image, width, height)?,
        _ => image,
    };

    encode_as(&image, request.format, request.quality)
}

fn path_str(path: &Path) -> OptimizerResult<String> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| OptimizerError::format(format!("Path is not valid UTF-8: {}", PathBuf::from(path).display())))
}
