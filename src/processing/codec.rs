//! Codec capability consumed by the engine.

use std::future::Future;
use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use crate::utils::{ImageFormat, OptimizerError, OptimizerResult};

/// Header information of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProbe {
    /// `None` for containers without a raster size
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: ImageFormat,
}

/// One encode call: output format, optional exact target size, quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeRequest {
    pub format: ImageFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
}

/// Decodes, resizes and encodes images.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Reads the native size and format of `source`.
    async fn probe(&self, source: &Path) -> OptimizerResult<ImageProbe>;

    /// Produces the encoded bytes of `source` per `request`.
    async fn encode(&self, source: &Path, request: &EncodeRequest) -> OptimizerResult<Vec<u8>>;
}

/// Runs a codec call under the optional per-file time limit.
pub async fn bounded<T>(
    limit: Option<Duration>,
    call: impl Future<Output = OptimizerResult<T>>,
) -> OptimizerResult<T> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| OptimizerError::Timeout(limit))?,
        None => call.await,
    }
}
