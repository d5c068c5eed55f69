//! Test doubles shared by the unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::processing::codec::{EncodeRequest, ImageCodec, ImageProbe};
use crate::utils::{format_from_extension, OptimizerError, OptimizerResult};

/// Size of the bytes the stub "encodes".
#[derive(Debug, Clone, Copy)]
pub enum CandidateSize {
    /// Fraction of the source size
    Ratio(f64),
    Fixed(usize),
}

pub struct StubCodec {
    pub dimensions: Option<(u32, u32)>,
    pub candidate: CandidateSize,
    /// Encoding fails for sources whose path contains this
    pub fail_on: Option<String>,
    /// `probe` sleeps this long before answering
    pub probe_delay: Option<Duration>,
    pub requests: Mutex<Vec<(PathBuf, EncodeRequest)>>,
}

impl StubCodec {
    pub fn new(candidate: CandidateSize) -> Self {
        Self {
            dimensions: Some((1000, 800)),
            candidate,
            fail_on: None,
            probe_delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn shrinking() -> Self {
        Self::new(CandidateSize::Ratio(0.5))
    }

    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn slow_probe(mut self, delay: Duration) -> Self {
        self.probe_delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<(PathBuf, EncodeRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageCodec for StubCodec {
    async fn probe(&self, source: &Path) -> OptimizerResult<ImageProbe> {
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(ImageProbe {
            width: self.dimensions.map(|(w, _)| w),
            height: self.dimensions.map(|(_, h)| h),
            format: format_from_extension(source)?,
        })
    }

    async fn encode(&self, source: &Path, request: &EncodeRequest) -> OptimizerResult<Vec<u8>> {
        self.requests.lock().unwrap().push((source.to_path_buf(), *request));

        if let Some(needle) = &self.fail_on {
            if source.to_string_lossy().contains(needle.as_str()) {
                return Err(OptimizerError::processing("stub decode failure"));
            }
        }

        let len = match self.candidate {
            CandidateSize::Ratio(ratio) => {
                let source_len = tokio::fs::metadata(source).await?.len();
                (source_len as f64 * ratio) as usize
            }
            CandidateSize::Fixed(len) => len,
        };
        Ok(vec![7u8; len])
    }
}

/// Writes `len` patterned bytes to `path` and sets its modification time.
pub fn write_image(path: &Path, len: usize, modified: DateTime<Utc>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    std::fs::write(path, bytes).unwrap();
    set_modified(path, modified);
}

pub fn set_modified(path: &Path, modified: DateTime<Utc>) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::from(modified)).unwrap();
}
