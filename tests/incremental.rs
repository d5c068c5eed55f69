//! End-to-end passes over a temporary source tree with a stub codec.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use image_shrink_lib::utils::format_from_extension;
use image_shrink_lib::{
    optimize_directory, BaselineOverride, CommitDecision, EncodeRequest, FileOutcome, FixedClock,
    ImageCodec, ImageProbe, OptimizerResult, PngOutputFormat, RunConfig,
};
use tempfile::tempdir;

/// Encodes to a fixed fraction of the source size.
struct RatioCodec(f64);

#[async_trait]
impl ImageCodec for RatioCodec {
    async fn probe(&self, source: &Path) -> OptimizerResult<ImageProbe> {
        Ok(ImageProbe {
            width: Some(1200),
            height: Some(900),
            format: format_from_extension(source)?,
        })
    }

    async fn encode(&self, source: &Path, _request: &EncodeRequest) -> OptimizerResult<Vec<u8>> {
        let len = tokio::fs::metadata(source).await?.len();
        Ok(vec![0u8; (len as f64 * self.0) as usize])
    }
}

fn write_image(path: &Path, len: usize, modified: DateTime<Utc>) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, vec![1u8; len]).unwrap();
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::from(modified)).unwrap();
}

fn config(root: &Path, rate: f64, png: PngOutputFormat) -> RunConfig {
    let source_dir = root.join("photos");
    std::fs::create_dir_all(&source_dir).unwrap();
    RunConfig {
        metadata_path: RunConfig::default_metadata_path(&source_dir),
        source_dir,
        output_dir: root.join("shrunk"),
        rate,
        max_output_width: None,
        png_output_format: png,
        baseline: BaselineOverride::Persisted,
        interval: Duration::from_secs(60),
        file_timeout: None,
    }
}

fn read_record(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn passes_pick_up_only_newer_files() {
    let dir = tempdir().unwrap();
    let config = Arc::new(config(dir.path(), 0.5, PngOutputFormat::Native));
    let t0 = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
    let clock = Arc::new(FixedClock::new(t0 + ChronoDuration::hours(1)));
    let codec = Arc::new(RatioCodec(0.5));

    std::fs::write(
        &config.metadata_path,
        r#"{"lastProcessedAt":"2025-05-01T10:00:00+00:00","lastRate":0.9}"#,
    )
    .unwrap();
    write_image(&config.source_dir.join("old.jpg"), 4_000, t0);
    write_image(&config.source_dir.join("trip/new.jpg"), 4_000, t0 + ChronoDuration::seconds(1));

    let first = optimize_directory(config.clone(), codec.clone(), clock.clone()).await.unwrap();
    assert_eq!(first.processed, 1);
    assert_eq!(first.skipped, 1);
    assert_eq!(first.failed, 0);
    assert!(first.metadata_written);
    assert_eq!(std::fs::metadata(config.output_dir.join("trip/new.jpg")).unwrap().len(), 2_000);
    assert!(!config.output_dir.join("old.jpg").exists());

    let record = read_record(&config.metadata_path);
    let written: DateTime<Utc> = record["lastProcessedAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(written, t0 + ChronoDuration::seconds(1));
    assert_eq!(record["lastRate"], 0.5);

    let second = optimize_directory(config.clone(), codec, clock).await.unwrap();
    assert_eq!(second.processed, 0);
    assert_eq!(second.skipped, 2);
    assert!(!second.metadata_written);
    assert_eq!(second.record.last_processed_at, t0 + ChronoDuration::seconds(1));
}

#[tokio::test]
async fn larger_alternate_format_falls_back_to_original_png() {
    let dir = tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap();
    let mut config = config(dir.path(), 0.9, PngOutputFormat::WebP);
    config.baseline = BaselineOverride::Since(now - ChronoDuration::hours(1));
    let config = Arc::new(config);
    write_image(&config.source_dir.join("chart.png"), 5_000, now - ChronoDuration::minutes(5));

    let report = optimize_directory(
        config.clone(),
        Arc::new(RatioCodec(1.2)),
        Arc::new(FixedClock::new(now)),
    )
    .await
    .unwrap();

    let FileOutcome::Committed(commit) = &report.files[0].outcome else {
        panic!("expected a committed file");
    };
    assert_eq!(commit.decision, CommitDecision::Fallback);
    assert_eq!(commit.written_path, config.output_dir.join("chart.png"));
    assert!(!config.output_dir.join("chart.webp").exists());
    assert_eq!(std::fs::metadata(config.output_dir.join("chart.png")).unwrap().len(), 5_000);
}
