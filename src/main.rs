// This is the command-line entry point for image-shrink.
// The lib.rs file holds everything else and serves as the public API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use image_shrink_lib::utils::validation::{absolutize, resolve_mode};
use image_shrink_lib::utils::validate_config;
use image_shrink_lib::{
    optimize_directory, optimize_image, watch_directory, BaselineOverride, Clock, ImageCodec,
    PngOutputFormat, RunConfig, RunMode, SystemClock, VipsCodec, DEFAULT_RATE,
};

#[derive(Parser)]
#[command(name = "image-shrink")]
#[command(version, about = "Incrementally shrink images into an output directory", long_about = None)]
struct Cli {
    /// Source directory, or a single image file
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Output directory (mirrors the source tree)
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Reduction rate in (0, 1]; scales dimensions and encode quality
    #[arg(short, long, default_value_t = DEFAULT_RATE)]
    rate: f64,

    /// Upper bound for the output width in pixels
    #[arg(long, value_name = "W")]
    max_width: Option<u32>,

    /// What PNG sources are written as: native, webp or avif
    #[arg(long, default_value = "native")]
    png_format: PngOutputFormat,

    /// Only process files modified after this RFC 3339 instant
    #[arg(long, value_name = "RFC3339", conflicts_with = "from_now")]
    since: Option<DateTime<Utc>>,

    /// Only process files modified after startup
    #[arg(long)]
    from_now: bool,

    /// Keep running and re-scan the source directory periodically
    #[arg(short, long)]
    watch: bool,

    /// Seconds between watch cycles
    #[arg(long, value_name = "SECS", default_value_t = 60, requires = "watch")]
    interval: u64,

    /// Progress record location (default: <SOURCE>/.image-shrink.json)
    #[arg(long, value_name = "PATH")]
    metadata_file: Option<PathBuf>,

    /// Give up on a single file after this many seconds
    #[arg(long, value_name = "SECS")]
    file_timeout: Option<u64>,
}

impl Cli {
    fn baseline(&self) -> BaselineOverride {
        match (self.since, self.from_now) {
            (Some(at), _) => BaselineOverride::Since(at),
            (None, true) => BaselineOverride::FromNow,
            (None, false) => BaselineOverride::Persisted,
        }
    }

    /// Builds the run configuration; `source_dir` is the parent for a file SOURCE.
    fn run_config(&self, source: PathBuf, mode: &RunMode) -> Result<RunConfig> {
        let source_dir = match mode {
            RunMode::SingleFile(file) => file
                .parent()
                .map(PathBuf::from)
                .with_context(|| format!("{} has no parent directory", file.display()))?,
            RunMode::Batch | RunMode::Watch => source,
        };

        let metadata_path = match &self.metadata_file {
            Some(path) => absolutize(path)?,
            None => RunConfig::default_metadata_path(&source_dir),
        };

        Ok(RunConfig {
            output_dir: absolutize(&self.output)?,
            rate: self.rate,
            max_output_width: self.max_width,
            png_output_format: self.png_format,
            baseline: self.baseline(),
            interval: Duration::from_secs(self.interval),
            metadata_path,
            file_timeout: self.file_timeout.map(Duration::from_secs),
            source_dir,
        })
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let source = absolutize(&cli.source)?;
    let mode = resolve_mode(&source, cli.watch).context("Invalid configuration")?;
    let config = cli.run_config(source, &mode)?;
    validate_config(&config).context("Invalid configuration")?;
    let config = Arc::new(config);
    debug!("Run configuration: {:?}", config);

    let codec: Arc<dyn ImageCodec> = Arc::new(VipsCodec::new()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match mode {
        RunMode::SingleFile(file) => {
            optimize_image(config, codec, &file).await?;
            return Ok(());
        }
        RunMode::Batch => {
            optimize_directory(config, codec, clock).await?;
            return Ok(());
        }
        RunMode::Watch => {}
    }

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            signal.cancel();
        }
    });

    watch_directory(config, codec, clock, shutdown).await?;
    Ok(())
}
