//! mixdown - Main entry point
//!
//! Parses command-line arguments, wires up logging, and runs the merge
//! pipeline.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mixdown::{config, MergeConfig};

/// Command-line arguments for mixdown
#[derive(Parser, Debug)]
#[command(name = "mixdown")]
#[command(about = "Merge a directory of audio files into a single MP3")]
#[command(version)]
struct Args {
    /// Directory containing the audio files to merge
    song_dir: PathBuf,

    /// Path of the merged MP3 to write
    output: PathBuf,

    /// Maximum number of parallel decode workers (default: automatic)
    #[arg(long, env = "MIXDOWN_MAX_WORKERS")]
    max_workers: Option<NonZeroUsize>,

    /// Output bitrate (e.g. 128k, 192k, 256k)
    #[arg(long, default_value = "192k")]
    bitrate: String,

    /// Output sample rate in Hz
    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// Output channels: 1 = mono, 2 = stereo (default: first file's layout)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=2))]
    channels: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixdown=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = MergeConfig {
        song_dir: args.song_dir,
        output: args.output,
        max_workers: args.max_workers,
        bitrate_kbps: config::parse_bitrate(&args.bitrate)?,
        sample_rate: args.sample_rate,
        channels: args.channels,
    };

    let report = mixdown::run(&config)
        .await
        .context("merge failed")?;

    if report.skipped.is_empty() {
        info!(
            "Merged {} file(s) into {}",
            report.merged,
            report.output.display()
        );
    } else {
        info!(
            "Merged {} file(s) into {} ({} skipped)",
            report.merged,
            report.output.display(),
            report.skipped.len()
        );
    }

    Ok(())
}
