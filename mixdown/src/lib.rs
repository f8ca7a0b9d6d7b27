//! # mixdown
//!
//! Merge a directory of audio files into a single MP3.
//!
//! **Pipeline:** discover -> parallel decode/normalize (symphonia + rubato)
//! -> merge -> encode (LAME), with the output written atomically.

pub mod audio;
pub mod config;
pub mod discover;
pub mod encoder;
pub mod error;
pub mod pipeline;

pub use config::MergeConfig;
pub use error::{Error, Result};
pub use pipeline::SkippedFile;

use std::path::PathBuf;
use tracing::info;

/// What a completed run produced
#[derive(Debug)]
pub struct MergeReport {
    /// Number of files that made it into the output
    pub merged: usize,

    /// Files dropped from the merge, in discovery order
    pub skipped: Vec<SkippedFile>,

    /// Where the output was written
    pub output: PathBuf,
}

/// Run one merge end to end: discover, decode in parallel, merge, encode.
///
/// Per-file decode failures are collected into the report; the run only
/// fails when nothing survives or the final write cannot complete.
pub async fn run(config: &MergeConfig) -> Result<MergeReport> {
    // Validate the bitrate before spending any time decoding
    encoder::lame_bitrate(config.bitrate_kbps)?;

    let files = discover::discover_files(&config.song_dir)?;
    if files.is_empty() {
        return Err(Error::NoValidInput(config.song_dir.clone()));
    }

    let total_bytes: u64 = files.iter().map(|f| f.size_bytes).sum();
    let workers = config.effective_workers(total_bytes);
    info!(
        "Found {} audio files ({:.1} MiB), using {} decode worker(s)",
        files.len(),
        total_bytes as f64 / (1024.0 * 1024.0),
        workers
    );

    // Channel pass-through: fall back to the first readable file's layout,
    // clamped to what MP3 can carry
    let target_channels = match config.channels {
        Some(channels) => channels,
        None => files
            .iter()
            .find_map(|f| audio::decoder::probe_channels(&f.path).ok())
            .map_or(2, |channels| channels.clamp(1, 2)),
    };

    let outcome =
        pipeline::dispatcher::decode_all(&files, config.sample_rate, target_channels, workers)
            .await?;
    if outcome.segments.is_empty() {
        return Err(Error::NoValidInput(config.song_dir.clone()));
    }

    let merged = pipeline::merger::merge(outcome.segments)?;
    info!(
        "Merged audio: {:.1}s at {} Hz, {} channel(s)",
        merged.duration_secs(),
        merged.sample_rate,
        merged.channels
    );

    encoder::encode_mp3(&merged, config.bitrate_kbps, &config.output)?;

    Ok(MergeReport {
        merged: files.len() - outcome.skipped.len(),
        skipped: outcome.skipped,
        output: config.output.clone(),
    })
}
