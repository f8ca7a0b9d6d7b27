//! Decoding and normalization of source audio
//!
//! One call per input file: decode to native PCM, remix to the target
//! channel count, resample to the target rate.

pub mod decoder;
pub mod remix;
pub mod resampler;
pub mod types;

pub use types::AudioSegment;

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Decode one file and normalize it to the target rate and channel count.
///
/// This is the unit of work the dispatcher hands to each decode worker.
pub fn decode_and_normalize(
    path: &Path,
    target_rate: u32,
    target_channels: u16,
) -> Result<AudioSegment> {
    let (samples, native_rate, native_channels) = decoder::decode_file(path)?;
    let samples = remix::remix(samples, native_channels, target_channels);
    let samples = resampler::resample(samples, native_rate, target_rate, target_channels)?;

    debug!(
        "Normalized {}: {} Hz / {} ch -> {} Hz / {} ch",
        path.display(),
        native_rate,
        native_channels,
        target_rate,
        target_channels
    );

    Ok(AudioSegment {
        samples,
        sample_rate: target_rate,
        channels: target_channels,
    })
}
