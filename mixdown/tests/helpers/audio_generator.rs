//! Audio test file generation utilities
//!
//! Generates deterministic WAV files with known characteristics so the
//! pipeline tests do not depend on binary fixtures:
//! - sine waves at a given frequency, rate, and channel count
//! - silence
//!
//! The merge tests identify which input ended up where in the output by
//! giving each input its own frequency.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

fn spec(sample_rate: u32, channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Generate a sine wave WAV file.
///
/// # Arguments
/// * `path` - Output file path
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Channel count (the same wave goes to every channel)
/// * `duration_ms` - Duration in milliseconds
/// * `frequency_hz` - Sine frequency (e.g. 440.0 for A4)
/// * `amplitude` - Amplitude 0.0-1.0 (0.5 recommended to avoid clipping)
pub fn write_sine_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    duration_ms: u64,
    frequency_hz: f32,
    amplitude: f32,
) -> Result<(), hound::Error> {
    let mut writer = WavWriter::create(path, spec(sample_rate, channels))?;

    let frames = sample_rate as u64 * duration_ms / 1000;
    for frame_idx in 0..frames {
        let t = frame_idx as f32 / sample_rate as f32;
        let value = (2.0 * PI * frequency_hz * t).sin() * amplitude;
        let sample = (value * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()
}

/// Generate a silent WAV file.
pub fn write_silent_wav(
    path: &Path,
    sample_rate: u32,
    channels: u16,
    duration_ms: u64,
) -> Result<(), hound::Error> {
    let mut writer = WavWriter::create(path, spec(sample_rate, channels))?;

    let samples = sample_rate as u64 * duration_ms / 1000 * channels as u64;
    for _ in 0..samples {
        writer.write_sample(0i16)?;
    }

    writer.finalize()
}
