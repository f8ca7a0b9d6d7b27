//! Sample rate conversion using rubato
//!
//! Brings every decoded segment to the configured output rate so the
//! merger only ever sees one rate.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Resample interleaved audio from `input_rate` to `output_rate`.
///
/// The whole segment is processed as a single chunk. Input already at the
/// target rate passes through untouched.
pub fn resample(
    input: Vec<f32>,
    input_rate: u32,
    output_rate: u32,
    channels: u16,
) -> Result<Vec<f32>> {
    if input_rate == output_rate || input.is_empty() {
        return Ok(input);
    }

    let channels = channels.max(1) as usize;
    let planar_input = deinterleave(&input, channels);
    let input_frames = planar_input[0].len();
    if input_frames == 0 {
        return Ok(Vec::new());
    }

    debug!(
        "Resampling {} frames from {} Hz to {} Hz ({} channels)",
        input_frames, input_rate, output_rate, channels
    );

    let mut resampler = FastFixedIn::<f32>::new(
        output_rate as f64 / input_rate as f64,
        1.0, // fixed ratio for the whole run
        PolynomialDegree::Septic,
        input_frames,
        channels,
    )
    .map_err(|e| Error::Resample(format!("failed to create resampler: {e}")))?;

    let planar_output = resampler
        .process(&planar_input, None)
        .map_err(|e| Error::Resample(e.to_string()))?;

    Ok(interleave(&planar_output))
}

/// [L, R, L, R, ...] -> [[L, L, ...], [R, R, ...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];

    for frame in samples.chunks_exact(channels) {
        for (plane, &sample) in planar.iter_mut().zip(frame) {
            plane.push(sample);
        }
    }

    planar
}

/// [[L, L, ...], [R, R, ...]] -> [L, R, L, R, ...]
fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let channels = planar.len();
    let frames = planar.first().map_or(0, Vec::len);
    let mut interleaved = Vec::with_capacity(frames * channels);

    for frame_idx in 0..frames {
        for plane in planar {
            interleaved.push(plane[frame_idx]);
        }
    }

    interleaved
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_passes_through() {
        let input = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let output = resample(input.clone(), 44100, 44100, 2).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        let output = resample(Vec::new(), 22050, 44100, 2).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_upsample_roughly_doubles_frames() {
        let frames = 2000;
        let mut input = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let t = i as f32 / 22050.0;
            let sample = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            input.push(sample);
            input.push(sample);
        }

        let output = resample(input, 22050, 44100, 2).unwrap();
        let output_frames = output.len() / 2;

        let expected = frames * 2;
        assert!(
            output_frames.abs_diff(expected) <= 20,
            "expected ~{expected} frames, got {output_frames}"
        );
    }

    #[test]
    fn test_downsample_mono() {
        let frames = 4800;
        let input: Vec<f32> = (0..frames)
            .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 48000.0).sin())
            .collect();

        let output = resample(input, 48000, 44100, 1).unwrap();

        let expected = (frames as f64 * 44100.0 / 48000.0) as usize;
        assert!(
            output.len().abs_diff(expected) <= 20,
            "expected ~{expected} frames, got {}",
            output.len()
        );
    }

    #[test]
    fn test_deinterleave_interleave_roundtrip() {
        let interleaved = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let planar = deinterleave(&interleaved, 2);

        assert_eq!(planar[0], vec![1.0, 3.0, 5.0]);
        assert_eq!(planar[1], vec![2.0, 4.0, 6.0]);
        assert_eq!(interleave(&planar), interleaved);
    }
}
