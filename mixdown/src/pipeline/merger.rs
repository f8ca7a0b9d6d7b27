//! Segment concatenation
//!
//! Joins surviving segments into one continuous buffer, in discovery
//! order. Plain append: no crossfade, no silence trimming.

use crate::audio::AudioSegment;
use crate::error::{Error, Result};
use tracing::debug;

/// Concatenation of every surviving segment
#[derive(Debug)]
pub struct MergedBuffer {
    /// Interleaved samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count
    pub channels: u16,
}

impl MergedBuffer {
    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.sample_rate as f64
        }
    }
}

/// Concatenate `segments` in the order given.
///
/// All segments share one sample rate and channel count; the decode stage
/// guarantees this before anything reaches the merger.
pub fn merge(segments: Vec<AudioSegment>) -> Result<MergedBuffer> {
    let Some(first) = segments.first() else {
        return Err(Error::EmptyMerge);
    };
    let sample_rate = first.sample_rate;
    let channels = first.channels;
    debug_assert!(segments
        .iter()
        .all(|s| s.sample_rate == sample_rate && s.channels == channels));

    let total: usize = segments.iter().map(|s| s.samples.len()).sum();
    let mut samples = Vec::with_capacity(total);
    for segment in &segments {
        samples.extend_from_slice(&segment.samples);
    }

    debug!(
        "Merged {} segments into {} frames",
        segments.len(),
        samples.len() / channels.max(1) as usize
    );

    Ok(MergedBuffer {
        samples,
        sample_rate,
        channels,
    })
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(samples: Vec<f32>) -> AudioSegment {
        AudioSegment {
            samples,
            sample_rate: 44100,
            channels: 2,
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(merge(Vec::new()), Err(Error::EmptyMerge)));
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let merged = merge(vec![
            segment(vec![0.1, 0.2]),
            segment(vec![0.3, 0.4]),
            segment(vec![0.5, 0.6]),
        ])
        .unwrap();

        assert_eq!(merged.samples, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        assert_eq!(merged.sample_rate, 44100);
        assert_eq!(merged.channels, 2);
    }

    #[test]
    fn test_single_segment_is_identity() {
        let merged = merge(vec![segment(vec![0.7, -0.7, 0.1, -0.1])]).unwrap();
        assert_eq!(merged.samples, vec![0.7, -0.7, 0.1, -0.1]);
        assert_eq!(merged.frames(), 2);
    }
}
