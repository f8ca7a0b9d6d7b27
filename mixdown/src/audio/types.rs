//! Core audio data types

/// Decoded, normalized audio for one input file
///
/// Samples are interleaved f32 in the range [-1.0, 1.0]. Every segment
/// handed to the merger shares the run's target sample rate and channel
/// count; the decode stage guarantees this.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Interleaved samples
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count
    pub channels: u16,
}

impl AudioSegment {
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
