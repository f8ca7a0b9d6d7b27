//! Channel remixing
//!
//! Converts interleaved PCM between channel layouts: duplication up to
//! stereo, averaged downmix to mono, even/odd fold for wider sources.

/// Remix interleaved `samples` from `channels` to `target` channels.
///
/// Rules:
/// - same layout: returned unchanged
/// - mono to stereo: the channel is duplicated
/// - any layout to mono: all channels are averaged per frame
/// - wider than stereo to stereo: even-indexed channels average into the
///   left, odd-indexed into the right
/// - targets wider than the source duplicate the mono fold
pub fn remix(samples: Vec<f32>, channels: u16, target: u16) -> Vec<f32> {
    if channels == target || channels == 0 || target == 0 {
        return samples;
    }

    let src = channels as usize;
    let frames = samples.len() / src;

    match (src, target) {
        (_, 1) => {
            let mut mono = Vec::with_capacity(frames);
            for frame in samples.chunks_exact(src) {
                mono.push(frame.iter().sum::<f32>() / src as f32);
            }
            mono
        }
        (1, 2) => {
            let mut stereo = Vec::with_capacity(frames * 2);
            for &sample in &samples {
                stereo.push(sample);
                stereo.push(sample);
            }
            stereo
        }
        (_, 2) => {
            // Fold wider layouts: even channels left, odd channels right
            let left_count = src.div_ceil(2) as f32;
            let right_count = (src / 2) as f32;
            let mut stereo = Vec::with_capacity(frames * 2);
            for frame in samples.chunks_exact(src) {
                let mut left = 0.0f32;
                let mut right = 0.0f32;
                for (ch, &sample) in frame.iter().enumerate() {
                    if ch % 2 == 0 {
                        left += sample;
                    } else {
                        right += sample;
                    }
                }
                stereo.push(left / left_count);
                stereo.push(right / right_count);
            }
            stereo
        }
        _ => {
            // Unusual wide targets: spread the mono fold across every channel
            let mono = remix(samples, channels, 1);
            let mut out = Vec::with_capacity(frames * target as usize);
            for &sample in &mono {
                out.extend(std::iter::repeat(sample).take(target as usize));
            }
            out
        }
    }
}
