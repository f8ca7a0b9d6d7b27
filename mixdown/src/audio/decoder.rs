//! Audio decoding using symphonia
//!
//! Decodes MP3, WAV, FLAC, AAC/M4A and Ogg Vorbis input to interleaved
//! f32 PCM in the file's native sample rate and channel layout.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

fn decode_err(path: &Path, reason: impl Into<String>) -> Error {
    Error::Decode {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Open `path` and probe its container format.
fn probe_format(path: &Path) -> Result<Box<dyn FormatReader>> {
    let file = File::open(path)
        .map_err(|e| decode_err(path, format!("failed to open file: {e}")))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Hint the probe with the file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err(path, format!("failed to probe format: {e}")))?;

    Ok(probed.format)
}

/// Decode an entire audio file to PCM samples.
///
/// # Returns
/// - `samples`: interleaved f32 samples in the file's native channel layout
/// - `sample_rate`: native sample rate
/// - `channels`: native channel count
///
/// # Errors
/// `Error::Decode` when the file cannot be opened, its format is not
/// recognized, or no audio frames come out of the decoder.
pub fn decode_file(path: &Path) -> Result<(Vec<f32>, u32, u16)> {
    debug!("Decoding {}", path.display());

    let mut format = probe_format(path)?;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_err(path, "no audio track found"))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| decode_err(path, "sample rate not advertised"))?;
    let channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .filter(|&c| c > 0)
        .ok_or_else(|| decode_err(path, "channel count not advertised"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(path, format!("failed to create decoder: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                // Salvage whatever decoded so far from a truncated stream
                warn!("Stopping decode of {}: {}", path.display(), e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Dropping corrupt packet in {}: {}", path.display(), e);
                continue;
            }
        };

        // Reuse one conversion buffer across packets; symphonia handles the
        // per-format sample conversion to f32.
        let needed = decoded.capacity() as u64 * channels as u64;
        if sample_buf
            .as_ref()
            .map_or(true, |buf| (buf.capacity() as u64) < needed)
        {
            sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, *decoded.spec()));
        }
        if let Some(buf) = sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        return Err(decode_err(path, "no audio frames decoded"));
    }

    debug!(
        "Decoded {}: {} frames at {} Hz, {} channel(s)",
        path.display(),
        samples.len() / channels as usize,
        sample_rate,
        channels
    );

    Ok((samples, sample_rate, channels))
}

/// Read the native channel count from the file header without decoding.
///
/// Used to resolve the channel pass-through default before dispatch.
pub fn probe_channels(path: &Path) -> Result<u16> {
    let format = probe_format(path)?;

    format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .and_then(|t| t.codec_params.channels)
        .map(|c| c.count() as u16)
        .filter(|&c| c > 0)
        .ok_or_else(|| decode_err(path, "channel count not advertised"))
}

// ========================================
// Tests
// ========================================
