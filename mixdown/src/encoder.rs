//! MP3 encoding and atomic output placement
//!
//! Encodes the merged buffer with LAME at the configured constant bitrate.
//! The encoded stream goes to a temporary file next to the destination and
//! is moved into place only after the whole file is written, so a failed
//! run leaves no partial output behind.

use crate::error::{Error, Result};
use crate::pipeline::MergedBuffer;
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Map a kbps value onto the LAME CBR bitrate table.
pub(crate) fn lame_bitrate(kbps: u32) -> Result<Bitrate> {
    let bitrate = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(Error::Config(format!(
                "unsupported bitrate {other}k (supported: 8, 16, 24, 32, 40, 48, 64, 80, \
                 96, 112, 128, 160, 192, 224, 256, 320)"
            )))
        }
    };
    Ok(bitrate)
}

fn write_error(path: &Path, source: std::io::Error) -> Error {
    if source.kind() == std::io::ErrorKind::PermissionDenied {
        Error::WritePermission {
            path: path.to_path_buf(),
            source,
        }
    } else {
        Error::Io(source)
    }
}

/// Encode `buffer` as MP3 at `kbps` and write it to `output`.
///
/// # Errors
/// - `Error::Config` for a bitrate outside the LAME table
/// - `Error::Encode` when the codec rejects the stream parameters or fails
/// - `Error::WritePermission` / `Error::Io` when the destination cannot be
///   written
pub fn encode_mp3(buffer: &MergedBuffer, kbps: u32, output: &Path) -> Result<()> {
    let bitrate = lame_bitrate(kbps)?;

    debug!(
        "Encoding {} frames at {} Hz, {} channel(s), {} kbps",
        buffer.frames(),
        buffer.sample_rate,
        buffer.channels,
        kbps
    );

    let mut builder =
        Builder::new().ok_or_else(|| Error::Encode("failed to allocate LAME encoder".into()))?;
    builder
        .set_num_channels(buffer.channels as u8)
        .map_err(|e| Error::Encode(format!("rejected channel count {}: {e}", buffer.channels)))?;
    builder
        .set_sample_rate(buffer.sample_rate)
        .map_err(|e| Error::Encode(format!("rejected sample rate {}: {e}", buffer.sample_rate)))?;
    builder
        .set_brate(bitrate)
        .map_err(|e| Error::Encode(format!("rejected bitrate {kbps}k: {e}")))?;
    builder
        .set_quality(Quality::Best)
        .map_err(|e| Error::Encode(format!("rejected quality setting: {e}")))?;
    let mut encoder = builder
        .build()
        .map_err(|e| Error::Encode(format!("failed to initialize encoder: {e}")))?;

    // LAME consumes i16 PCM; scale and clamp from f32
    let pcm: Vec<i16> = buffer
        .samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();

    let mut mp3 = Vec::new();
    mp3.reserve(mp3lame_encoder::max_required_buffer_size(buffer.frames()));

    let written = match buffer.channels {
        1 => encoder.encode(MonoPcm(&pcm), mp3.spare_capacity_mut()),
        _ => encoder.encode(InterleavedPcm(&pcm), mp3.spare_capacity_mut()),
    }
    .map_err(|e| Error::Encode(format!("encode failed: {e}")))?;
    // SAFETY: `encode` initialized `written` bytes of the spare capacity
    unsafe { mp3.set_len(mp3.len() + written) };

    mp3.reserve(7200); // LAME worst-case flush tail
    let written = encoder
        .flush::<FlushNoGap>(mp3.spare_capacity_mut())
        .map_err(|e| Error::Encode(format!("flush failed: {e}")))?;
    // SAFETY: as above, for the flushed tail
    unsafe { mp3.set_len(mp3.len() + written) };

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_error(output, e))?;
    tmp.write_all(&mp3).map_err(|e| write_error(output, e))?;
    tmp.persist(output).map_err(|e| write_error(output, e.error))?;

    info!("Wrote {} ({} bytes)", output.display(), mp3.len());
    Ok(())
}

// ========================================
// Tests
// ========================================
