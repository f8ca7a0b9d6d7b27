//! Source file discovery
//!
//! Scans the source directory for recognized audio files and fixes the
//! merge order before any decoding starts.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions accepted during the directory scan (case-insensitive)
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["aac", "flac", "m4a", "mp3", "ogg", "wav"];

/// One discovered source file
#[derive(Debug, Clone)]
pub struct AudioFile {
    /// Absolute or relative path, as found under the source directory
    pub path: PathBuf,

    /// Position in the sorted discovery order; the output preserves it
    pub index: usize,

    /// On-disk size, used to scale the automatic worker count
    pub size_bytes: u64,
}

/// List the audio files directly inside `dir`, in merge order.
///
/// Only regular files with a recognized extension are returned; the scan
/// does not recurse. Ordering is byte-wise lexicographic on the file name,
/// so repeated runs over unchanged input merge identically. Names that
/// differ only by case are distinct keys and also order byte-wise
/// ("B.mp3" sorts before "a.mp3").
pub fn discover_files(dir: &Path) -> Result<Vec<AudioFile>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut found: Vec<(PathBuf, u64)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        let recognized = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
        if !recognized {
            continue;
        }

        let size_bytes = entry.metadata()?.len();
        found.push((path, size_bytes));
    }

    found.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));

    debug!("Discovered {} audio files in {}", found.len(), dir.display());

    Ok(found
        .into_iter()
        .enumerate()
        .map(|(index, (path, size_bytes))| AudioFile {
            path,
            index,
            size_bytes,
        })
        .collect())
}

// ========================================
// Tests
// ========================================
