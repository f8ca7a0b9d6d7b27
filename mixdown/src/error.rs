//! Error types for mixdown
//!
//! Defines the crate error type using thiserror for clear error propagation.
//! Per-file failures (`Decode`, `Resample`) are recoverable at the dispatch
//! boundary; everything else aborts the run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mixdown
#[derive(Error, Debug)]
pub enum Error {
    /// Source directory missing or not a directory
    #[error("source directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Per-file decode failure; the file is skipped, the run continues
    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// Resampler construction or processing failure
    #[error("resample error: {0}")]
    Resample(String),

    /// No discovered file survived decoding (or none were found)
    #[error("no decodable audio files in {}", .0.display())]
    NoValidInput(PathBuf),

    /// Zero segments reached the merger
    #[error("nothing to merge")]
    EmptyMerge,

    /// MP3 encoder failure
    #[error("MP3 encode error: {0}")]
    Encode(String),

    /// Destination cannot be written
    #[error("destination not writable: {}: {source}", .path.display())]
    WritePermission {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using mixdown Error
pub type Result<T> = std::result::Result<T, Error>;
