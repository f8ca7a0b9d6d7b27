//! Parallel decode dispatch
//!
//! Fans per-file decode/normalize work across a bounded worker pool and
//! restores discovery order afterwards. One tokio task per file acquires a
//! semaphore permit, runs the blocking decode on the blocking thread pool,
//! and reports back keyed by discovery index. A failing file becomes a
//! skip entry; it never cancels in-flight work.

use crate::audio::{self, AudioSegment};
use crate::discover::AudioFile;
use crate::error::{Error, Result};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// A file dropped from the merge, with the reason it was dropped
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of dispatching a whole directory
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Segments in discovery order, skipped files removed
    pub segments: Vec<AudioSegment>,

    /// Files that failed to decode, in discovery order
    pub skipped: Vec<SkippedFile>,
}

/// Decode and normalize every file with up to `workers` concurrent jobs.
///
/// Completion order is arbitrary; results are re-keyed by discovery index
/// so the merger sees them in directory order.
pub async fn decode_all(
    files: &[AudioFile],
    target_rate: u32,
    target_channels: u16,
    workers: usize,
) -> Result<DispatchOutcome> {
    debug!(
        "Dispatching {} files across {} workers (target {} Hz, {} ch)",
        files.len(),
        workers,
        target_rate,
        target_channels
    );

    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let progress = ProgressBar::new(files.len() as u64);

    let mut handles = Vec::with_capacity(files.len());
    for file in files {
        let semaphore = Arc::clone(&semaphore);
        let progress = progress.clone();
        let path = file.path.clone();
        let index = file.index;

        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            let result = tokio::task::spawn_blocking(move || {
                audio::decode_and_normalize(&path, target_rate, target_channels)
            })
            .await;
            progress.inc(1);
            (index, result)
        }));
    }

    // Full barrier: every worker completes before merge/encode may start
    let mut slots: Vec<Option<Result<AudioSegment>>> = (0..files.len()).map(|_| None).collect();
    for handle in handles {
        let (index, result) = handle
            .await
            .map_err(|e| Error::Internal(format!("decode task failed: {e}")))?;

        let result = match result {
            Ok(decoded) => decoded,
            // A panicking decoder loses only its own file
            Err(join_err) => Err(Error::Decode {
                path: files[index].path.clone(),
                reason: format!("decode worker panicked: {join_err}"),
            }),
        };
        slots[index] = Some(result);
    }
    progress.finish_and_clear();

    let mut segments = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for (file, slot) in files.iter().zip(slots) {
        match slot {
            Some(Ok(segment)) => segments.push(segment),
            Some(Err(error)) => {
                warn!("Skipping {}: {}", file.path.display(), error);
                let reason = match error {
                    Error::Decode { reason, .. } => reason,
                    other => other.to_string(),
                };
                skipped.push(SkippedFile {
                    path: file.path.clone(),
                    reason,
                });
            }
            None => {
                return Err(Error::Internal(format!(
                    "no decode result for {}",
                    file.path.display()
                )))
            }
        }
    }

    Ok(DispatchOutcome { segments, skipped })
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_file_list() {
        let outcome = decode_all(&[], 44100, 2, 4).await.unwrap();
        assert!(outcome.segments.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_files_are_skipped_in_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp3"), "junk a").unwrap();
        std::fs::write(dir.path().join("b.mp3"), "junk b").unwrap();

        let files = discover::discover_files(dir.path()).unwrap();
        let outcome = decode_all(&files, 44100, 2, 2).await.unwrap();

        assert!(outcome.segments.is_empty());
        assert_eq!(outcome.skipped.len(), 2);
        assert!(outcome.skipped[0].path.ends_with("a.mp3"));
        assert!(outcome.skipped[1].path.ends_with("b.mp3"));
    }

    #[tokio::test]
    async fn test_worker_bound_of_zero_is_clamped() {
        // A zero bound must not deadlock the dispatcher
        let outcome = decode_all(&[], 44100, 2, 0).await.unwrap();
        assert!(outcome.segments.is_empty());
    }
}
