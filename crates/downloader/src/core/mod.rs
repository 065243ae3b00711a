//! Core types used throughout the downloader
//!
//! The fundamental types every other module depends on: the per-invocation
//! request, the resolved target, the outcome, errors, and progress plumbing.

pub mod error;
pub mod files;
pub mod progress;

// Re-export main types for convenience
pub use error::{DownloadError, FileOperation, Result};
pub use progress::{
    BarReporter, ConsoleProgressReporter, IntoProgressCallback, NullProgressReporter,
    ProgressCallback, ProgressEvent, ProgressReporter,
};

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

/// A download request, immutable for the duration of one invocation
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Directory where the file should be saved
    pub destination: PathBuf,
    /// Whether an existing destination file may be replaced
    pub overwrite: bool,
    /// Optional cancellation token, checked between chunk reads
    pub cancel: Option<CancellationToken>,
}

impl DownloadRequest {
    pub fn new<P: Into<PathBuf>>(destination: P) -> Self {
        Self {
            destination: destination.into(),
            overwrite: false,
            cancel: None,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// The true byte source and destination name discovered by resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Final URL the bytes are fetched from (signed URL for providers that
    /// front downloads behind a redirect)
    pub download_url: String,
    /// Destination file name, percent-decoded
    pub filename: String,
    /// Declared total size in bytes, 0 when unknown at resolution time
    pub total_size: u64,
}

/// Result of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Final destination path of the written file
    pub path: PathBuf,
    /// Bytes actually received and written
    pub bytes_written: u64,
    /// Content length declared by the server, 0 when absent
    pub declared_size: u64,
}

impl DownloadOutcome {
    /// Declared-vs-received discrepancy, if any
    ///
    /// Returns `(expected, actual)`. No check is possible when the server
    /// declared no size; a 0 declared size always passes.
    pub fn size_mismatch(&self) -> Option<(u64, u64)> {
        (self.declared_size != 0 && self.bytes_written != self.declared_size)
            .then_some((self.declared_size, self.bytes_written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_reports_short_read() {
        let outcome = DownloadOutcome {
            path: PathBuf::from("/downloads/file.bin"),
            bytes_written: 900,
            declared_size: 1000,
        };
        assert_eq!(outcome.size_mismatch(), Some((1000, 900)));
    }

    #[test]
    fn size_mismatch_passes_exact_read() {
        let outcome = DownloadOutcome {
            path: PathBuf::from("/downloads/file.bin"),
            bytes_written: 1000,
            declared_size: 1000,
        };
        assert_eq!(outcome.size_mismatch(), None);
    }

    #[test]
    fn size_mismatch_skipped_when_size_undeclared() {
        let outcome = DownloadOutcome {
            path: PathBuf::from("/downloads/file.bin"),
            bytes_written: 900,
            declared_size: 0,
        };
        assert_eq!(outcome.size_mismatch(), None);
    }
}
