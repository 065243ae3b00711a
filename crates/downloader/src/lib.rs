//! Downloader library
//!
//! Streaming file downloads for model-hosting providers, shared by the
//! `civitai-dl` and `hf-dl` binaries. Both download paths have the same
//! shape: resolve the true byte source and destination filename, guard
//! against accidental overwrite, stream the body to a temp file in lockstep
//! with progress reporting, and rename into place on success.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use downloader::{
//!     CivitaiSource, DownloadConfig, DownloadRequest, HttpClient,
//! };
//!
//! # async fn example() -> downloader::Result<()> {
//! let config = DownloadConfig::default();
//! let http = HttpClient::new(&config)?;
//!
//! let source = CivitaiSource::new(
//!     "https://civitai.com/api/download/models/46846",
//!     "my-api-token",
//! );
//!
//! // Resolve first; this is also the --inspect dry run.
//! let target = source.resolve(&http).await?;
//! println!("will save as {}", target.filename);
//!
//! let request = DownloadRequest::new("/workspace/models").with_overwrite(false);
//! let outcome = source.download(&http, &target, &request, None).await?;
//! println!("saved to {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod http;
pub mod resolve;
pub mod sources;
pub mod token;

// Re-export main types for convenience
pub use config::{BROWSER_USER_AGENT, DownloadConfig};
pub use core::{
    BarReporter, ConsoleProgressReporter, DownloadError, DownloadOutcome, DownloadRequest,
    FileOperation, IntoProgressCallback, NullProgressReporter, ProgressCallback, ProgressEvent,
    ProgressReporter, ResolvedTarget, Result,
};
pub use http::HttpClient;
pub use sources::{CivitaiSource, DirectSource};
pub use token::TokenStore;
