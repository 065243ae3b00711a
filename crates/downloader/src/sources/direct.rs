//! Direct HTTP download source
//!
//! For providers whose final URL is already fully known: no auth header, no
//! redirect indirection, filename taken from the URL path itself.

use tracing::warn;

use crate::core::files::{guard_overwrite, prepare_output_dir};
use crate::core::{
    DownloadError, DownloadOutcome, DownloadRequest, ProgressCallback, ProgressEvent, Result,
};
use crate::http::HttpClient;
use crate::resolve::filename_from_url_path;

/// Write-buffer size for streaming; this path carries no large-file tuning.
pub const BLOCK_SIZE: usize = 1024;

/// Direct streaming download source
#[derive(Debug, Clone)]
pub struct DirectSource {
    /// Fully-known download URL; the final path segment names the file
    pub url: String,
}

impl DirectSource {
    pub fn new<U: Into<String>>(url: U) -> Self {
        Self { url: url.into() }
    }

    /// Filename this source will write, derived from the URL path and
    /// percent-decoded
    pub fn filename(&self) -> Result<String> {
        filename_from_url_path(&self.url)?.ok_or_else(|| DownloadError::FilenameUnresolved {
            url: self.url.clone(),
        })
    }

    /// Download the URL into the request's destination directory
    ///
    /// After the stream ends, received bytes are compared against the
    /// declared content length; a discrepancy is reported as a warning and
    /// recorded on the outcome but never raised, and the file is kept. No
    /// check happens when the server declared no length.
    pub async fn download(
        &self,
        http: &HttpClient,
        request: &DownloadRequest,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<DownloadOutcome> {
        prepare_output_dir(&request.destination).await?;

        let filename = self.filename()?;
        let dest_path = request.destination.join(&filename);
        guard_overwrite(&dest_path, request.overwrite)?;

        let response = http.get_stream(&self.url, None).await?;
        let declared_size = response.content_length().unwrap_or(0);

        let bytes_written = http
            .stream_to_file(
                response,
                &dest_path,
                BLOCK_SIZE,
                request.cancel.as_ref(),
                progress_callback.clone(),
            )
            .await?;

        let outcome = DownloadOutcome {
            path: dest_path,
            bytes_written,
            declared_size,
        };

        if let Some((expected, actual)) = outcome.size_mismatch() {
            let err = DownloadError::SizeMismatch {
                file: outcome.path.clone(),
                expected,
                actual,
            };
            warn!("{}", err);
            if let Some(ref callback) = progress_callback {
                callback(ProgressEvent::Warning {
                    url: self.url.clone(),
                    message: err.to_string(),
                });
            }
        }

        Ok(outcome)
    }
}
