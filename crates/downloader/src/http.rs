//! HTTP utilities
//!
//! Centralized HTTP client with integrated streaming download functionality:
//! client configuration (timeout, user agent, proxy), a probe client with
//! automatic redirects disabled, and the single chunk-by-chunk write loop
//! both download paths share.

use std::path::Path;
use std::time::Instant;

use futures::StreamExt;
use reqwest::{Client, Proxy, Response};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::DownloadConfig;
use crate::core::files::{atomic_rename, temp_path};
use crate::core::{DownloadError, FileOperation, ProgressCallback, ProgressEvent, Result};

/// HTTP client pair for resolve-then-stream downloads
///
/// The probe client never follows redirects, so a provider's 3xx answer is
/// observable along with its `Location` header. The streaming client follows
/// redirects and carries no overall timeout; only connecting is bounded.
pub struct HttpClient {
    client: Client,
    probe: Client,
}

impl HttpClient {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let proxy = match &config.proxy {
            Some(addr) => Some(Proxy::all(addr).map_err(|e| DownloadError::Configuration {
                message: format!("invalid proxy '{}': {}", addr, e),
            })?),
            None => None,
        };

        let mut client = Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(&config.user_agent);
        let mut probe = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none());

        if let Some(proxy) = proxy {
            client = client.proxy(proxy.clone());
            probe = probe.proxy(proxy);
        }

        let client = client.build().map_err(|e| DownloadError::Configuration {
            message: format!("failed to create HTTP client: {}", e),
        })?;
        let probe = probe.build().map_err(|e| DownloadError::Configuration {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, probe })
    }

    /// Metadata-only request with automatic redirect following disabled
    ///
    /// Returns the raw response so the caller can inspect 3xx/404 statuses
    /// and the `Location` header.
    pub async fn head_no_redirect(&self, url: &str, bearer: Option<&str>) -> Result<Response> {
        debug!("probing {}", url);
        let mut request = self.probe.head(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| DownloadError::HttpRequest {
            url: url.to_string(),
            source: e,
        })?;
        Ok(response)
    }

    /// Streaming GET, failed statuses surfaced as errors
    pub async fn get_stream(&self, url: &str, bearer: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| DownloadError::HttpRequest {
            url: url.to_string(),
            source: e,
        })?;
        let response = response
            .error_for_status()
            .map_err(|e| DownloadError::HttpRequest {
                url: url.to_string(),
                source: e,
            })?;
        Ok(response)
    }

    /// Stream a response body to a file in lockstep: read chunk, write
    /// chunk, advance progress
    ///
    /// Writes go through a `.part` file in the destination directory and are
    /// renamed into place only after the full body arrived, so the
    /// destination path never holds a truncated download. A cancellation
    /// token, when present, is honored between chunk reads; the partial
    /// `.part` file is left behind in that case.
    ///
    /// `buffer_capacity` sizes the write buffer between network reads and
    /// file writes (the two download paths tune this very differently).
    /// Returns the number of body bytes written.
    pub async fn stream_to_file(
        &self,
        response: Response,
        dest_path: &Path,
        buffer_capacity: usize,
        cancel: Option<&CancellationToken>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<u64> {
        let url = response.url().to_string();
        let total_size = response.content_length();
        debug!("streaming {} to {} (declared {:?} bytes)", url, dest_path.display(), total_size);

        if let Some(ref callback) = progress_callback {
            callback(ProgressEvent::DownloadStarted {
                url: url.clone(),
                total_size,
            });
        }

        let tmp = temp_path(dest_path);
        let file = fs::File::create(&tmp)
            .await
            .map_err(|e| DownloadError::FileSystem {
                path: tmp.clone(),
                operation: FileOperation::Create,
                source: e,
            })?;
        let mut writer = BufWriter::with_capacity(buffer_capacity, file);

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        let start_time = Instant::now();
        let mut last_progress_time = start_time;

        loop {
            let next = match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(DownloadError::Cancelled { url: url.clone() });
                        }
                        next = stream.next() => next,
                    }
                }
                None => stream.next().await,
            };

            let Some(chunk_result) = next else { break };
            let chunk = chunk_result.map_err(|e| DownloadError::HttpRequest {
                url: url.clone(),
                source: e,
            })?;

            // filter out keep-alive chunks
            if chunk.is_empty() {
                continue;
            }

            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::FileSystem {
                    path: tmp.clone(),
                    operation: FileOperation::Write,
                    source: e,
                })?;
            downloaded += chunk.len() as u64;

            // Report progress at most every 100ms to avoid spam
            let now = Instant::now();
            if now.duration_since(last_progress_time).as_millis() >= 100 {
                if let Some(ref callback) = progress_callback {
                    let elapsed = start_time.elapsed().as_secs_f64();
                    let speed = if elapsed > 0.0 {
                        downloaded as f64 / elapsed
                    } else {
                        0.0
                    };
                    callback(ProgressEvent::DownloadProgress {
                        url: url.clone(),
                        downloaded,
                        total: total_size,
                        speed_bps: speed,
                    });
                }
                last_progress_time = now;
            }
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::FileSystem {
                path: tmp.clone(),
                operation: FileOperation::Write,
                source: e,
            })?;
        let file = writer.into_inner();
        file.sync_all()
            .await
            .map_err(|e| DownloadError::FileSystem {
                path: tmp.clone(),
                operation: FileOperation::Write,
                source: e,
            })?;

        atomic_rename(&tmp, dest_path).await?;

        if let Some(ref callback) = progress_callback {
            callback(ProgressEvent::DownloadComplete {
                url: url.clone(),
                final_size: downloaded,
            });
        }

        debug!("stream completed: {} bytes", downloaded);
        Ok(downloaded)
    }
}
