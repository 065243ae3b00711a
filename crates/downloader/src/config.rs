//! Configuration for download operations

use std::time::Duration;

/// User-Agent sent with every request; some providers reject requests that
/// lack a recognized browser identity.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Configuration for download operations
///
/// Injected into [`crate::http::HttpClient`] so resolution and streaming can
/// be pointed at a mock server in tests.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Connect/probe timeout. Streaming GETs use this as the connect timeout
    /// only, so a multi-gigabyte body is never cut off mid-transfer.
    pub timeout: Duration,
    pub user_agent: String,
    /// Optional proxy endpoint (http://, https://, socks5:// or socks5h://)
    pub proxy: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: BROWSER_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl DownloadConfig {
    pub fn with_proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.proxy = proxy.map(Into::into);
        self
    }
}
