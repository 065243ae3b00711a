//! Persisted bearer-token store
//!
//! The token lives as plain text in a fixed per-user location
//! (`~/.civitai/config`), read at the start of each invocation and written
//! only when first captured. The store is injected by path so callers and
//! tests can point it anywhere.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::core::{DownloadError, FileOperation, Result};

/// Bearer-token store at a fixed per-user path
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the conventional per-user location, `<home>/.civitai/config`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| DownloadError::Configuration {
            message: "unable to determine home directory".to_string(),
        })?;
        Ok(Self {
            path: home.join(".civitai").join("config"),
        })
    }

    /// Store at an explicit path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token, trimmed; `Ok(None)` when the file is missing
    /// or holds only whitespace
    pub async fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    debug!("loaded API token from {}", self.path.display());
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DownloadError::FileSystem {
                path: self.path.clone(),
                operation: FileOperation::Read,
                source: e,
            }),
        }
    }

    /// Persist the token, creating parent directories as needed
    pub async fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::FileSystem {
                    path: parent.to_path_buf(),
                    operation: FileOperation::CreateDir,
                    source: e,
                })?;
        }
        fs::write(&self.path, token)
            .await
            .map_err(|e| DownloadError::FileSystem {
                path: self.path.clone(),
                operation: FileOperation::Write,
                source: e,
            })?;
        debug!("stored API token at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn load_returns_none_when_missing() {
        let dir = tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join("config"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn store_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join(".civitai").join("config"));

        store.store("tok-123").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("tok-123".to_string()));
    }

    #[tokio::test]
    async fn load_trims_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "  tok-123\n").unwrap();

        let store = TokenStore::with_path(&path);
        assert_eq!(store.load().await.unwrap(), Some("tok-123".to_string()));
    }

    #[tokio::test]
    async fn load_treats_blank_file_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, "\n  \n").unwrap();

        let store = TokenStore::with_path(&path);
        assert_eq!(store.load().await.unwrap(), None);
    }
}
