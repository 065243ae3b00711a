//! File operation utilities
//!
//! Centralized output-path handling so both download paths guard and write
//! files the same way.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::core::{DownloadError, FileOperation, Result};

/// Ensure the output directory exists and is actually a directory
///
/// Rejects a path that exists as a regular file, then creates the directory
/// (including parents) when missing.
pub async fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.is_file() {
        return Err(DownloadError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| DownloadError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::CreateDir,
            source: e,
        })?;

    Ok(())
}

/// Refuse to touch an existing destination unless overwrite was requested
///
/// Must be called with the path built from the RESOLVED filename, not the
/// user-supplied URL.
pub fn guard_overwrite(dest_path: &Path, overwrite: bool) -> Result<()> {
    if dest_path.exists() && !overwrite {
        return Err(DownloadError::AlreadyExists {
            path: dest_path.to_path_buf(),
        });
    }
    Ok(())
}

/// Temporary path for an in-progress download, in the same directory as the
/// destination so the final rename never crosses filesystems
pub fn temp_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest_path.with_file_name(name)
}

/// Atomically rename a temporary file to its final destination
///
/// The destination either holds the complete download or nothing; a
/// truncated stream leaves only the .part file behind.
pub async fn atomic_rename(temp_path: &Path, dest_path: &Path) -> Result<()> {
    fs::rename(temp_path, dest_path)
        .await
        .map_err(|e| DownloadError::FileSystem {
            path: dest_path.to_path_buf(),
            operation: FileOperation::Move,
            source: e,
        })?;
    debug!("renamed {} to {}", temp_path.display(), dest_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn temp_path_appends_part_suffix() {
        let dest = Path::new("/downloads/model v1.safetensors");
        assert_eq!(
            temp_path(dest),
            PathBuf::from("/downloads/model v1.safetensors.part")
        );
    }

    #[test]
    fn guard_overwrite_allows_missing_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("new-file.bin");
        assert!(guard_overwrite(&dest, false).is_ok());
    }

    #[test]
    fn guard_overwrite_rejects_existing_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("taken.bin");
        std::fs::write(&dest, b"old contents").unwrap();

        let err = guard_overwrite(&dest, false).unwrap_err();
        assert!(matches!(err, DownloadError::AlreadyExists { ref path } if *path == dest));
        // the existing bytes are untouched
        assert_eq!(std::fs::read(&dest).unwrap(), b"old contents");
    }

    #[test]
    fn guard_overwrite_accepts_existing_file_when_requested() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("taken.bin");
        std::fs::write(&dest, b"old contents").unwrap();
        assert!(guard_overwrite(&dest, true).is_ok());
    }

    #[tokio::test]
    async fn prepare_output_dir_rejects_plain_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        let err = prepare_output_dir(&file).await.unwrap_err();
        assert!(matches!(err, DownloadError::NotADirectory { .. }));
    }

    #[tokio::test]
    async fn prepare_output_dir_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        prepare_output_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
