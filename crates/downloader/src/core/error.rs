//! Error types for the download pipeline with context for operator messages

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving, guarding, or streaming a download
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP-related errors with context
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider reports that the requested file does not exist
    #[error("file not found: '{url}'")]
    NotFound { url: String },

    /// The resolution probe returned something other than a redirect
    #[error("no redirect found probing '{url}' (status {status}), something went wrong")]
    NoRedirect { url: String, status: u16 },

    /// The signed URL carried no usable filename
    #[error("unable to determine filename for '{url}'")]
    FilenameUnresolved { url: String },

    /// Destination file present and overwrite was not requested
    #[error("output file '{path}' already exists, pass --overwrite to overwrite it")]
    AlreadyExists { path: PathBuf },

    /// The output path collides with an existing plain file
    #[error("the specified output path '{path}' is a file, not a folder")]
    NotADirectory { path: PathBuf },

    /// Declared and received byte counts differ
    ///
    /// The direct download path constructs and reports this without
    /// propagating it; the file on disk is kept.
    #[error("size mismatch for '{file}': expected {expected} bytes, got {actual} bytes")]
    SizeMismatch {
        file: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// File system I/O errors with file context
    #[error("file operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// URL parsing errors
    #[error("invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Download cancelled between chunk reads
    #[error("download cancelled: {url}")]
    Cancelled { url: String },

    /// Configuration errors (bad proxy string, unresolvable home directory)
    #[error("invalid configuration: {message}")]
    Configuration { message: String },
}

/// Types of file operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
    Move,
    Metadata,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::Metadata => write!(f, "reading metadata"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;

impl DownloadError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DownloadError::HttpRequest { .. } => "http_request",
            DownloadError::NotFound { .. } => "not_found",
            DownloadError::NoRedirect { .. } => "no_redirect",
            DownloadError::FilenameUnresolved { .. } => "filename_unresolved",
            DownloadError::AlreadyExists { .. } => "already_exists",
            DownloadError::NotADirectory { .. } => "not_a_directory",
            DownloadError::SizeMismatch { .. } => "size_mismatch",
            DownloadError::FileSystem { .. } => "file_system",
            DownloadError::InvalidUrl { .. } => "invalid_url",
            DownloadError::Cancelled { .. } => "cancelled",
            DownloadError::Configuration { .. } => "configuration",
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        DownloadError::HttpRequest { url, source: error }
    }
}
