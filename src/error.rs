//! Error types shared by the scrape and clean stages.
//!
//! [`AppError`] covers everything that can stop a run or a single date's crawl.
//! Record-level extraction failures live in [`ExtractionFailed`] because they are
//! consumed by the crawler and never leave it.

use std::path::PathBuf;

/// Errors surfaced by configuration, the content API client, and file I/O.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed date string or an inverted range. Raised before any request is sent.
    #[error("invalid date range: {message}")]
    InvalidRange { message: String },

    /// No API credential was supplied on the command line or in the environment.
    #[error("missing API credential: set --api-key or the {var} environment variable")]
    MissingCredential { var: &'static str },

    /// Connection failure or a non-success HTTP status.
    #[error("transport error for {date} at offset {offset}: {message}")]
    Transport {
        date: String,
        offset: usize,
        message: String,
    },

    /// Successful status, but the body is not JSON.
    #[error("malformed response for {date} at offset {offset}: {message}")]
    MalformedResponse {
        date: String,
        offset: usize,
        message: String,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// (De)serialization of a persisted record set.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for request failures: transport errors and bodies that are not JSON.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            AppError::Transport { .. } | AppError::MalformedResponse { .. }
        )
    }
}

/// Why a raw story did not become a canonical record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionFailed {
    /// A required field (link or paragraphs) is missing. Dropped quietly.
    #[error("record rejected: no {field}")]
    Rejected { field: &'static str },

    /// A field the API always sends (title, pubDate) is missing. This is an upstream
    /// data defect, so it is logged loudly and no fallback is invented.
    #[error("record malformed: no {field}")]
    Malformed { field: &'static str },
}
