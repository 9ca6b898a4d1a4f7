//! Error types for comment harvesting.
//!
//! - `ConfigError`: fatal problems found before any network access
//! - `ApiError`: a failed call against the remote comment service
//! - `TransportError`: an `ApiError` tied to the video whose page failed
//! - `OutputError`: CSV persistence failures

use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems. All of these abort the run before the first request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "YouTube API key is required. Provide it via --api-key option or set {env_var} environment variable."
    )]
    MissingCredential { env_var: &'static str },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// No response was received at all.
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose payload did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Throttling, server-side errors and dropped connections may succeed on a later attempt.
    /// A payload that failed to decode will fail the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Network(_) => true,
            ApiError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the api key as a query parameter.
        let err = err.without_url();
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// A page request for one video failed. Collection for that video stops here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("comment page request for {video_id} failed ({}): {detail}", status_label(.status))]
pub struct TransportError {
    pub video_id: String,
    pub status: Option<u16>,
    pub detail: String,
    pub retryable: bool,
}

impl TransportError {
    pub fn from_api(video_id: &str, err: &ApiError) -> Self {
        let detail = match err {
            ApiError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        };
        Self {
            video_id: video_id.to_string(),
            status: err.status(),
            detail,
            retryable: err.is_transient(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "no status".to_string(),
    }
}

/// Writing the combined table to disk failed.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error while writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
