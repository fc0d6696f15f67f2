// Error type shared by the API client and the workflows built on it.

use thiserror::Error;

/// Failure while talking to the video platform or reading the local file
/// that feeds it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl ApiError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ApiError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
