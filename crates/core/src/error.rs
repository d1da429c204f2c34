//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend's `detail` string when present, otherwise the
    /// generic message of the operation that failed.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("{message}: {source}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A success response whose body did not match the expected record.
    #[error("{message}: {source}")]
    Decode {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A form failed client-side checks before any request was issued.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
