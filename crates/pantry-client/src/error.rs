//! Error types for pantry-client

use pantry_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure, or the backend answered with a non-success status
    #[error("Network error: {message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// The payload is not a page of items in any known shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        ClientError::Network {
            status: None,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ClientError::MalformedResponse(message.into())
    }

    /// HTTP status attached to a network failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Network { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
