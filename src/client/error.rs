//! Client error types

use crate::shared::SharedError;
use thiserror::Error;

/// Errors returned by [`ChatApi`](crate::client::api::ChatApi)
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Rejected locally before sending
    #[error(transparent)]
    Shared(#[from] SharedError),
}

impl ClientError {
    /// Whether the server rejected the request as invalid
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Server { status, .. } => *status == 400,
            Self::Shared(err) => err.is_validation(),
            Self::Network(_) => false,
        }
    }
}
