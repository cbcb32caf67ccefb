/**
 * Backend Error Types
 *
 * Errors raised while serving chat requests. Every variant maps to an HTTP
 * status code so handlers can return `Result<_, BackendError>` directly.
 *
 * # Error Categories
 *
 * ## Validation
 *
 * Publish input that is empty after sanitization or longer than allowed.
 * These come from the shared module and map to 400.
 *
 * ## Store
 *
 * The message store failed or did not answer within the feed deadline.
 * These map to 503 so clients back off and retry.
 */

use crate::backend::chat::store::StoreError;
use crate::shared::SharedError;
use axum::http::StatusCode;
use thiserror::Error;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// The message store failed or timed out
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    /// Rejected publish input
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `StoreUnavailable` - 503 Service Unavailable
    /// - `SharedError` - 400 Bad Request
    ///
    /// # Example
    ///
    /// ```rust
    /// use pollchat::backend::error::BackendError;
    /// use pollchat::shared::SharedError;
    /// use axum::http::StatusCode;
    ///
    /// let err: BackendError = SharedError::validation("body", "cannot be empty").into();
    /// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    /// ```
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error message sent to clients
    pub fn message(&self) -> String {
        match self {
            Self::StoreUnavailable(_) => "Message store unavailable".to_string(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_code_mapping() {
        let validation: BackendError = SharedError::validation("body", "too long").into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let unavailable: BackendError = StoreError::unavailable("disk gone").into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let timed_out: BackendError = StoreError::TimedOut(Duration::from_secs(35)).into();
        assert_eq!(timed_out.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_store_details_not_exposed() {
        let error: BackendError = StoreError::unavailable("/var/lib/chat.db: locked").into();
        assert_eq!(error.message(), "Message store unavailable");
    }

    #[test]
    fn test_validation_message_names_field() {
        let error: BackendError = SharedError::validation("username", "cannot be empty").into();
        assert!(error.message().contains("username"));
    }
}
