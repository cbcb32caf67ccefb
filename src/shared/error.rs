//! Shared Error Types
//!
//! This module defines error types that are shared between the client and the
//! server. They represent failures that can occur on either side.
//!
//! # Error Categories
//!
//! - `ValidationError` - Rejected user input (empty or overlong fields, bad cursors)
//!
//! # Usage
//!
//! ```rust
//! use pollchat::shared::error::SharedError;
//!
//! let error = SharedError::validation("body", "Message body cannot be empty");
//! assert!(error.to_string().contains("body"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error was caused by rejected input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }
}
