//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client and the server. They define the JSON exchanged by the feed
//! and publish endpoints.

/// Message data structure
pub mod message;

/// Feed cursor
pub mod cursor;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Escaped text helpers
pub mod text;

/// Re-export commonly used types for convenience
pub use message::{FeedResponse, Message, MessageId};
pub use cursor::Cursor;
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
