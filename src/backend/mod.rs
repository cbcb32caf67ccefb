//! Backend Module
//!
//! Server-side code, compiled only with the `ssr` feature.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state and initialization
//! - **`routes`** - Route assembly
//! - **`chat`** - Message store, feed service and handlers
//! - **`realtime`** - Wake-up notifier for waiting feed calls
//! - **`error`** - Error types and HTTP conversion

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat-related backend functionality
pub mod chat;

/// Feed wake-up notifications
pub mod realtime;

/// Backend error types
pub mod error;

pub use chat::{ChatService, ConversationId, MessageStore};
pub use error::BackendError;
pub use server::create_app;
