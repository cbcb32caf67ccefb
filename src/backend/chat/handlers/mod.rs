//! Chat Handlers Module
//!
//! Axum handlers for the chat endpoints. They all act on the single global
//! conversation and delegate to [`ChatService`](crate::backend::chat::ChatService).
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs     - Module exports and documentation
//! ├── feed.rs    - GET /messages (long-poll)
//! ├── publish.rs - POST /messages
//! └── clear.rs   - POST /messages/clear
//! ```
//!
//! # Route Handlers
//!
//! ## GET /messages?cursor=<id>
//!
//! Waits until at least one message exists after `cursor`, or until the
//! wait budget runs out, and returns `{"messages": [...], "cursor": "<id>"}`.
//! A missing or malformed cursor means "from the beginning".
//!
//! ## POST /messages
//!
//! Form-encoded `username` and `body`. Returns 200 with an empty body, or
//! 400 with a JSON error when the input is empty or too long.
//!
//! ## POST /messages/clear
//!
//! Drops the conversation immediately.

/// Long-poll feed handler
pub mod feed;

/// Publish handler
pub mod publish;

/// Clear handler
pub mod clear;

pub use clear::handle_clear;
pub use feed::{handle_feed, FeedQuery};
pub use publish::{handle_publish, PublishForm};
