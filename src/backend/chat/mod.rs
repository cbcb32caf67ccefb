//! Chat Backend Module
//!
//! Server-side chat functionality:
//! - Message storage with lazy 24-hour eviction (memory or SQLite)
//! - The long-poll feed, publish and clear operations
//! - Axum handlers for the HTTP endpoints
//!
//! # Architecture
//!
//! - **`clock`** - Time source used to stamp and evict messages
//! - **`sanitize`** - Markup stripping and length limits for publish input
//! - **`state`** - One conversation's ordered message log
//! - **`store`** - `MessageStore` trait and the in-memory store
//! - **`db`** - SQLite-backed store
//! - **`feed`** - `ChatService`: feed, publish and clear
//! - **`handlers`** - HTTP handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use pollchat::backend::chat::{ChatService, ConversationId, FeedSettings, MemoryStore, SystemClock};
//! use pollchat::backend::realtime::FeedNotifier;
//! use pollchat::shared::Cursor;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), pollchat::backend::error::BackendError> {
//! let store = MemoryStore::new(std::time::Duration::from_secs(86_400), Arc::new(SystemClock));
//! let chat = ChatService::new(Arc::new(store), FeedNotifier::new(), FeedSettings::default());
//! let conv = ConversationId::global();
//!
//! chat.publish(&conv, "alice", "hello").await?;
//! let batch = chat.feed(&conv, Cursor::ORIGIN).await?;
//! assert_eq!(batch.messages.len(), 1);
//! # Ok(())
//! # }
//! ```

/// Time source
pub mod clock;

/// Publish input sanitization
pub mod sanitize;

/// Per-conversation message log
pub mod state;

/// Message store trait and in-memory implementation
pub mod store;

/// SQLite message store
pub mod db;

/// Feed, publish and clear
pub mod feed;

/// HTTP handlers
pub mod handlers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use db::SqliteStore;
pub use feed::{ChatService, FeedBatch, FeedSettings};
pub use state::ChatState;
pub use store::{ConversationId, MemoryStore, MessageStore, NewMessage, StoreError};
