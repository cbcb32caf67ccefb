//! pollchat - Main Library
//!
//! pollchat is a small real-time chat service built around HTTP long-polling.
//! Clients hold a cursor into a single global conversation, ask the server
//! for everything after it, and the server holds the request open until new
//! messages arrive or a wait budget runs out.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - `Message`, `MessageId`, `Cursor`, `FeedResponse`
//!   - Shared error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Message store (in-memory and SQLite) with lazy 24h eviction
//!   - Long-poll feed, publish and clear endpoints on Axum
//!   - Per-conversation wake-up notifier
//!
//! - **`client`** - Long-poll client
//!   - HTTP API wrapper
//!   - Feed poller with abort timer and capped exponential backoff
//!   - Terminal display
//!
//! # Delivery guarantees
//!
//! A client that always resumes from the cursor returned by the previous
//! feed call receives every message exactly once, in arrival order. A feed
//! call never outlives its wait budget; running out of time is an empty
//! batch with an unchanged cursor, not an error.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pollchat::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Long-poll client
pub mod client;
