//! Client Module
//!
//! Long-poll client for the chat server.
//!
//! # Architecture
//!
//! - **`config`** - Client configuration from the environment
//! - **`api`** - HTTP wrapper for the feed, publish and clear endpoints
//! - **`retry`** - Capped exponential backoff
//! - **`poller`** - The feed loop: abort timer, cursor tracking, retries
//! - **`display`** - Where delivered messages go (`MessageSink`)
//! - **`error`** - Client error type
//!
//! # Example
//!
//! ```rust,no_run
//! use pollchat::client::{api::ChatApi, config::Config, display::TerminalDisplay, poller::FeedPoller};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let api = ChatApi::new(&config)?;
//! let mut poller = FeedPoller::new(api, TerminalDisplay::new(std::io::stdout()), &config);
//! poller.run().await;
//! # Ok(())
//! # }
//! ```

/// Client configuration
pub mod config;

/// Client error types
pub mod error;

/// HTTP API wrapper
pub mod api;

/// Backoff between failed polls
pub mod retry;

/// Message display
pub mod display;

/// Feed poller
pub mod poller;

pub use api::ChatApi;
pub use config::Config;
pub use display::{MessageSink, TerminalDisplay};
pub use error::ClientError;
pub use poller::{FeedPoller, PollOutcome, PollerState};
pub use retry::{Backoff, BackoffStrategy};
