//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── chat_routes.rs  - Chat endpoints
//! ```
//!
//! # Routes
//!
//! - `GET /messages?cursor=<id>` - Long-poll feed
//! - `POST /messages` - Publish a message
//! - `POST /messages/clear` - Drop the conversation
//! - `GET /health` - Liveness probe

pub mod router;

pub mod chat_routes;

pub use router::create_router;
