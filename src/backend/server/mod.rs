//! Server Module
//!
//! Setup of the axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - ServerConfig loading and store selection
//! └── init.rs   - Application assembly
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: defaults, `CHAT_CONFIG` TOML, environment
//! 2. **Store Selection**: SQLite when `DATABASE_URL` is set, memory otherwise
//! 3. **State Creation**: chat service and feed notifier
//! 4. **Background Tasks**: periodic cleanup of idle notifier channels
//! 5. **Router Creation**: routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use pollchat::backend::server::{config::ServerConfig, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::{build_app, create_app};
pub use state::AppState;
