/**
 * Server Configuration
 *
 * `ServerConfig` is read in three layers:
 *
 * 1. Built-in defaults (bind `0.0.0.0:3000`, memory store, 24h retention,
 *    35s wait budget, 1s recheck interval)
 * 2. An optional TOML file named by `CHAT_CONFIG`
 * 3. Environment overrides: `BIND_ADDR`, `SERVER_PORT`, `DATABASE_URL`,
 *    `CHAT_RETENTION_SECS`, `CHAT_WAIT_BUDGET_MS`, `CHAT_RECHECK_INTERVAL_MS`
 *
 * The result is validated before use.
 *
 * # Store selection
 *
 * With a `database_url` the server uses SQLite. If the database cannot be
 * opened the error is logged and the server falls back to the in-memory
 * store, so a bad path never keeps the chat offline.
 */

use crate::backend::chat::clock::Clock;
use crate::backend::chat::db::SqliteStore;
use crate::backend::chat::feed::FeedSettings;
use crate::backend::chat::store::{MemoryStore, MessageStore};
use crate::shared::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_VAR: &str = "CHAT_CONFIG";

/// Chat server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind_addr: String,
    /// Port to listen on
    pub port: u16,
    /// SQLite URL; `None` keeps messages in memory
    pub database_url: Option<String>,
    /// How long a conversation survives after its newest message
    pub retention_secs: u64,
    /// How long a feed call waits for new messages
    pub wait_budget_ms: u64,
    /// How often a waiting feed call re-reads the store on its own
    pub recheck_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            retention_secs: 86_400,
            wait_budget_ms: 35_000,
            recheck_interval_ms: 1_000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

impl ServerConfig {
    /// Load from `CHAT_CONFIG` (if set) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Read a TOML config file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        tracing::info!("[Config] Loaded {}", path);
        Self::from_toml_str(&contents)
    }

    /// Parse TOML; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply environment overrides, then validate
    ///
    /// `lookup` maps a variable name to its value. Tests pass a closure over
    /// a map instead of touching the process environment.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_var("SERVER_PORT", port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            let url = url.trim();
            self.database_url = (!url.is_empty()).then(|| url.to_string());
        }
        if let Some(secs) = lookup("CHAT_RETENTION_SECS") {
            self.retention_secs = parse_var("CHAT_RETENTION_SECS", secs)?;
        }
        if let Some(ms) = lookup("CHAT_WAIT_BUDGET_MS") {
            self.wait_budget_ms = parse_var("CHAT_WAIT_BUDGET_MS", ms)?;
        }
        if let Some(ms) = lookup("CHAT_RECHECK_INTERVAL_MS") {
            self.recheck_interval_ms = parse_var("CHAT_RECHECK_INTERVAL_MS", ms)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_addr",
                value: self.bind_addr.clone(),
            })?;

        if self.retention_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "retention_secs",
                value: "0".to_string(),
            });
        }
        if self.wait_budget_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "wait_budget_ms",
                value: "0".to_string(),
            });
        }
        if self.recheck_interval_ms == 0 || self.recheck_interval_ms > self.wait_budget_ms {
            return Err(ConfigError::InvalidValue {
                key: "recheck_interval_ms",
                value: self.recheck_interval_ms.to_string(),
            });
        }
        Ok(())
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_addr.parse().map_err(|_| ConfigError::InvalidValue {
            key: "bind_addr",
            value: self.bind_addr.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            wait_budget: Duration::from_millis(self.wait_budget_ms),
            recheck_interval: Duration::from_millis(self.recheck_interval_ms),
            ..FeedSettings::default()
        }
    }
}

/// Open the configured message store
///
/// # Returns
///
/// The SQLite store when `database_url` is set and opens, otherwise the
/// in-memory store.
pub async fn load_store(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<dyn MessageStore> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::info!("[Config] DATABASE_URL not set, keeping messages in memory");
        return Arc::new(MemoryStore::new(config.retention(), clock));
    };

    tracing::info!("[Config] Connecting to {}", url);
    match SqliteStore::connect(url, config.retention(), clock.clone()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("[Config] Failed to open database: {}", e);
            tracing::warn!("[Config] Falling back to the in-memory store");
            Arc::new(MemoryStore::new(config.retention(), clock))
        }
    }
}
