use crate::client::retry::BackoffStrategy;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::time::Duration;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Default client-side abort timer for one feed request
pub const DEFAULT_ABORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    abort_timeout: Duration,
    backoff: BackoffStrategy,
}

impl Config {
    /// Read `CLIENT_API_URL` and `CHAT_USERNAME` from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_url =
            lookup("CLIENT_API_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut builder = AppConfig::builder().server_url(server_url);
        if let Some(username) = lookup("CHAT_USERNAME") {
            builder = builder.username(username);
        }
        Self::with_builder(builder)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
            abort_timeout: DEFAULT_ABORT_TIMEOUT,
            backoff: BackoffStrategy::default(),
        })
    }

    pub fn with_abort_timeout(mut self, timeout: Duration) -> Self {
        self.abort_timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn username(&self) -> Option<&str> {
        self.app.username.as_deref()
    }

    pub fn abort_timeout(&self) -> Duration {
        self.abort_timeout
    }

    pub fn backoff(&self) -> &BackoffStrategy {
        &self.backoff
    }
}
