//! Application configuration module
//!
//! Provides the configuration types shared by the client and the server:
//! the client-facing `AppConfig` builder and the `ConfigError` both sides
//! report configuration problems with.

use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
    /// Name messages are published under
    pub username: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if let Some(username) = &self.username {
            if username.trim().is_empty() {
                return Err(ConfigError::MissingValue("username"));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    username: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: String) -> Self {
        self.server_url = Some(url.trim_end_matches('/').to_string());
        self
    }

    /// Set the username
    pub fn username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url,
            username: self.username,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_trailing_slash() {
        let config = AppConfig::builder()
            .server_url("http://localhost:3000/".to_string())
            .build()
            .unwrap();
        assert_eq!(config.server_url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_builder_rejects_bad_scheme() {
        let err = AppConfig::builder()
            .server_url("ftp://example.com".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_rejects_blank_username() {
        let err = AppConfig::builder()
            .username("   ".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue("username")));
    }
}
