//! # API Configuration
//!
//! Where the backend lives and how to talk to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_API_URL=https://pos.example.com/api/v1                       │
//! │     TALLY_API_TOKEN=...                                                │
//! │     TALLY_API_TIMEOUT_SECS=15                                          │
//! │                                                                         │
//! │  2. [api] section of terminal.toml (loaded by the app)                 │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000/api/v1, 30 s timeout, no token               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://pos.example.com/api/v1"
//! timeout_secs = 15
//! auth_token = "..."
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiClientError, ApiResult};

/// Backend base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Versioned base URL; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token sent on every request.
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("tally-terminal/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            auth_token: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ApiClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ApiClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Applies `TALLY_API_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TALLY_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.base_url = url;
        }

        if let Some(token) = lookup("TALLY_API_TOKEN") {
            debug!("Overriding API token from environment");
            self.auth_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(timeout) = lookup("TALLY_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid TALLY_API_TIMEOUT_SECS"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.auth_token.is_none());
        assert!(config.user_agent.starts_with("tally-terminal/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ApiConfig::with_base_url("ftp://files.example.com");
        assert!(matches!(
            config.validate(),
            Err(ApiClientError::InvalidUrl(_))
        ));

        config.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.base_url = "https://pos.example.com/api/v1".into();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ApiClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TALLY_API_URL", "https://pos.example.com/api/v2"),
            ("TALLY_API_TOKEN", "secret"),
            ("TALLY_API_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = ApiConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.base_url, "https://pos.example.com/api/v2");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_bad_timeout_override_ignored() {
        let mut config = ApiConfig::default();
        config.apply_overrides(|k| (k == "TALLY_API_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.timeout_secs, 30);
    }
}
