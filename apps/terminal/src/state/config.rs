//! # Terminal Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Config file (`terminal.toml`, or the path given with `--config`)
//! 3. Defaults (this file)
//!
//! ## File Format
//! ```toml
//! [api]
//! base_url = "https://pos.example.com/api/v1"
//! auth_token = "..."
//!
//! [store]
//! name = "Corner Store"
//! currency_symbol = "Rs "
//! currency_decimals = 2
//!
//! [checkout]
//! default_customer_id = 1
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tally_api::ApiConfig;
use tally_core::{Money, WALK_IN_CUSTOMER_ID};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "terminal.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub checkout: CheckoutConfig,
}

/// Store identity and money display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store name (printed above reports)
    pub name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places shown
    pub currency_decimals: u8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "Tally POS".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Customer a sale is rung up for when none is selected.
    pub default_customer_id: i64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            default_customer_id: WALK_IN_CUSTOMER_ID,
        }
    }
}

impl TerminalConfig {
    /// Loads configuration from `path`, or from `terminal.toml` in the
    /// platform config directory when no path is given, then applies
    /// environment overrides and validates.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    TerminalConfig::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `TALLY_*` overrides from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("TALLY_STORE_NAME") {
            self.store.name = name;
        }
        self.api.apply_overrides(lookup);
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.api
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.store.currency_decimals > 4 {
            return Err(ConfigError::Invalid(
                "currency_decimals must be between 0 and 4".into(),
            ));
        }
        if self.checkout.default_customer_id <= 0 {
            return Err(ConfigError::Invalid(
                "default_customer_id must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Formats an amount with the store's currency settings.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = TerminalConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(&self.store.currency_symbol, self.store.currency_decimals)
    }
}

/// `terminal.toml` in the platform config directory.
///
/// - **Linux**: `~/.config/tally/terminal.toml`
/// - **macOS**: `~/Library/Application Support/com.tally.tally/terminal.toml`
/// - **Windows**: `%APPDATA%\tally\tally\config\terminal.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tally", "tally").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
