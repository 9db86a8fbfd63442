//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$SP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/shopify-partner/config.toml`
//! 3. `~/.shopify-partner/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing, and again before `config set`
//! writes them back.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// store_file = "/Users/dev/Dropbox/stores.json"
/// shopify_bin = "shopify"
/// editor = "code"
/// interactive = true
/// validation_timeout_secs = 5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Merchant registry location
    pub store_file: Option<PathBuf>,

    /// Shopify CLI executable
    pub shopify_bin: Option<String>,

    /// Editor used by `sp --open`
    pub editor: Option<String>,

    /// Default interactive mode
    pub interactive: Option<bool>,

    /// Store probe timeout in seconds
    pub validation_timeout_secs: Option<u64>,
}

impl GlobalConfig {
    /// Keys accepted by `config get` and `config set`.
    pub const KEYS: &'static [&'static str] = &[
        "store_file",
        "shopify_bin",
        "editor",
        "interactive",
        "validation_timeout_secs",
    ];

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bin) = &self.shopify_bin {
            if bin.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "shopify_bin cannot be empty".to_string(),
                ));
            }
        }

        if self.validation_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "validation_timeout_secs must be at least 1".to_string(),
            ));
        }

        if let Some(path) = &self.store_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "store_file cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Current value of `key`, or `None` if unset.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "store_file" => self.store_file.as_ref().map(|p| p.display().to_string()),
            "shopify_bin" => self.shopify_bin.clone(),
            "editor" => self.editor.clone(),
            "interactive" => self.interactive.map(|b| b.to_string()),
            "validation_timeout_secs" => self.validation_timeout_secs.map(|n| n.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Parse `value` and assign it to `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "store_file" => self.store_file = Some(PathBuf::from(value)),
            "shopify_bin" => self.shopify_bin = Some(value.to_string()),
            "editor" => self.editor = Some(value.to_string()),
            "interactive" => {
                self.interactive = Some(value.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "interactive must be true or false, got '{}'",
                        value
                    ))
                })?)
            }
            "validation_timeout_secs" => {
                self.validation_timeout_secs = Some(value.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "validation_timeout_secs must be a whole number of seconds, got '{}'",
                        value
                    ))
                })?)
            }
            _ => return Err(unknown_key(key)),
        }
        self.validate()
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::InvalidValue(format!(
        "unknown configuration key '{}', must be one of: {}",
        key,
        GlobalConfig::KEYS.join(", ")
    ))
}
