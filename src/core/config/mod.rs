//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$SP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/shopify-partner/config.toml`
//! 3. `~/.shopify-partner/config.toml` (canonical write location)
//!
//! `config set` writes to `$SP_CONFIG` when it is set, and to the canonical
//! location otherwise.
//!
//! # Example
//!
//! ```no_run
//! use shopify_partner::core::config::Config;
//!
//! let config = Config::load().unwrap();
//!
//! println!("Shopify CLI: {}", config.shopify_bin());
//! println!("Interactive: {}", config.interactive());
//! ```

pub mod schema;

pub use schema::GlobalConfig;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::paths::{AppPaths, CONFIG_FILE_NAME};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SP_CONFIG";

/// Directory name under `$XDG_CONFIG_HOME`.
const XDG_DIR_NAME: &str = "shopify-partner";

/// Default Shopify CLI executable.
pub const DEFAULT_SHOPIFY_BIN: &str = "shopify";

/// Default store probe timeout.
pub const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 5;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Where to look for the global config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSearch {
    /// `$SP_CONFIG`
    pub explicit: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
    /// Resolved data directory layout.
    pub paths: Option<AppPaths>,
}

impl ConfigSearch {
    /// Read the search locations from the process environment.
    pub fn from_env() -> Self {
        Self {
            explicit: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            paths: AppPaths::from_env(),
        }
    }

    /// Candidate files, highest precedence first.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.explicit {
            candidates.push(path.clone());
        }
        if let Some(xdg) = &self.xdg_config_home {
            candidates.push(xdg.join(XDG_DIR_NAME).join(CONFIG_FILE_NAME));
        }
        if let Some(paths) = &self.paths {
            candidates.push(paths.config_file());
        }
        candidates
    }

    /// Where `config set` writes.
    pub fn write_target(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        self.paths
            .as_ref()
            .map(AppPaths::config_file)
            .ok_or(ConfigError::NoHomeDir)
    }
}

/// Loaded configuration.
///
/// Accessor methods apply defaults for unset values.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
}

impl Config {
    /// Configuration not backed by any file.
    pub fn from_global(global: GlobalConfig) -> Self {
        Self {
            global,
            global_path: None,
        }
    }

    /// Load configuration from the locations named by the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSearch::from_env())
    }

    /// Load configuration from explicit search locations.
    pub fn load_from(search: &ConfigSearch) -> Result<Self, ConfigError> {
        for path in search.candidates() {
            if path.exists() {
                let global = Self::read_global_config(&path)?;
                global.validate()?;
                return Ok(Config {
                    global,
                    global_path: Some(path),
                });
            }
        }

        // No config found, use defaults
        Ok(Config::default())
    }

    /// Read and parse a global config file.
    fn read_global_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write global config atomically to `path`.
    ///
    /// Creates parent directories if needed. Uses atomic write
    /// (write to temp file, then rename) to prevent corruption.
    pub fn write_global(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Configured merchant registry location, if any.
    pub fn store_file(&self) -> Option<&Path> {
        self.global.store_file.as_deref()
    }

    /// Shopify CLI executable.
    ///
    /// Defaults to "shopify" if not configured.
    pub fn shopify_bin(&self) -> &str {
        self.global
            .shopify_bin
            .as_deref()
            .unwrap_or(DEFAULT_SHOPIFY_BIN)
    }

    /// Configured editor, if any.
    pub fn editor(&self) -> Option<&str> {
        self.global.editor.as_deref()
    }

    /// Check if interactive mode is enabled by default.
    ///
    /// Defaults to `true` if not configured.
    pub fn interactive(&self) -> bool {
        self.global.interactive.unwrap_or(true)
    }

    /// Store probe timeout.
    ///
    /// Defaults to 5 seconds if not configured.
    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(
            self.global
                .validation_timeout_secs
                .unwrap_or(DEFAULT_VALIDATION_TIMEOUT_SECS),
        )
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Where changes to this configuration are written.
    ///
    /// The file it was loaded from, otherwise the default location from
    /// `search`.
    pub fn write_target(&self, search: &ConfigSearch) -> Result<PathBuf, ConfigError> {
        match &self.global_path {
            Some(path) => Ok(path.clone()),
            None => search.write_target(),
        }
    }
}
