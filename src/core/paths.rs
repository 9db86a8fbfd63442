//! core::paths
//!
//! Centralized path routing for on-disk storage.
//!
//! # Storage Layout
//!
//! All data lives under `~/.shopify-partner/`:
//! - `stores.json` - The merchant registry
//! - `config.toml` - Global configuration (canonical write location)
//!
//! Paths are computed once at startup and passed down explicitly. Nothing
//! else in the crate joins onto the home directory.
//!
//! # Example
//!
//! ```
//! use shopify_partner::core::paths::AppPaths;
//! use std::path::PathBuf;
//!
//! let paths = AppPaths::from_home(PathBuf::from("/home/dev"));
//!
//! assert_eq!(
//!     paths.store_file(),
//!     PathBuf::from("/home/dev/.shopify-partner/stores.json")
//! );
//! ```

use std::path::{Path, PathBuf};

/// Name of the data directory under the home directory.
pub const DATA_DIR_NAME: &str = ".shopify-partner";

/// File name of the merchant registry.
pub const STORE_FILE_NAME: &str = "stores.json";

/// File name of the global configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolved storage locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// The data directory (`~/.shopify-partner`).
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Paths rooted at the current user's home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn from_env() -> Option<Self> {
        dirs::home_dir().map(Self::from_home)
    }

    /// Paths rooted at an explicit home directory.
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        Self {
            data_dir: home.as_ref().join(DATA_DIR_NAME),
        }
    }

    /// Default location of the merchant registry.
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    /// Canonical location of the global config file.
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }
}
