//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration once into a [`Context`]
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers in [`commands`] read and write the
//! registry through [`crate::core::store`], narrow it with
//! [`crate::core::lookup`], and hand external work to
//! [`crate::validator`] and [`crate::process`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context as _, Result};

use crate::core::config::{Config, ConfigSearch};
use crate::core::merchant::Merchant;
use crate::core::paths::AppPaths;
use crate::core::store::MerchantStore;
use crate::ui::output::{self, Verbosity};

/// Settings resolved once at startup and shared by every handler.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merchant registry location.
    pub store_path: PathBuf,
    pub verbosity: Verbosity,
    pub interactive: bool,
    /// Shopify CLI executable.
    pub shopify_bin: String,
    /// Configured editor for `--open`.
    pub editor: Option<String>,
    pub validation_timeout: Duration,
    /// Where configuration was searched for.
    pub config_search: ConfigSearch,
}

impl Context {
    /// Combine CLI flags with loaded configuration. Flags win.
    pub fn resolve(cli: &Cli, config: &Config, config_search: ConfigSearch) -> Result<Self> {
        let store_path = match (&cli.store_file, config.store_file()) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => path.to_path_buf(),
            (None, None) => config_search
                .paths
                .as_ref()
                .map(AppPaths::store_file)
                .or_else(|| AppPaths::from_env().map(|p| p.store_file()))
                .ok_or_else(|| anyhow!("home directory not found; pass --store-file"))?,
        };

        Ok(Self {
            store_path,
            verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
            interactive: cli.interactive(config.interactive()),
            shopify_bin: config.shopify_bin().to_string(),
            editor: config.editor().map(str::to_string),
            validation_timeout: config.validation_timeout(),
            config_search,
        })
    }

    /// The merchant registry.
    pub fn store(&self) -> MerchantStore {
        MerchantStore::new(&self.store_path)
    }

    /// Read every merchant, logging why the registry read as empty.
    pub fn read_merchants(&self) -> Result<Vec<Merchant>> {
        let store = self.store();
        let merchants = store
            .read_all()
            .context("Failed to read merchant registry")?;

        if merchants.is_empty() && self.verbosity == Verbosity::Debug {
            if let Err(issue) = store.load() {
                output::debug(format!("registry empty: {}", issue), self.verbosity);
            }
        }

        Ok(merchants)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    let search = ConfigSearch::from_env();
    let config = Config::load_from(&search).context("Failed to load config")?;
    let ctx = Context::resolve(&cli, &config, search)?;

    if let Some(path) = config.global_config_loaded_from() {
        output::debug(format!("config: {}", path.display()), ctx.verbosity);
    }
    output::debug(format!("store: {}", ctx.store_path.display()), ctx.verbosity);

    commands::dispatch(cli.command, cli.search, &ctx)
}
