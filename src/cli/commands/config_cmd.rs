//! config command - Get, set, or list configuration values

use std::process::ExitCode;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, GlobalConfig};
use crate::ui::output;

fn load(ctx: &Context) -> Result<Config> {
    Config::load_from(&ctx.config_search).context("Failed to load config")
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<ExitCode> {
    let config = load(ctx)?;

    // Key exists but has no value - exit silently
    if let Some(value) = config.global.get(key)? {
        println!("{}", value);
    }
    Ok(ExitCode::SUCCESS)
}

/// Set a configuration value.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<ExitCode> {
    let config = load(ctx)?;
    let path = config.write_target(&ctx.config_search)?;

    let mut global = config.global;
    global.set(key, value)?;

    Config::write_global(&path, &global).context("Failed to write config")?;

    output::print(format!("Set {} = {}", key, value), ctx.verbosity);
    output::debug(format!("wrote {}", path.display()), ctx.verbosity);
    Ok(ExitCode::SUCCESS)
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<ExitCode> {
    let config = load(ctx)?;

    println!("# Global Configuration");
    for key in GlobalConfig::KEYS {
        match config.global.get(key)? {
            Some(value) => println!("{} = {}", key, value),
            None => println!("{} = (not set)", key),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the config file location.
///
/// This is the file that was loaded, or where `set` would write.
pub fn path(ctx: &Context) -> Result<ExitCode> {
    let path = load(ctx)?.write_target(&ctx.config_search)?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}
