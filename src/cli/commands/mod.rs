//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Reads or writes the registry through the store
//! 3. Formats and displays output
//!
//! Handlers return an [`ExitCode`] so that a child process's exit status
//! and bulk import failures reach the shell.
//!
//! # Async Commands
//!
//! Commands that probe stores (add, bulk-add) are async because they
//! involve network I/O. Each builds a `tokio` runtime and blocks on its
//! async body, keeping dispatch synchronous.

mod add;
mod bulk_add;
mod completion;
mod config_cmd;
mod list;
mod remove;
mod search;

// Re-export command functions for testing and direct invocation
pub use add::{add, add_with};
pub use bulk_add::{bulk_add, bulk_add_with};
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, path as config_path, set as config_set};
pub use list::{list, render_list};
pub use remove::{remove, remove_with};
pub use search::{search, search_with};

use std::process::ExitCode;

use anyhow::Result;

use super::args::{Command, ConfigAction, SearchArgs};
use super::Context;

/// Dispatch a command to its handler.
///
/// With no subcommand, the top-level search arguments are used.
pub fn dispatch(command: Option<Command>, search_args: SearchArgs, ctx: &Context) -> Result<ExitCode> {
    match command {
        None => search::search(ctx, search_args),
        Some(Command::Search(args)) => search::search(ctx, args),
        Some(Command::Add { name, handle }) => add::add(ctx, &name, &handle),
        Some(Command::BulkAdd {
            file,
            format,
            skip_validation,
        }) => bulk_add::bulk_add(ctx, &file, format, skip_validation),
        Some(Command::List) => list::list(ctx),
        Some(Command::Remove { query, yes }) => remove::remove(ctx, query.as_deref(), yes),
        Some(Command::Config { action }) => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
        },
        Some(Command::Completion { shell }) => completion::completion(shell),
    }
}

/// Map a child exit code onto this process's exit status.
pub(crate) fn exit_status(code: i32) -> ExitCode {
    match code {
        0 => ExitCode::SUCCESS,
        c => u8::try_from(c)
            .ok()
            .filter(|c| *c != 0)
            .map(ExitCode::from)
            .unwrap_or(ExitCode::FAILURE),
    }
}
