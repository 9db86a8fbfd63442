//! remove command - Remove one merchant from the registry

use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::select::{self, MerchantPicker};
use crate::ui::output;
use crate::ui::prompts::{self, PromptError, TerminalPicker};

/// Remove a merchant, picking it interactively unless the query is unique.
pub fn remove(ctx: &Context, query: Option<&str>, yes: bool) -> Result<ExitCode> {
    let mut picker = TerminalPicker::new(ctx.interactive);
    let interactive = ctx.interactive;
    remove_with(ctx, query, yes, &mut picker, &mut |message| {
        prompts::confirm(message, false, interactive)
    })
}

/// Remove a merchant with explicit picker and confirmation.
pub fn remove_with(
    ctx: &Context,
    query: Option<&str>,
    yes: bool,
    picker: &mut dyn MerchantPicker,
    confirm: &mut dyn FnMut(&str) -> Result<bool, PromptError>,
) -> Result<ExitCode> {
    let merchants = ctx.read_merchants()?;
    let target = select::resolve(&merchants, query, "Select a merchant to remove:", picker)?;

    if !yes {
        let message = format!(
            "Are you sure you want to remove \"{}\" ({})?",
            target.name, target.handle
        );
        match confirm(&message) {
            Ok(true) => {}
            Ok(false) | Err(PromptError::Cancelled) => {
                output::print("Removal cancelled.", ctx.verbosity);
                return Ok(ExitCode::SUCCESS);
            }
            Err(PromptError::NotInteractive) => {
                bail!("Refusing to remove \"{}\" without confirmation; pass --yes", target.name)
            }
            Err(e) => return Err(e.into()),
        }
    }

    let removed = ctx
        .store()
        .remove(&target.id)
        .context("Failed to remove merchant")?;

    output::success(
        format!("Removed merchant \"{}\" ({})", removed.name, removed.handle),
        ctx.verbosity,
    );
    Ok(ExitCode::SUCCESS)
}
