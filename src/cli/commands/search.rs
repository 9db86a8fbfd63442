//! search command - Pick a merchant and run a Shopify CLI theme command
//!
//! This is also the default command when `sp` is run without a subcommand.

use std::process::ExitCode;

use anyhow::{anyhow, Result};

use super::exit_status;
use crate::cli::args::{SearchArgs, ThemeCommand};
use crate::cli::Context;
use crate::core::merchant::{sort_by_name, Merchant};
use crate::core::select::{self, MerchantPicker};
use crate::process::opener::{self, Opened, SystemHost};
use crate::process::{Invocation, ProcessRunner, SystemRunner};
use crate::ui::output;
use crate::ui::prompts::{self, PromptError, TerminalPicker};

/// Environment variable the Shopify CLI reads as its `--store` default.
pub const STORE_ENV: &str = "SHOPIFY_FLAG_STORE";

impl ThemeCommand {
    /// Menu order.
    pub const ALL: [ThemeCommand; 3] = [ThemeCommand::Dev, ThemeCommand::Pull, ThemeCommand::Push];

    fn verb(self) -> &'static str {
        match self {
            ThemeCommand::Dev => "dev",
            ThemeCommand::Pull => "pull",
            ThemeCommand::Push => "push",
        }
    }

    /// Menu label.
    pub fn label(self) -> String {
        format!("shopify theme {} --store", self.verb())
    }

    /// Shopify CLI arguments targeting `handle`.
    pub fn args(self, handle: &str) -> Vec<String> {
        vec![
            "theme".to_string(),
            self.verb().to_string(),
            "--store".to_string(),
            handle.to_string(),
        ]
    }
}

/// Search for a merchant and run a theme command against it.
pub fn search(ctx: &Context, args: SearchArgs) -> Result<ExitCode> {
    if args.open {
        return open_store_file(ctx);
    }

    let mut picker = TerminalPicker::new(ctx.interactive);
    search_with(ctx, args.query.as_deref(), args.theme, &mut picker, &SystemRunner)
}

/// Search with an explicit picker and process runner.
pub fn search_with(
    ctx: &Context,
    query: Option<&str>,
    theme: Option<ThemeCommand>,
    picker: &mut dyn MerchantPicker,
    runner: &dyn ProcessRunner,
) -> Result<ExitCode> {
    let merchants = sort_by_name(&ctx.read_merchants()?);

    let message = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => format!("Select a merchant (filtered by \"{}\"):", q),
        None => "Select a merchant:".to_string(),
    };
    let merchant = select::resolve(&merchants, query, &message, picker)?;

    output::print(
        format!("\nSelected store: {}\n", merchant.handle),
        ctx.verbosity,
    );

    let theme = match theme {
        Some(theme) => theme,
        None => choose_theme_command(merchant, ctx.interactive)?,
    };

    let invocation = Invocation::new(&ctx.shopify_bin)
        .args(theme.args(&merchant.handle))
        .env(STORE_ENV, &merchant.handle);

    output::print(format!("Executing: {}", invocation), ctx.verbosity);
    let code = runner.run(&invocation)?;
    output::debug(format!("{} exited with {}", ctx.shopify_bin, code), ctx.verbosity);

    Ok(exit_status(code))
}

fn choose_theme_command(merchant: &Merchant, interactive: bool) -> Result<ThemeCommand> {
    let items: Vec<String> = ThemeCommand::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.label()))
        .collect();

    let index = prompts::select(
        &format!("Select a command for {}:", merchant.name),
        &items,
        None,
        interactive,
    )
    .map_err(|e| match e {
        PromptError::NotInteractive => {
            anyhow!("No command chosen; pass --command dev|pull|push when not interactive")
        }
        other => other.into(),
    })?;

    ThemeCommand::ALL
        .get(index)
        .copied()
        .ok_or_else(|| anyhow!("Command selection failed"))
}

/// Open the registry file in an editor, or the OS default handler.
fn open_store_file(ctx: &Context) -> Result<ExitCode> {
    let path = &ctx.store_path;
    if !path.exists() {
        output::print(
            "No stores.json file found. Add a merchant first with \"sp add\"",
            ctx.verbosity,
        );
        return Ok(ExitCode::SUCCESS);
    }

    let editor = opener::detect_editor(ctx.editor.as_deref(), &SystemHost);
    match &editor {
        Some(editor) => output::print(
            format!("Opening {} in {}...", path.display(), editor),
            ctx.verbosity,
        ),
        None => output::print(format!("Opening {}...", path.display()), ctx.verbosity),
    }

    let opened = opener::open_path(path, editor.as_deref())?;
    if let (Some(editor), Opened::System) = (&editor, &opened) {
        output::warn(
            format!("Failed to open in {}, used system default", editor),
            ctx.verbosity,
        );
    }

    Ok(ExitCode::SUCCESS)
}
