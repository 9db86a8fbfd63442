//! bulk-add command - Import merchants from a CSV or JSON file

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};

use crate::cli::args::FormatArg;
use crate::cli::Context;
use crate::core::import::{self, ImportEvent, ImportFormat, ImportSummary, Importer};
use crate::ui::output;
use crate::validator::{create_validator, StoreValidator};

const RULE_WIDTH: usize = 50;

impl From<FormatArg> for ImportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ImportFormat::Csv,
            FormatArg::Json => ImportFormat::Json,
        }
    }
}

/// Bulk add merchants from `file`.
///
/// Exits with status 1 if any row failed.
pub fn bulk_add(
    ctx: &Context,
    file: &Path,
    format: Option<FormatArg>,
    skip_validation: bool,
) -> Result<ExitCode> {
    let validator = if skip_validation {
        None
    } else {
        Some(create_validator(ctx.validation_timeout)?)
    };

    // Use tokio runtime to run async code
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(bulk_add_with(
        ctx,
        file,
        format.map(ImportFormat::from),
        validator.as_deref(),
    ))
}

/// Bulk add merchants, probing with `validator` unless it is `None`.
pub async fn bulk_add_with(
    ctx: &Context,
    file: &Path,
    format: Option<ImportFormat>,
    validator: Option<&dyn StoreValidator>,
) -> Result<ExitCode> {
    if !file.exists() {
        bail!("File not found: {}", file.display());
    }

    let format = ImportFormat::detect(file, format);
    output::print(
        format!("Reading {} file: {}\n", format.label(), file.display()),
        ctx.verbosity,
    );

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let rows = import::parse(&content, format).context("Failed to read file")?;

    if rows.is_empty() {
        bail!("No merchants found in file");
    }

    output::print(
        format!("Found {} merchant(s) to process\n", rows.len()),
        ctx.verbosity,
    );

    let mut merchants = ctx
        .store()
        .read_for_update()
        .context("Failed to read merchant registry")?;
    let verbosity = ctx.verbosity;
    let summary = Importer::new(validator)
        .run(&mut merchants, &rows, |event| report(event, verbosity))
        .await;

    if summary.added > 0 {
        ctx.store()
            .write_all(&merchants)
            .context("Failed to save merchants")?;
    }

    output::print(render_summary(&summary), ctx.verbosity);

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn report(event: ImportEvent<'_>, verbosity: output::Verbosity) {
    match event {
        ImportEvent::Skipped {
            row,
            total,
            name,
            handle,
        } => output::print(
            format!(
                "[{}/{}] ⚠ Skipped \"{}\" - handle \"{}\" already exists",
                row, total, name, handle
            ),
            verbosity,
        ),
        ImportEvent::Checking {
            row,
            total,
            name,
            handle,
        } => output::print(
            format!("[{}/{}] Checking \"{}\" ({})...", row, total, name, handle),
            verbosity,
        ),
        ImportEvent::ProbeFailed { row, handle, error } => output::debug(
            format!("row {}: probe of {} failed: {}", row, handle, error),
            verbosity,
        ),
        ImportEvent::Added {
            row,
            total,
            merchant,
        } => output::print(
            format!(
                "[{}/{}] ✓ Added \"{}\" ({})",
                row, total, merchant.name, merchant.handle
            ),
            verbosity,
        ),
    }
}

/// Summary block followed by the itemized error list.
pub(crate) fn render_summary(summary: &ImportSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut text = format!(
        "\n{rule}\nSummary:\n  ✓ Added:    {}\n  ⚠ Skipped:  {} (duplicates)\n  ✗ Failed:   {}\n{rule}\n",
        summary.added,
        summary.skipped,
        summary.failed(),
    );

    if summary.has_failures() {
        text.push_str("\nErrors:\n");
        text.push_str(&output::format_list(&summary.failures, "  - "));
        text.push('\n');
    }

    text
}
