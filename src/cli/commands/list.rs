//! list command - Show every merchant, sorted by name

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Context;
use crate::core::merchant::{sort_by_name, Merchant};
use crate::ui::output;

/// List all merchants.
pub fn list(ctx: &Context) -> Result<ExitCode> {
    let merchants = ctx.read_merchants()?;

    if merchants.is_empty() {
        output::print(
            "No merchants found. Add a merchant first with \"sp add\"",
            ctx.verbosity,
        );
        return Ok(ExitCode::SUCCESS);
    }

    output::print(render_list(&sort_by_name(&merchants)), ctx.verbosity);
    Ok(ExitCode::SUCCESS)
}

/// Numbered listing with each merchant's URL, blank line between entries.
pub fn render_list(merchants: &[Merchant]) -> String {
    let entries: Vec<String> = merchants
        .iter()
        .enumerate()
        .map(|(i, m)| format!("  {}. {}\n     {}", i + 1, m.label(), m.url))
        .collect();

    format!("\nAvailable merchants:\n\n{}\n", entries.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{context, merchant};

    #[test]
    fn renders_numbered_entries() {
        let merchants = vec![merchant("Acme Co", "acme"), merchant("Beta Shop", "beta")];
        let text = render_list(&merchants);

        assert_eq!(
            text,
            "\nAvailable merchants:\n\n  1. Acme Co (acme)\n     https://acme.myshopify.com\n\n  2. Beta Shop (beta)\n     https://beta.myshopify.com\n"
        );
    }

    #[test]
    fn empty_registry_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir.path().join("stores.json"));
        assert_eq!(list(&ctx).unwrap(), ExitCode::SUCCESS);
    }
}
