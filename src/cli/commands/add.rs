//! add command - Validate a store and add it to the registry

use std::process::ExitCode;

use anyhow::{anyhow, bail, Context as _, Result};

use crate::cli::Context;
use crate::core::merchant::Merchant;
use crate::core::store::StoreError;
use crate::core::types::{Handle, HandleError};
use crate::ui::output;
use crate::validator::{create_validator, StoreValidator};

/// Add a merchant after checking its store is live.
pub fn add(ctx: &Context, name: &str, handle: &str) -> Result<ExitCode> {
    let validator = create_validator(ctx.validation_timeout)?;

    // Use tokio runtime to run async code
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(add_with(ctx, name, handle, validator.as_ref()))
}

/// Add a merchant using the given validator.
pub async fn add_with(
    ctx: &Context,
    name: &str,
    handle: &str,
    validator: &dyn StoreValidator,
) -> Result<ExitCode> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Merchant name cannot be empty");
    }

    let handle = Handle::normalize(handle).map_err(|e| match e {
        HandleError::Empty => anyhow!("Handle cannot be empty"),
        HandleError::InvalidFormat(_) => {
            anyhow!("Handle must contain only lowercase letters, numbers, and hyphens")
        }
    })?;

    // Checked here to avoid a network round trip; insert checks again.
    let existing = ctx
        .store()
        .read_for_update()
        .context("Failed to read merchant registry")?;
    if existing.iter().any(|m| m.handle == handle.as_str()) {
        bail!("Merchant with handle \"{}\" already exists", handle);
    }

    output::print(
        format!("Checking store: {}.myshopify.com...", handle),
        ctx.verbosity,
    );
    let info = match validator.probe(&handle).await {
        Ok(info) => info,
        Err(e) => {
            output::debug(format!("probe of {} failed: {}", handle, e), ctx.verbosity);
            bail!(
                "Store \"{}.myshopify.com\" not found or not accessible. Please verify the handle is correct.",
                handle
            );
        }
    };

    let merchant = Merchant::new(name, &handle, info.frontend_url.clone());
    match ctx.store().insert(merchant) {
        Ok(()) => {}
        Err(StoreError::DuplicateHandle(h)) => {
            bail!("Merchant with handle \"{}\" already exists", h)
        }
        Err(e) => return Err(e).context("Failed to save merchant"),
    }

    output::success(
        format!("Added merchant \"{}\" ({})", name, handle),
        ctx.verbosity,
    );
    output::print(format!("  Store URL: {}", info.myshopify_url), ctx.verbosity);
    if info.has_custom_domain() {
        output::print(format!("  Frontend URL: {}", info.frontend_url), ctx.verbosity);
    }

    Ok(ExitCode::SUCCESS)
}
