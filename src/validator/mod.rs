//! validator
//!
//! Checks whether a claimed store handle belongs to a live storefront.
//!
//! # Architecture
//!
//! Commands depend on the [`StoreValidator`] trait, never on a concrete
//! validator. Validation only gates writes: a failed probe means the
//! merchant is not recorded, and never touches existing records.
//!
//! # Modules
//!
//! - `traits`: Core `StoreValidator` trait, [`StoreInfo`], [`ProbeError`]
//! - [`shopify`]: HTTP probe of `{handle}.myshopify.com`
//! - [`mock`]: In-memory validator for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use shopify_partner::validator::{create_validator, StoreValidator};
//!
//! let validator = create_validator(Duration::from_secs(5))?;
//! let info = validator.probe(&handle).await?;
//! println!("Frontend URL: {}", info.frontend_url);
//! ```

pub mod mock;
pub mod shopify;
mod traits;

use std::time::Duration;

pub use traits::*;

/// Create the validator used by commands.
pub fn create_validator(timeout: Duration) -> Result<Box<dyn StoreValidator>, ProbeError> {
    Ok(Box::new(shopify::ShopifyValidator::new(timeout)?))
}
