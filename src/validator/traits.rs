//! validator::traits
//!
//! Store validator trait definition.
//!
//! # Design
//!
//! The `StoreValidator` trait is async because probing a storefront is
//! network I/O. Probe failures are returned as [`ProbeError`] values rather
//! than swallowed, so callers can log the cause. Every caller then treats
//! an error as "the store does not exist".
//!
//! # Example
//!
//! ```ignore
//! use shopify_partner::validator::{StoreValidator, ProbeError};
//!
//! async fn check(validator: &dyn StoreValidator, handle: &Handle) {
//!     match validator.probe(handle).await {
//!         Ok(info) => println!("live at {}", info.frontend_url),
//!         Err(e) => println!("not found ({})", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::Handle;

/// Why a probe concluded the store is not reachable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The request did not complete within the timeout.
    #[error("request timed out")]
    Timeout,

    /// The storefront answered with a non-success status.
    #[error("storefront responded with status {0}")]
    Status(u16),

    /// DNS, TLS, connection, or other transport failure.
    #[error("network error: {0}")]
    Network(String),
}

/// What is known about a live storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    /// `https://{handle}.myshopify.com`
    pub myshopify_url: String,
    /// Public-facing URL; a custom domain when one was discovered.
    pub frontend_url: String,
}

impl StoreInfo {
    /// Info for a store whose public URL is its myshopify URL.
    pub fn myshopify(handle: &Handle) -> Self {
        let url = handle.myshopify_url();
        Self {
            myshopify_url: url.clone(),
            frontend_url: url,
        }
    }

    /// Whether a custom domain differs from the myshopify URL.
    pub fn has_custom_domain(&self) -> bool {
        self.frontend_url != self.myshopify_url
    }
}

/// Decides whether a claimed store handle is live.
#[async_trait]
pub trait StoreValidator: Send + Sync {
    /// Probe the storefront for `handle`.
    async fn probe(&self, handle: &Handle) -> Result<StoreInfo, ProbeError>;
}
