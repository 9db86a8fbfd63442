//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Handle`] - Validated Shopify store handle
//! - [`MerchantId`] - Opaque merchant identifier
//! - [`UtcTimestamp`] - ISO-8601 creation timestamp
//!
//! # Validation
//!
//! Handles are validated at construction time. A `Handle` that exists is
//! always lowercase and made only of ASCII letters, digits, and hyphens.
//!
//! # Examples
//!
//! ```
//! use shopify_partner::core::types::Handle;
//!
//! let handle = Handle::normalize("  Acme-Store ").unwrap();
//! assert_eq!(handle.as_str(), "acme-store");
//! assert_eq!(handle.myshopify_url(), "https://acme-store.myshopify.com");
//!
//! assert!(Handle::normalize("").is_err());
//! assert!(Handle::normalize("acme store").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from handle validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("handle cannot be empty")]
    Empty,

    #[error("invalid handle format \"{0}\" (must be lowercase letters, numbers, and hyphens)")]
    InvalidFormat(String),
}

/// A validated Shopify store handle.
///
/// The handle is the subdomain of `{handle}.myshopify.com`. It is passed
/// verbatim to the Shopify CLI as the `--store` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Trim and lowercase `raw`, then validate it.
    ///
    /// # Errors
    ///
    /// - [`HandleError::Empty`] if nothing is left after trimming
    /// - [`HandleError::InvalidFormat`] if any character is outside `[a-z0-9-]`
    pub fn normalize(raw: &str) -> Result<Self, HandleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HandleError::Empty);
        }

        let lowered = trimmed.to_lowercase();
        if !lowered
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(HandleError::InvalidFormat(raw.to_string()));
        }

        Ok(Self(lowered))
    }

    /// Get the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical storefront URL for this handle.
    pub fn myshopify_url(&self) -> String {
        format!("https://{}.myshopify.com", self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque merchant identifier.
///
/// Generated once at creation and used only to join a prompt selection back
/// to its record. Never displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(String);

impl MerchantId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MerchantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A UTC timestamp rendered as ISO-8601 with millisecond precision.
///
/// # Example
///
/// ```
/// use shopify_partner::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// assert!(now.to_string().ends_with('Z'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
        )
    }
}
