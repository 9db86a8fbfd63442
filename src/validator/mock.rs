//! validator::mock
//!
//! Mock validator implementation for deterministic testing.
//!
//! # Design
//!
//! Handles registered with [`MockValidator::with_live`] probe successfully;
//! every other handle fails with a 404 status. Each probe is recorded so
//! tests can assert on which handles were checked and in what order.
//!
//! # Example
//!
//! ```
//! use shopify_partner::core::types::Handle;
//! use shopify_partner::validator::mock::MockValidator;
//! use shopify_partner::validator::{ProbeError, StoreValidator};
//!
//! # tokio_test::block_on(async {
//! let validator = MockValidator::new()
//!     .with_live("acme")
//!     .with_custom_domain("acme", "https://acme.com");
//!
//! let acme = Handle::normalize("acme").unwrap();
//! let info = validator.probe(&acme).await.unwrap();
//! assert_eq!(info.frontend_url, "https://acme.com");
//!
//! let ghost = Handle::normalize("ghost").unwrap();
//! assert_eq!(validator.probe(&ghost).await, Err(ProbeError::Status(404)));
//! assert_eq!(validator.probes(), vec!["acme", "ghost"]);
//! # });
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{ProbeError, StoreInfo, StoreValidator};
use crate::core::types::Handle;

/// Mock validator for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockValidator {
    inner: Arc<Mutex<MockValidatorInner>>,
}

#[derive(Debug, Default)]
struct MockValidatorInner {
    /// Handles that probe successfully.
    live: HashSet<String>,
    /// Custom frontend URLs by handle.
    domains: HashMap<String, String>,
    /// Error returned for every probe, if set.
    fail_all: Option<ProbeError>,
    /// Handles probed, in order.
    probes: Vec<String>,
}

impl MockValidator {
    /// Create a validator with no live stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a handle as live.
    pub fn with_live(self, handle: &str) -> Self {
        self.lock().live.insert(handle.to_string());
        self
    }

    /// Give a live handle a custom frontend URL.
    pub fn with_custom_domain(self, handle: &str, url: &str) -> Self {
        self.lock()
            .domains
            .insert(handle.to_string(), url.to_string());
        self
    }

    /// Fail every probe with `error`.
    pub fn failing(self, error: ProbeError) -> Self {
        self.lock().fail_all = Some(error);
        self
    }

    /// Handles probed so far, in order.
    pub fn probes(&self) -> Vec<String> {
        self.lock().probes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockValidatorInner> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl StoreValidator for MockValidator {
    async fn probe(&self, handle: &Handle) -> Result<StoreInfo, ProbeError> {
        let mut inner = self.lock();
        inner.probes.push(handle.as_str().to_string());

        if let Some(error) = &inner.fail_all {
            return Err(error.clone());
        }
        if !inner.live.contains(handle.as_str()) {
            return Err(ProbeError::Status(404));
        }

        let mut info = StoreInfo::myshopify(handle);
        if let Some(url) = inner.domains.get(handle.as_str()) {
            info.frontend_url = url.clone();
        }
        Ok(info)
    }
}
