//! validator::shopify
//!
//! Store validation against live Shopify storefronts.
//!
//! # Design
//!
//! A store is considered live when a `HEAD` request to
//! `https://{handle}.myshopify.com` succeeds after following redirects.
//! The URL the redirects end on is the frontend URL. When that is still the
//! storefront itself, the homepage is fetched once more and scanned for a
//! `<link rel="canonical">` pointing at a custom domain. That second
//! request is best-effort: any failure keeps the URL found so far.
//!
//! Both requests share one client-wide timeout (5 seconds by default).

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

use super::traits::{ProbeError, StoreInfo, StoreValidator};
use crate::core::types::Handle;

/// Default probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Storefront URL pattern; `{handle}` is substituted.
pub const DEFAULT_URL_TEMPLATE: &str = "https://{handle}.myshopify.com";

/// Suffix identifying Shopify-hosted storefront domains.
const MYSHOPIFY_SUFFIX: &str = ".myshopify.com";

/// User-Agent header value for probe requests.
const USER_AGENT_VALUE: &str = concat!("shopify-partner/", env!("CARGO_PKG_VERSION"));

/// Maximum redirects followed by a probe.
const MAX_REDIRECTS: usize = 10;

/// Validator that probes storefronts over HTTP.
#[derive(Debug, Clone)]
pub struct ShopifyValidator {
    client: Client,
    url_template: String,
}

impl ShopifyValidator {
    /// Create a validator probing `*.myshopify.com` with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        Self::with_url_template(DEFAULT_URL_TEMPLATE, timeout)
    }

    /// Create a validator probing a custom URL template.
    ///
    /// The template must contain `{handle}`. Used to point probes at a
    /// local server in tests.
    pub fn with_url_template(
        template: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| ProbeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url_template: template.into(),
        })
    }

    fn storefront_url(&self, handle: &Handle) -> String {
        self.url_template.replace("{handle}", handle.as_str())
    }

    /// Fetch the storefront homepage and look for a custom canonical domain.
    async fn discover_canonical(&self, url: &str) -> Option<String> {
        let response = self.client.get(url).send().await.ok()?;
        let html = response.text().await.ok()?;
        canonical_origin(&html)
    }
}

#[async_trait]
impl StoreValidator for ShopifyValidator {
    async fn probe(&self, handle: &Handle) -> Result<StoreInfo, ProbeError> {
        let target = self.storefront_url(handle);

        let response = self
            .client
            .head(&target)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let mut frontend_url = display_url(&final_url);

        if is_storefront_host(&final_url, &target) {
            if let Some(canonical) = self.discover_canonical(&target).await {
                frontend_url = canonical;
            }
        }

        Ok(StoreInfo {
            myshopify_url: handle.myshopify_url(),
            frontend_url,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout
    } else {
        ProbeError::Network(e.to_string())
    }
}

/// Whether `url` still points at the storefront that was probed.
fn is_storefront_host(url: &Url, probed: &str) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host.ends_with(MYSHOPIFY_SUFFIX) {
        return true;
    }
    Url::parse(probed)
        .ok()
        .and_then(|p| p.host_str().map(|h| h == host))
        .unwrap_or(false)
}

/// Render a URL without a bare trailing `/`.
fn display_url(url: &Url) -> String {
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        url.origin().ascii_serialization()
    } else {
        url.to_string()
    }
}

fn canonical_link_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r#"<link[^>]+rel=["']canonical["'][^>]+href=["']([^"']+)["']"#).ok()
        })
        .as_ref()
}

/// Origin of the page's canonical link, if it is not a myshopify domain.
pub fn canonical_origin(html: &str) -> Option<String> {
    let href = canonical_link_pattern()?.captures(html)?.get(1)?.as_str();
    let url = Url::parse(href).ok()?;
    let host = url.host_str()?;

    if host.contains(MYSHOPIFY_SUFFIX) {
        None
    } else {
        Some(url.origin().ascii_serialization())
    }
}
