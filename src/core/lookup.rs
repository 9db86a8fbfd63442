//! core::lookup
//!
//! Narrowing the merchant list by a query.
//!
//! Two filters are provided:
//! - [`substring_filter`] - plain case-insensitive containment on name or handle
//! - [`fuzzy_filter`] - weighted approximate matching, best match first
//!
//! Both return the input unchanged for an empty query, and both treat "no
//! results" as an ordinary empty list. Whether that is fatal is up to the
//! caller.
//!
//! # Example
//!
//! ```
//! use shopify_partner::core::lookup::{fuzzy_filter, substring_filter};
//! use shopify_partner::core::merchant::Merchant;
//! use shopify_partner::core::types::Handle;
//!
//! let acme = Handle::normalize("acme").unwrap();
//! let beta = Handle::normalize("beta").unwrap();
//! let merchants = vec![
//!     Merchant::new("Acme Co", &acme, acme.myshopify_url()),
//!     Merchant::new("Beta Shop", &beta, beta.myshopify_url()),
//! ];
//!
//! let hits = substring_filter(&merchants, "acm");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].handle, "acme");
//!
//! let ranked = fuzzy_filter(&merchants, "acme");
//! assert_eq!(ranked[0].handle, "acme");
//! ```

use super::fuzzy::{field_norm, BitapMatcher, MatchOptions};
use super::merchant::Merchant;

/// Share of the match weight carried by the merchant name.
pub const NAME_WEIGHT: f64 = 0.8;

/// Share of the match weight carried by the handle.
pub const HANDLE_WEIGHT: f64 = 0.2;

/// Match-distance threshold (0.0 exact, 1.0 anything).
pub const FUZZY_THRESHOLD: f64 = 0.4;

/// Keep merchants whose name or handle contains `query`, ignoring case.
///
/// An empty query returns every merchant in its original order.
pub fn substring_filter<'a>(merchants: &'a [Merchant], query: &str) -> Vec<&'a Merchant> {
    if query.is_empty() {
        return merchants.iter().collect();
    }

    let needle = query.to_lowercase();
    merchants
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&needle) || m.handle.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Keep merchants that fuzzily match `query`, best match first.
///
/// The name carries 80% of the weight and the handle 20%. An empty or
/// whitespace-only query returns every merchant in its original order.
pub fn fuzzy_filter<'a>(merchants: &'a [Merchant], query: &str) -> Vec<&'a Merchant> {
    if query.trim().is_empty() {
        return merchants.iter().collect();
    }

    let matcher = BitapMatcher::new(
        query,
        MatchOptions {
            threshold: FUZZY_THRESHOLD,
            ..MatchOptions::default()
        },
    );

    let mut scored: Vec<(f64, usize, &Merchant)> = merchants
        .iter()
        .enumerate()
        .filter_map(|(index, m)| score_merchant(&matcher, m).map(|score| (score, index, m)))
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, m)| m).collect()
}

/// Combined score for one merchant, or `None` if no field matched.
fn score_merchant(matcher: &BitapMatcher, merchant: &Merchant) -> Option<f64> {
    let fields = [
        (merchant.name.as_str(), NAME_WEIGHT),
        (merchant.handle.as_str(), HANDLE_WEIGHT),
    ];

    let mut matched = false;
    let mut total = 1.0;
    for (value, weight) in fields {
        if value.trim().is_empty() {
            continue;
        }
        let Some(score) = matcher.search(value) else {
            continue;
        };
        matched = true;

        let base = if score == 0.0 { f64::EPSILON } else { score };
        total *= base.powf(weight * field_norm(value));
    }

    matched.then_some(total)
}
