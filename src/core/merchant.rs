//! core::merchant
//!
//! The merchant record and the document that persists a list of them.
//!
//! # Schema
//!
//! ```json
//! {
//!   "merchants": [
//!     {
//!       "id": "5b0e...",
//!       "name": "Acme Co",
//!       "handle": "acme",
//!       "url": "https://acme.com",
//!       "createdAt": "2024-03-01T12:30:45.123Z"
//!     }
//!   ]
//! }
//! ```
//!
//! Keys this version does not know about are kept in `extra` so that a
//! document written by a newer tool survives a read/write cycle intact.
//!
//! Only `handle` is required. Hand-edited records missing any other field
//! still load: `id` is generated and the rest default to empty strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{Handle, MerchantId, UtcTimestamp};

/// One entry in the merchant registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    /// Stable join key for prompt selections. Generated if missing.
    #[serde(default = "MerchantId::generate")]
    pub id: MerchantId,
    /// Display label.
    #[serde(default)]
    pub name: String,
    /// Store handle, unique across the registry.
    pub handle: String,
    /// Best-known public URL. Cosmetic only.
    #[serde(default)]
    pub url: String,
    /// ISO-8601 creation time. Informational only.
    #[serde(default)]
    pub created_at: String,
    /// Unrecognized keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Merchant {
    /// Create a new record with a fresh id and the current time.
    pub fn new(name: impl Into<String>, handle: &Handle, url: impl Into<String>) -> Self {
        Self {
            id: MerchantId::generate(),
            name: name.into(),
            handle: handle.as_str().to_string(),
            url: url.into(),
            created_at: UtcTimestamp::now().to_string(),
            extra: Map::new(),
        }
    }

    /// Display label used in listings and prompts.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.handle)
    }
}

/// The persisted document wrapping the merchant list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Merchants in insertion order.
    #[serde(default)]
    pub merchants: Vec<Merchant>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoreDocument {
    /// Wrap a merchant list.
    pub fn new(merchants: Vec<Merchant>) -> Self {
        Self {
            merchants,
            extra: Map::new(),
        }
    }
}

/// Return a copy of `merchants` sorted by name for display.
///
/// Names compare case-insensitively first so "beta" sorts next to "Beta".
/// The sort is stable; the persisted order is not affected.
pub fn sort_by_name(merchants: &[Merchant]) -> Vec<Merchant> {
    let mut sorted = merchants.to_vec();
    sorted.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant(name: &str, handle: &str) -> Merchant {
        Merchant::new(name, &Handle::normalize(handle).unwrap(), "https://example.com")
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let m = merchant("Acme Co", "acme");
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["handle"], "acme");
    }

    #[test]
    fn missing_merchants_key_is_empty() {
        let doc: StoreDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.merchants.is_empty());
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let input = r#"{
          "merchants": [
            {
              "id": "1",
              "name": "Acme Co",
              "handle": "acme",
              "url": "https://acme.myshopify.com",
              "createdAt": "2024-01-01T00:00:00.000Z",
              "notes": "vip"
            }
          ],
          "version": 2
        }"#;

        let doc: StoreDocument = serde_json::from_str(input).unwrap();
        assert_eq!(doc.merchants[0].extra["notes"], "vip");

        let out = serde_json::to_string(&doc).unwrap();
        let reparsed: StoreDocument = serde_json::from_str(&out).unwrap();
        assert_eq!(doc, reparsed);
        assert_eq!(reparsed.extra["version"], 2);
    }

    #[test]
    fn partial_record_loads_with_defaults() {
        let input = r#"{"merchants":[{"name":"Old","handle":"old"},{"id":42,"handle":"x"}]}"#;
        assert!(serde_json::from_str::<StoreDocument>(input).is_err());

        let input = r#"{"merchants":[{"name":"Old","handle":"old"},{"id":"legacy-1","handle":"x"}]}"#;
        let doc: StoreDocument = serde_json::from_str(input).unwrap();

        let old = &doc.merchants[0];
        assert_eq!(old.handle, "old");
        assert!(!old.id.as_str().is_empty());
        assert_eq!(old.url, "");
        assert_eq!(old.created_at, "");

        assert_eq!(doc.merchants[1].id.as_str(), "legacy-1");
        assert_eq!(doc.merchants[1].name, "");
    }

    #[test]
    fn label_format() {
        assert_eq!(merchant("Acme Co", "acme").label(), "Acme Co (acme)");
    }

    #[test]
    fn sort_by_name_is_case_insensitive() {
        let input = vec![
            merchant("beta", "b1"),
            merchant("Acme", "a1"),
            merchant("Beta", "b2"),
        ];
        let sorted = sort_by_name(&input);
        let names: Vec<_> = sorted.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta", "beta"]);

        // Input untouched
        assert_eq!(input[0].name, "beta");
    }
}
