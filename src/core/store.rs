//! core::store
//!
//! JSON-backed merchant registry.
//!
//! # Policy
//!
//! The file on disk is the source of truth and corruption is non-fatal:
//! - A missing, unreadable, or unparseable file reads as an empty list
//! - Writes replace the whole document (temp file, then rename)
//! - Read-modify-write operations ([`MerchantStore::insert`],
//!   [`MerchantStore::remove`], and callers of
//!   [`MerchantStore::read_for_update`]) refuse to run on a file that exists
//!   but cannot be read, so existing records are never replaced by an
//!   empty list
//!
//! The cause of a recovered read is still available through
//! [`MerchantStore::load`] so callers and tests can inspect it.
//!
//! There is no cross-process locking. Two invocations racing on the same
//! file resolve as last-writer-wins.
//!
//! # Example
//!
//! ```
//! use shopify_partner::core::merchant::Merchant;
//! use shopify_partner::core::store::MerchantStore;
//! use shopify_partner::core::types::Handle;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = MerchantStore::new(dir.path().join("stores.json"));
//!
//! assert!(store.read_all().unwrap().is_empty());
//!
//! let handle = Handle::normalize("acme").unwrap();
//! store.insert(Merchant::new("Acme Co", &handle, handle.myshopify_url())).unwrap();
//!
//! assert_eq!(store.read_all().unwrap().len(), 1);
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::merchant::{Merchant, StoreDocument};
use super::types::MerchantId;

/// Errors from store operations that reach the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot serialize merchants: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("merchant with handle \"{0}\" already exists")]
    DuplicateHandle(String),

    #[error("merchant not found: {0}")]
    NotFound(MerchantId),

    #[error("cannot update '{path}' because it could not be read ({issue}); fix or move the file first")]
    Unusable { path: PathBuf, issue: LoadIssue },
}

/// Why a read produced no document.
///
/// Every variant is recovered as an empty list by [`MerchantStore::read_all`].
#[derive(Debug, Error)]
pub enum LoadIssue {
    #[error("store file does not exist")]
    Missing,

    #[error("store file is unreadable: {0}")]
    Unreadable(std::io::Error),

    #[error("store file is not a valid document: {0}")]
    Corrupt(serde_json::Error),
}

/// The merchant registry backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct MerchantStore {
    path: PathBuf,
}

impl MerchantStore {
    /// Create a store backed by `path`. The file does not need to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, reporting why if there is none.
    ///
    /// Does not touch the filesystem beyond reading.
    pub fn load(&self) -> Result<Vec<Merchant>, LoadIssue> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadIssue::Missing)
            }
            Err(e) => return Err(LoadIssue::Unreadable(e)),
        };

        let document: StoreDocument = serde_json::from_str(&content).map_err(LoadIssue::Corrupt)?;
        Ok(document.merchants)
    }

    /// Read all merchants in persisted order.
    ///
    /// Creates the backing directory if absent. Any [`LoadIssue`] is
    /// recovered as an empty list.
    ///
    /// # Errors
    ///
    /// Only [`StoreError::CreateDir`].
    pub fn read_all(&self) -> Result<Vec<Merchant>, StoreError> {
        self.ensure_dir()?;
        Ok(self.load().unwrap_or_default())
    }

    /// Read all merchants before modifying them.
    ///
    /// Like [`read_all`](Self::read_all), a missing file is an empty list.
    /// Unlike it, a file that exists but cannot be read or parsed is an
    /// error, so that writing the result back cannot drop its records.
    pub fn read_for_update(&self) -> Result<Vec<Merchant>, StoreError> {
        self.ensure_dir()?;
        match self.load() {
            Ok(merchants) => Ok(merchants),
            Err(LoadIssue::Missing) => Ok(Vec::new()),
            Err(issue) => Err(StoreError::Unusable {
                path: self.path.clone(),
                issue,
            }),
        }
    }

    /// Replace the whole document with `merchants`.
    ///
    /// Output is pretty-printed JSON with a two-space indent.
    pub fn write_all(&self, merchants: &[Merchant]) -> Result<(), StoreError> {
        self.ensure_dir()?;

        let document = StoreDocument::new(merchants.to_vec());
        let content = serde_json::to_string_pretty(&document)?;

        let temp_path = self.path.with_extension("json.tmp");
        let write_err = |source| StoreError::Write {
            path: temp_path.clone(),
            source,
        };

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(write_err)?;

            file.write_all(content.as_bytes()).map_err(write_err)?;
            file.sync_all().map_err(write_err)?;
        }

        fs::rename(&temp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }

    /// Append a merchant, rejecting a duplicate handle before any write.
    pub fn insert(&self, merchant: Merchant) -> Result<(), StoreError> {
        let mut merchants = self.read_for_update()?;
        if merchants.iter().any(|m| m.handle == merchant.handle) {
            return Err(StoreError::DuplicateHandle(merchant.handle));
        }
        merchants.push(merchant);
        self.write_all(&merchants)
    }

    /// Remove exactly the merchant with `id`, keeping the others in order.
    ///
    /// Returns the removed record.
    pub fn remove(&self, id: &MerchantId) -> Result<Merchant, StoreError> {
        let mut merchants = self.read_for_update()?;
        let index = merchants
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let removed = merchants.remove(index);
        self.write_all(&merchants)?;
        Ok(removed)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Handle;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, MerchantStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = MerchantStore::new(temp.path().join("stores.json"));
        (temp, store)
    }

    fn merchant(name: &str, handle: &str) -> Merchant {
        let handle = Handle::normalize(handle).expect("valid handle");
        let url = handle.myshopify_url();
        Merchant::new(name, &handle, url)
    }

    #[test]
    fn read_missing_returns_empty() {
        let (_temp, store) = create_test_store();

        assert!(matches!(store.load(), Err(LoadIssue::Missing)));
        assert!(store.read_all().expect("read").is_empty());
    }

    #[test]
    fn read_corrupt_returns_empty() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "{ \"merchants\": [ oops").expect("write garbage");

        assert!(matches!(store.load(), Err(LoadIssue::Corrupt(_))));
        assert!(store.read_all().expect("read").is_empty());
    }

    #[test]
    fn read_wrong_shape_returns_empty() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "[1, 2, 3]").expect("write");

        assert!(matches!(store.load(), Err(LoadIssue::Corrupt(_))));
        assert!(store.read_all().expect("read").is_empty());
    }

    #[test]
    fn write_then_read_roundtrip() {
        let (_temp, store) = create_test_store();
        let merchants = vec![merchant("Beta Shop", "beta"), merchant("Acme Co", "acme")];

        store.write_all(&merchants).expect("write");

        assert_eq!(store.read_all().expect("read"), merchants);
    }

    #[test]
    fn write_recovers_corrupt_file() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "not json").expect("write garbage");

        store.write_all(&[merchant("Acme Co", "acme")]).expect("write");

        assert_eq!(store.load().expect("valid after write").len(), 1);
    }

    #[test]
    fn write_is_pretty_printed_two_spaces() {
        let (_temp, store) = create_test_store();
        store.write_all(&[merchant("Acme Co", "acme")]).expect("write");

        let content = fs::read_to_string(store.path()).expect("read raw");
        assert!(content.starts_with("{\n  \"merchants\": [\n    {\n      \"id\""));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("nested").join("dir").join("stores.json");
        let store = MerchantStore::new(path.clone());

        assert!(store.read_all().expect("read").is_empty());
        assert!(path.parent().unwrap().exists());
        assert!(!path.exists());
    }

    #[test]
    fn insert_rejects_duplicate_handle_without_writing() {
        let (_temp, store) = create_test_store();
        store.insert(merchant("Acme Co", "acme")).expect("first insert");
        let before = fs::read_to_string(store.path()).expect("read raw");

        let err = store.insert(merchant("Other", "ACME")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateHandle(h) if h == "acme"));

        let after = fs::read_to_string(store.path()).expect("read raw");
        assert_eq!(before, after);
    }

    #[test]
    fn partial_record_survives_insert() {
        let (_temp, store) = create_test_store();
        fs::write(
            store.path(),
            r#"{"merchants":[{"id":"5b0e8c9a","name":"Old","handle":"old","url":"https://old.myshopify.com"}]}"#,
        )
        .expect("write hand-edited file");

        store.insert(merchant("New", "new")).expect("insert");

        let merchants = store.read_all().expect("read");
        let handles: Vec<_> = merchants.iter().map(|m| m.handle.as_str()).collect();
        assert_eq!(handles, vec!["old", "new"]);
        assert_eq!(merchants[0].id.as_str(), "5b0e8c9a");
        assert_eq!(merchants[0].url, "https://old.myshopify.com");
    }

    #[test]
    fn insert_refuses_unparseable_file() {
        let (_temp, store) = create_test_store();
        let garbage = "{ \"merchants\": [ {\"name\": \"Old\"} ] }";
        fs::write(store.path(), garbage).expect("write");

        let err = store.insert(merchant("New", "new")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Unusable {
                issue: LoadIssue::Corrupt(_),
                ..
            }
        ));
        assert_eq!(fs::read_to_string(store.path()).expect("read raw"), garbage);

        assert!(store.remove(&MerchantId::new("x")).is_err());
        assert_eq!(fs::read_to_string(store.path()).expect("read raw"), garbage);
    }

    #[test]
    fn read_for_update_missing_is_empty() {
        let (_temp, store) = create_test_store();
        assert!(store.read_for_update().expect("read").is_empty());
    }

    #[test]
    fn remove_keeps_others_in_order() {
        let (_temp, store) = create_test_store();
        let a = merchant("A", "a");
        let b = merchant("B", "b");
        let c = merchant("C", "c");
        store
            .write_all(&[a.clone(), b.clone(), c.clone()])
            .expect("write");

        let removed = store.remove(&b.id).expect("remove");
        assert_eq!(removed, b);
        assert_eq!(store.read_all().expect("read"), vec![a, c]);
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let (_temp, store) = create_test_store();
        store.write_all(&[merchant("A", "a")]).expect("write");

        let err = store.remove(&MerchantId::new("nope")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.read_all().expect("read").len(), 1);
    }

    #[test]
    fn persistence_across_instances() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("stores.json");

        MerchantStore::new(path.clone())
            .insert(merchant("Acme Co", "acme"))
            .expect("insert");

        let merchants = MerchantStore::new(path).read_all().expect("read");
        assert_eq!(merchants.len(), 1);
        assert_eq!(merchants[0].handle, "acme");
    }
}
