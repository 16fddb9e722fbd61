//! Key-value preference storage
//!
//! A deliberately small store: string keys, string values, one JSON object
//! on disk. [`WishlistPrefs`] keeps the wishlist under `productWishlist` as a
//! JSON array of product ids.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::PrefsError;

/// Key under which the wishlist is stored.
pub const WISHLIST_KEY: &str = "productWishlist";

/// String key-value storage.
pub trait PrefStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;
}

/// In-memory store, for tests and for running without a prefs file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is read once on open and rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// `<data dir>/card-dispatch/prefs.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("card-dispatch").join("prefs.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PrefStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Wishlist membership on top of a [`PrefStore`].
#[derive(Debug, Clone)]
pub struct WishlistPrefs<S> {
    store: S,
}

impl<S: PrefStore> WishlistPrefs<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All wishlisted product ids.
    ///
    /// Unreadable or corrupt data is treated as an empty wishlist.
    pub fn ids(&self) -> Vec<String> {
        let raw = match self.store.get(WISHLIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read wishlist prefs");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "wishlist prefs are corrupt, starting empty");
            Vec::new()
        })
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.ids().iter().any(|id| id == product_id)
    }

    /// Add or remove `product_id`. Adding twice keeps one entry.
    pub fn set(&mut self, product_id: &str, wishlisted: bool) -> Result<(), PrefsError> {
        let mut ids = self.ids();
        if wishlisted {
            if !ids.iter().any(|id| id == product_id) {
                ids.push(product_id.to_owned());
            }
        } else {
            ids.retain(|id| id != product_id);
        }
        let raw = serde_json::to_string(&ids)?;
        self.store.set(WISHLIST_KEY, &raw)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_wishlist_add_remove() {
        let mut prefs = WishlistPrefs::new(MemoryStore::new());
        assert!(!prefs.contains("sku1"));

        prefs.set("sku1", true).unwrap();
        prefs.set("sku1", true).unwrap();
        prefs.set("sku2", true).unwrap();
        assert_eq!(prefs.ids(), vec!["sku1", "sku2"]);

        prefs.set("sku1", false).unwrap();
        assert!(!prefs.contains("sku1"));
        assert!(prefs.contains("sku2"));
    }

    #[test]
    fn test_wishlist_corrupt_data_reads_empty() {
        let mut store = MemoryStore::new();
        store.set(WISHLIST_KEY, "{not a list").unwrap();
        let mut prefs = WishlistPrefs::new(store);

        assert!(prefs.ids().is_empty());

        // Writing replaces the corrupt value
        prefs.set("sku1", true).unwrap();
        assert_eq!(
            prefs.store().get(WISHLIST_KEY).unwrap().as_deref(),
            Some(r#"["sku1"]"#)
        );
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut prefs = WishlistPrefs::new(JsonFileStore::open(&path).unwrap());
        prefs.set("sku1", true).unwrap();

        let reopened = WishlistPrefs::new(JsonFileStore::open(&path).unwrap());
        assert!(reopened.contains("sku1"));
        assert_eq!(reopened.store().path(), path.as_path());
    }

    #[test]
    fn test_json_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "[1, 2").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, PrefsError::Json(_)));
    }

    #[test]
    fn test_json_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("theme", "dark").unwrap();
        store.remove("theme").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("theme").unwrap(), None);
    }
}
