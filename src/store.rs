use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

pub const USERS_KEY: &str = "users";
pub const PRODUCTS_KEY: &str = "products";
pub const CATEGORIES_KEY: &str = "categories";
pub const ORDERS_KEY: &str = "orders";
pub const CURRENT_USER_KEY: &str = "current_user";

/// Each user gets their own cart collection.
pub fn cart_key(user_id: &str) -> String {
    format!("cart_{user_id}")
}

/// Scoped string-to-string storage. Values live until explicitly removed.
/// There is no transactional guarantee across keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store keeping one JSON file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .map_err(|e| Error::Backend(format!("failed to read {}: {e}", path.display())))?;
        Ok(Some(data))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Backend(format!("failed to create {}: {e}", self.dir.display())))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|e| Error::Backend(format!("failed to write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Backend(format!("failed to remove {}: {e}", path.display())))?;
        }
        Ok(())
    }
}

/// In-memory store for tests and non-persistent embedding.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Backend("store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Loads the full collection stored under `key`. A missing key reads as an
/// empty collection; content that no longer parses is reported as corrupt
/// rather than silently discarded.
pub fn read_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<T>> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::CorruptData {
            key: key.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

/// Serializes and persists the full collection under `key`.
pub fn write_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| Error::Backend(format!("failed to serialize `{key}`: {e}")))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();

        assert!(store.get("missing").unwrap().is_none());

        store.set("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));

        store.remove("greeting").unwrap();
        assert!(store.get("greeting").unwrap().is_none());

        // Removing an absent key is fine
        store.remove("greeting").unwrap();
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get("users").unwrap().is_none());

        store.set("users", "[]").unwrap();
        assert_eq!(store.get("users").unwrap().as_deref(), Some("[]"));

        // A second handle over the same directory sees the same data
        let other = FileStore::new(dir.path());
        assert_eq!(other.get("users").unwrap().as_deref(), Some("[]"));

        store.remove("users").unwrap();
        assert!(store.get("users").unwrap().is_none());
    }

    #[test]
    fn read_collection_missing_key_is_empty() {
        let store = MemoryStore::new();
        let records: Vec<String> = read_collection(&store, "products").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn read_collection_corrupt_data_is_an_error() {
        let store = MemoryStore::new();
        store.set("products", "{not json").unwrap();

        let err = read_collection::<String>(&store, "products").unwrap_err();
        assert!(matches!(err, Error::CorruptData { ref key, .. } if key == "products"));
    }

    #[test]
    fn write_then_read_collection() {
        let store = MemoryStore::new();
        write_collection(&store, "tags", &["a".to_string(), "b".to_string()]).unwrap();

        let tags: Vec<String> = read_collection(&store, "tags").unwrap();
        assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
    }
}
