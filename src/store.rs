//! # Key-Value Persistence
//!
//! Custom items and the remembered username survive restarts through a
//! small string key-value store. Values are JSON text; [`KvStoreExt`] adds
//! typed list helpers on top of the raw interface.
//!
//! | Store | Backing |
//! |-------|---------|
//! | [`MemoryStore`] | `HashMap`, lost on exit |
//! | [`JsonStore`] | One JSON object file, rewritten on every change |

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ScanbookError;

/// Key holding the custom catalog items.
pub const CUSTOM_ITEMS_KEY: &str = "custom_items";

/// Key holding the last username that signed in.
pub const USERNAME_KEY: &str = "username";

/// Raw string storage.
pub trait KvStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>, ScanbookError>;
    fn set_raw(&self, key: &str, value: String) -> Result<(), ScanbookError>;
    fn remove(&self, key: &str) -> Result<(), ScanbookError>;
}

/// Typed helpers for any [`KvStore`].
pub trait KvStoreExt: KvStore {
    /// Read a JSON list. A missing key is an empty list.
    fn get_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, ScanbookError> {
        match self.get_raw(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn set_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), ScanbookError> {
        self.set_raw(key, serde_json::to_string(items)?)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

fn poisoned() -> ScanbookError {
    ScanbookError::Storage("store lock poisoned".to_string())
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, ScanbookError> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), ScanbookError> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ScanbookError> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.remove(key);
        Ok(())
    }
}

/// File-backed store: `<dir>/store.json`.
///
/// The whole map is written to a temporary file and renamed over the old
/// one, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonStore {
    pub const FILE_NAME: &'static str = "store.json";

    /// Open (or create) the store in `dir`.
    ///
    /// An unreadable file is logged and treated as empty rather than
    /// blocking startup; it will be replaced on the next write.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ScanbookError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::FILE_NAME);

        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("[store] Ignoring corrupt {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("[store] Opened {} ({} keys)", path.display(), values.len());

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), ScanbookError> {
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("[store] Failed to write {}: {}", self.path.display(), e);
                ScanbookError::Storage(format!("{}: {}", self.path.display(), e))
            })
    }
}

impl KvStore for JsonStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, ScanbookError> {
        let values = self.values.lock().map_err(|_| poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), ScanbookError> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        values.insert(key.to_string(), value);
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), ScanbookError> {
        let mut values = self.values.lock().map_err(|_| poisoned())?;
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_list_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get_list::<String>("k").unwrap().is_empty());
        store.set_list("k", &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(store.get_list::<String>("k").unwrap(), vec!["a", "b"]);
        store.remove("k").unwrap();
        assert_eq!(store.get_raw("k").unwrap(), None);
    }

    #[test]
    fn test_json_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonStore::open(dir.path()).unwrap();
            store.set_raw(USERNAME_KEY, "tester".into()).unwrap();
        }
        let reopened = JsonStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get_raw(USERNAME_KEY).unwrap().as_deref(),
            Some("tester")
        );
    }

    #[test]
    fn test_json_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(JsonStore::FILE_NAME), "not json").unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.get_raw(USERNAME_KEY).unwrap(), None);
    }

    #[test]
    fn test_dyn_store_helpers() {
        let store: Box<dyn KvStore> = Box::new(MemoryStore::new());
        store.set_list("n", &[1u32, 2, 3]).unwrap();
        assert_eq!(store.get_list::<u32>("n").unwrap(), vec![1, 2, 3]);
    }
}
