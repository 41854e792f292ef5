//! # Local Storage
//!
//! Durable key/value storage for the few values that outlive a run: the
//! access token and the selected UI language.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known storage keys.
pub mod keys {
    /// Persisted access token.
    pub const TOKEN: &str = "token";
    /// Selected UI language.
    pub const LANG: &str = "lang";
}

/// A string key/value store. All keys are absent by default.
pub trait LocalStorage: Send + Sync {
    /// Returns the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set_item(&self, key: &str, value: &str);

    /// Removes `key`.
    fn remove_item(&self, key: &str);
}

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage holding `items`.
    #[must_use]
    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            items: Mutex::new(items),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items.lock().insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.lock().remove(key);
    }
}

/// Storage backed by a flat JSON object on disk.
///
/// The file is read on first access. Every write saves the whole object;
/// a failed save is logged and the in-memory value is kept.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: Option<PathBuf>,
    items: Mutex<Option<BTreeMap<String, String>>>,
}

impl JsonFileStorage {
    /// Opens storage at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            items: Mutex::new(None),
        }
    }

    /// Opens storage in the user's config directory.
    ///
    /// If no config directory exists, values are only kept in memory.
    #[must_use]
    pub fn open_default() -> Self {
        let path = dirs::config_dir().map(|p| p.join("nitro").join("storage.json"));
        if path.is_none() {
            tracing::warn!("Could not determine config directory, storage will not persist");
        }
        Self {
            path,
            items: Mutex::new(None),
        }
    }

    fn read(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(?path, error = %e, "Failed to parse storage, starting empty");
                BTreeMap::new()
            }),
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read storage, starting empty");
                BTreeMap::new()
            }
        }
    }

    fn write(path: &Path, items: &BTreeMap<String, String>) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create storage directory: {e}"))?;
        }
        let contents = serde_json::to_string_pretty(items)
            .map_err(|e| format!("Failed to serialize storage: {e}"))?;
        fs::write(path, contents).map_err(|e| format!("Failed to write storage: {e}"))
    }

    fn with_items<R>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> R) -> R {
        let mut guard = self.items.lock();
        let items = guard.get_or_insert_with(|| match &self.path {
            Some(path) => Self::read(path),
            None => BTreeMap::new(),
        });
        f(items)
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        self.with_items(|items| {
            if let Err(e) = Self::write(path, items) {
                tracing::warn!(?path, "{}", e);
            }
        });
    }
}

impl LocalStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.with_items(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) {
        self.with_items(|items| items.insert(key.to_string(), value.to_string()));
        self.persist();
    }

    fn remove_item(&self, key: &str) {
        let removed = self.with_items(|items| items.remove(key)).is_some();
        if removed {
            self.persist();
        }
    }
}
