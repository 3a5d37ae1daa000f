//! Local key/value storage for the persisted state projection
//!
//! Modeled on browser local storage: string keys, string values, one
//! namespace per file. The store writes its projection under [`STORAGE_KEY`].

use crate::error::{MovieError, Result};
use crate::models::{is_valid_external_id, Movie, MovieResponse};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key the movie state is stored under
pub const STORAGE_KEY: &str = "movie";

/// String key/value storage
pub trait StateStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Storage held in memory only
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock().remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object file
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage file is not UTF-8, starting empty");
                return Ok(BTreeMap::new());
            }
        };

        match serde_json::from_str(&content) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage file unreadable, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(items)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// The persisted subset of the application state (no `loading` flag)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<Movie>,
    pub favorites: Vec<String>,
}

impl PersistedState {
    pub fn response(&self) -> MovieResponse<Movie> {
        MovieResponse {
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            data: self.data.clone(),
        }
    }
}

/// Read the persisted state. `Ok(None)` when nothing was stored yet.
pub fn read_persisted(storage: &dyn StateStorage) -> Result<Option<PersistedState>> {
    let Some(raw) = storage.get_item(STORAGE_KEY)? else {
        return Ok(None);
    };

    let mut state: PersistedState = serde_json::from_str(&raw)
        .map_err(|e| MovieError::MalformedPersistedState(e.to_string()))?;

    let before = state.favorites.len();
    state.favorites.retain(|id| is_valid_external_id(id));
    let mut seen = std::collections::HashSet::new();
    state.favorites.retain(|id| seen.insert(id.clone()));
    if state.favorites.len() != before {
        tracing::warn!(
            dropped = before - state.favorites.len(),
            "ignoring invalid or duplicate persisted favorites"
        );
    }

    Ok(Some(state))
}

/// Serialize `state` and store it under [`STORAGE_KEY`]
pub fn write_persisted(storage: &dyn StateStorage, state: &PersistedState) -> Result<()> {
    let json = serde_json::to_string(state)
        .map_err(|e| MovieError::MalformedPersistedState(e.to_string()))?;
    storage.set_item(STORAGE_KEY, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedState {
        PersistedState {
            page: 2,
            per_page: 10,
            total: 13,
            total_pages: 2,
            data: vec![
                Movie::new("Spiderman", 2002, "tt0145487"),
                Movie::new("Spiderman 2", 2004, "tt0316654"),
            ],
            favorites: vec!["tt0316654".to_string()],
        }
    }

    #[test]
    fn test_absent_key_is_none() {
        let storage = MemoryStorage::new();
        assert!(read_persisted(&storage).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_keeps_fields() {
        let storage = MemoryStorage::new();
        write_persisted(&storage, &sample()).unwrap();
        let restored = read_persisted(&storage).unwrap().unwrap();
        assert_eq!(restored, sample());
    }

    #[test]
    fn test_stored_json_shape() {
        let storage = MemoryStorage::new();
        write_persisted(&storage, &sample()).unwrap();
        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["page"], 2);
        assert_eq!(value["per_page"], 10);
        assert_eq!(value["total_pages"], 2);
        assert_eq!(value["data"][0]["imdbID"], "tt0145487");
        assert_eq!(value["favorites"][0], "tt0316654");
        assert!(value.get("loading").is_none());
    }

    #[test]
    fn test_corrupt_value_is_malformed() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json").unwrap();
        let err = read_persisted(&storage).unwrap_err();
        assert!(matches!(err, MovieError::MalformedPersistedState(_)));

        storage.set_item(STORAGE_KEY, r#"{"page":"two"}"#).unwrap();
        assert!(read_persisted(&storage).is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, r#"{"page":3}"#).unwrap();
        let state = read_persisted(&storage).unwrap().unwrap();
        assert_eq!(state.page, 3);
        assert!(state.data.is_empty());
        assert!(state.favorites.is_empty());
    }

    #[test]
    fn test_invalid_favorites_dropped() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                STORAGE_KEY,
                r#"{"favorites":["tt0145487","bogus","tt١٢","tt0145487","tt0413300"]}"#,
            )
            .unwrap();
        let state = read_persisted(&storage).unwrap().unwrap();
        assert_eq!(state.favorites, vec!["tt0145487", "tt0413300"]);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let storage = FileStorage::new(&path);
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
        write_persisted(&storage, &sample()).unwrap();
        storage.set_item("other", "kept").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(read_persisted(&reopened).unwrap().unwrap(), sample());
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("kept"));

        reopened.remove_item(STORAGE_KEY).unwrap();
        assert!(read_persisted(&reopened).unwrap().is_none());
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_file_storage_garbage_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
        storage.set_item(STORAGE_KEY, "{}").unwrap();
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_storage_binary_file_is_empty_and_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let mut store = crate::store::MovieStore::hydrate(Box::new(FileStorage::new(&path)));
        assert_eq!(store.page(), 0);
        assert!(store.toggle_favorite("tt0145487").unwrap());
        assert!(store.last_persist_error().is_none());

        let reopened = FileStorage::new(&path);
        let state = read_persisted(&reopened).unwrap().unwrap();
        assert_eq!(state.favorites, vec!["tt0145487"]);
    }
}
