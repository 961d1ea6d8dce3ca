//! Durable key-value storage for the portal's client state.
//!
//! Writes never fail from the caller's point of view: a backend that
//! cannot persist logs the problem and keeps going, so the session
//! degrades to in-memory only.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use strum::AsRefStr;
use tracing::{debug, warn};

/// Fixed set of keys the portal persists.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, AsRefStr)]
pub enum StorageKey {
    #[strum(serialize = "accessToken")]
    AccessToken,
    #[strum(serialize = "refreshToken")]
    RefreshToken,
    /// Presence means demo mode is on.
    #[strum(serialize = "isDemoMode")]
    DemoMode,
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: StorageKey) -> Option<String>;
    fn set(&self, key: StorageKey, value: &str);
    fn delete(&self, key: StorageKey);
}

/// Used when no durable storage is available.
#[derive(Debug, Default)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn get(&self, _key: StorageKey) -> Option<String> {
        None
    }

    fn set(&self, _key: StorageKey, _value: &str) {}

    fn delete(&self, _key: StorageKey) {}
}

/// Lives as long as the process; shared via `Arc` it survives a
/// re-created session, which is how tests model a reload.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_ref())
            .cloned()
    }

    fn set(&self, key: StorageKey, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.as_ref().to_string(), value.to_string());
    }

    fn delete(&self, key: StorageKey) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key.as_ref());
    }
}

const STORE_FILE: &str = "session.json";

/// JSON map on disk, mirrored in memory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Opens (or creates) `<dir>/session.json`.
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(STORE_FILE);

        let entries: HashMap<String, String> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, path = %path.display(), "Discarding unreadable storage file");
                HashMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e),
        };

        debug!(path = %path.display(), keys = entries.len(), "Storage opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(e) = self.write_atomically(entries) {
            warn!(error = %e, path = %self.path.display(), "Failed to persist storage");
        }
    }

    fn write_atomically(&self, entries: &HashMap<String, String>) -> io::Result<()> {
        let raw = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_ref())
            .cloned()
    }

    fn set(&self, key: StorageKey, value: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.as_ref().to_string(), value.to_string());
        self.persist(&entries);
    }

    fn delete(&self, key: StorageKey) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key.as_ref()).is_some() {
            self.persist(&entries);
        }
    }
}
