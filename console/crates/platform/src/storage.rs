//! Key/Value Storage Infrastructure
//!
//! Synchronous string key/value stores backing persisted client state.
//! Two backends are provided: [`MemoryStore`] for tests and ephemeral shells,
//! and [`FileStore`], a JSON file that survives restarts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend refuses reads or writes (quota, disabled, blocked)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content could not be (de)serialized
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Error classification
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Server
    }

    /// Convert to the unified application error
    pub fn to_app_error(&self) -> AppError {
        AppError::server("Local storage is unavailable")
            .with_action("Check browser storage settings or contact support")
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        err.to_app_error().with_source(err)
    }
}

/// String key/value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory store
///
/// Can be switched to a blocked mode where every operation fails, which is
/// how a disabled or full browser storage behaves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    blocked: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose operations always fail
    pub fn blocked() -> Self {
        let store = Self::default();
        store.set_blocked(true);
        store
    }

    /// Toggle the blocked mode
    pub fn set_blocked(&self, blocked: bool) {
        *self.blocked.lock() = blocked;
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StorageError> {
        if *self.blocked.lock() {
            return Err(StorageError::Unavailable("storage is blocked".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

/// JSON-file store
///
/// Entries are cached in memory and written through to a single JSON object
/// file on every mutation. The cache only changes once the file write
/// succeeded, so memory and disk never disagree.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// File name used inside the data directory
    pub const FILE_NAME: &'static str = "storage.json";

    /// Open (or create) the store inside `dir`
    ///
    /// A corrupt file is discarded with a warning and the store starts empty.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::FILE_NAME);

        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupt storage file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
