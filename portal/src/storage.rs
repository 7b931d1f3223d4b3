//! Durable client storage and session persistence
//!
//! The session survives restarts as a single record under [`SESSION_KEY`]
//! holding the serialized identity, token included. Storage failures are
//! never fatal: a missing or malformed record simply means "no session".

use autohire_client::{Identity, TokenSource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Key of the persisted session record
pub const SESSION_KEY: &str = "auth_user";

/// Errors raised by durable storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        /// Record key
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialized
    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        /// Record key
        key: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// A small string key-value store that survives restarts
pub trait DurableStore: Send + Sync {
    /// Read a record
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a record, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a record; deleting a missing record succeeds
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Directory-backed store, one `<key>.json` file per record
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store records under `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl DurableStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(io_error(key))?;
        std::fs::write(self.path(key), value).map_err(io_error(key))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

/// In-memory store; clones share the same records
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DurableStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records().remove(key);
        Ok(())
    }
}

/// Reads and writes the persisted session
///
/// Also serves as the HTTP client's [`TokenSource`]: every request reads
/// the token from storage, so a logout takes effect immediately.
#[derive(Clone)]
pub struct SessionPersistence {
    store: Arc<dyn DurableStore>,
}

impl std::fmt::Debug for SessionPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPersistence").finish_non_exhaustive()
    }
}

impl SessionPersistence {
    /// Persist sessions in `store`
    #[must_use]
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    /// The persisted identity, if a valid one exists
    ///
    /// A record that does not parse, or that carries no token, is removed.
    #[must_use]
    pub fn restore(&self) -> Option<Identity> {
        match self.read() {
            Record::Valid(identity) => Some(identity),
            Record::Invalid(reason) => {
                tracing::warn!(reason, "Discarding persisted session");
                self.discard();
                None
            },
            Record::Missing => None,
        }
    }

    /// The persisted identity, if a valid one exists, without touching storage
    #[must_use]
    pub fn peek(&self) -> Option<Identity> {
        match self.read() {
            Record::Valid(identity) => Some(identity),
            Record::Invalid(_) | Record::Missing => None,
        }
    }

    fn read(&self) -> Record {
        let raw = match self.store.load(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Record::Missing,
            Err(error) => {
                tracing::warn!(%error, "Failed to read persisted session");
                return Record::Missing;
            },
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) if identity.token.is_some() => Record::Valid(identity),
            Ok(_) => Record::Invalid("no token"),
            Err(_) => Record::Invalid("malformed record"),
        }
    }

    /// Persist `identity`, replacing any previous session
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the identity cannot be serialized or written.
    pub fn persist(&self, identity: &Identity) -> Result<(), StorageError> {
        let raw = serde_json::to_string(identity).map_err(|source| StorageError::Serialize {
            key: SESSION_KEY.to_string(),
            source,
        })?;
        self.store.save(SESSION_KEY, &raw)
    }

    /// Forget the persisted session
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the record cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(SESSION_KEY)
    }

    fn discard(&self) {
        if let Err(error) = self.clear() {
            tracing::warn!(%error, "Failed to remove malformed session");
        }
    }
}

enum Record {
    Missing,
    Valid(Identity),
    Invalid(&'static str),
}

impl TokenSource for SessionPersistence {
    fn bearer_token(&self) -> Option<String> {
        self.peek().and_then(|identity| identity.token)
    }
}
