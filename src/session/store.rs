//! Durable session persistence.
//!
//! Two string-keyed entries, written together on successful auth and
//! removed together on logout: the raw bearer token and the serialized
//! user snapshot. The production store keeps them as two files under
//! the platform data directory; tests use the in-memory store.

use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;
use thiserror::Error;

use crate::api::types::User;

/// Errors raised by a session store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stored user record is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// The pair persisted across process restarts. Token and user always
/// travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Durable storage for the session.
pub trait SessionStore: Send + Sync {
    /// Read the stored session. `Ok(None)` when either entry is absent.
    fn load(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Persist both entries.
    fn save(&self, session: &StoredSession) -> Result<(), StorageError>;

    /// Remove both entries. Succeeds when nothing is stored.
    fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed store: `token` (raw string) and `user.json` under one
/// directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Store rooted at `dirs::data_dir()/bookworm`, falling back to the
    /// current directory when the platform has no data dir.
    pub fn new() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bookworm");
        Self { dir }
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join("token")
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join("user.json")
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let token_path = self.token_path();
        let user_path = self.user_path();

        // Either entry missing means no session; partial writes are
        // treated the same as none at all.
        if !token_path.exists() || !user_path.exists() {
            return Ok(None);
        }

        let token = fs::read_to_string(&token_path).map_err(|source| StorageError::Read {
            path: token_path,
            source,
        })?;
        let user_json = fs::read_to_string(&user_path).map_err(|source| StorageError::Read {
            path: user_path,
            source,
        })?;
        let user: User = serde_json::from_str(&user_json)?;

        Ok(Some(StoredSession { token, user }))
    }

    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let user_json = serde_json::to_string(&session.user)?;

        let token_path = self.token_path();
        fs::write(&token_path, &session.token).map_err(|source| StorageError::Write {
            path: token_path,
            source,
        })?;

        let user_path = self.user_path();
        fs::write(&user_path, user_json).map_err(|source| StorageError::Write {
            path: user_path,
            source,
        })?;

        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        for path in [self.token_path(), self.user_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(StorageError::Write { path, source }),
            }
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session, as if a previous process had
    /// signed in.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StorageError> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> StoredSession {
        StoredSession {
            token: "jwt-token".to_string(),
            user: User {
                id: "u1".to_string(),
                username: "paul".to_string(),
                email: "paul@arrakis.example".to_string(),
                profile_image: None,
                created_at: None,
            },
        }
    }

    #[test]
    fn file_store_roundtrips_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        let session = sample_session();
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, Some(session));
    }

    #[test]
    fn file_store_load_without_entries_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_missing_user_entry_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        // Only the token present: treated the same as nothing stored.
        fs::write(dir.path().join("token"), "jwt-token").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_corrupt_user_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        fs::write(dir.path().join("token"), "jwt-token").unwrap();
        fs::write(dir.path().join("user.json"), "not json {{{").unwrap();

        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        store.clear().unwrap();

        store.save(&sample_session()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);

        store.clear().unwrap();
    }

    #[test]
    fn memory_store_roundtrips_session() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().unwrap(), None);

        let session = sample_session();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
