/*!
 * Session persistence port.
 *
 * The orchestrator only talks to the `SessionStore` trait, so the persistence
 * medium (a JSON file on disk, an in-memory slot for tests) is swappable
 * without touching orchestration logic. There is exactly one slot: at most
 * one session is persisted at a time.
 */

use log::warn;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::errors::SessionError;
use crate::session::models::TranslationSession;

/// Narrow persistence interface for the single session slot
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any.
    ///
    /// A record that fails shape validation is treated as corrupt: it is
    /// discarded and reported as absent rather than failing the caller.
    fn get(&self) -> Result<Option<TranslationSession>, SessionError>;

    /// Persist the session, replacing any previous copy.
    fn put(&self, session: &TranslationSession) -> Result<(), SessionError>;

    /// Remove the persisted session, if any.
    fn clear(&self) -> Result<(), SessionError>;
}

/// File-backed store: one JSON document at a fixed path
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store over an explicit slot path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store at the default per-user location
    pub fn new_default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("yabtwai").join("session.json"))
    }

    /// The slot path this store writes to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<TranslationSession>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| SessionError::Storage(format!("{:?}: {}", self.path, e)))?;

        match serde_json::from_str::<TranslationSession>(&raw) {
            Ok(session) if session.is_valid() => Ok(Some(session)),
            Ok(_) => {
                warn!("Discarding persisted session with an empty id");
                self.clear()?;
                Ok(None)
            }
            Err(e) => {
                warn!("Discarding corrupt persisted session: {}", e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn put(&self, session: &TranslationSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::Storage(format!("{:?}: {}", parent, e)))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| SessionError::Storage(format!("{:?}: {}", self.path, e)))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| SessionError::Storage(format!("{:?}: {}", self.path, e)))?;
        }
        Ok(())
    }
}

/// In-memory store used by tests
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<TranslationSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<TranslationSession>, SessionError> {
        Ok(self.slot.lock().clone())
    }

    fn put(&self, session: &TranslationSession) -> Result<(), SessionError> {
        *self.slot.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
