use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use shopchat_types::SESSION_STORAGE_KEY;

use crate::SessionError;

/// Durable storage for the active session id.
///
/// Implementations hold at most one id; `set` overwrites whatever was there.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, SessionError>;
    fn set(&self, session_id: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(session_id: &str) -> Self {
        Self {
            value: Mutex::new(Some(session_id.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        Ok(self.value.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, session_id: &str) -> Result<(), SessionError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(session_id.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Key/value JSON file holding the session id under `commerce_session_id`.
///
/// Other keys in the file are left untouched, so the same file can carry
/// additional client state.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key: SESSION_STORAGE_KEY.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, SessionError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(map).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, json).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let map = self.read_map()?;
        Ok(map
            .get(&self.key)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string))
    }

    fn set(&self, session_id: &str) -> Result<(), SessionError> {
        let mut map = self.read_map()?;
        map.insert(self.key.clone(), Value::String(session_id.to_string()));
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut map = self.read_map()?;
        if map.remove(&self.key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
