use std::sync::{Arc, Mutex, PoisonError};

use crate::id::{IdSource, UuidIdSource};
use crate::store::SessionStore;

/// Owns the single active session id.
///
/// Storage failures never surface to callers: the id is still returned and
/// kept in memory, and the failure is logged.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ids: Box<dyn IdSource>,
    current: Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_id_source(store, Box::new(UuidIdSource::new()))
    }

    pub fn with_id_source(store: Arc<dyn SessionStore>, ids: Box<dyn IdSource>) -> Self {
        Self {
            store,
            ids,
            current: Mutex::new(None),
        }
    }

    /// Return the persisted id, creating and persisting one if none exists.
    pub fn get_or_create(&self) -> String {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = current.as_ref() {
            return id.clone();
        }

        let stored = match self.store.get() {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read stored session id, starting a new session: {}", e);
                None
            }
        };

        let id = match stored {
            Some(id) => {
                log::debug!("Reusing stored session {}", id);
                id
            }
            None => {
                let id = self.ids.next_id();
                self.persist(&id);
                log::info!("Created session {}", id);
                id
            }
        };

        *current = Some(id.clone());
        id
    }

    /// Replace the active id with a fresh one and persist it.
    ///
    /// Conversation and cart state belonging to the old id must be cleared by
    /// the caller.
    pub fn reset(&self) -> String {
        let id = self.ids.next_id();
        self.persist(&id);
        log::info!("Session reset, new session {}", id);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
        id
    }

    /// The active session id
    pub fn current(&self) -> String {
        self.get_or_create()
    }

    fn persist(&self, id: &str) {
        if let Err(e) = self.store.set(id) {
            log::warn!("Could not persist session id {}: {}", id, e);
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("current", &*self.current.lock().unwrap_or_else(PoisonError::into_inner))
            .finish_non_exhaustive()
    }
}
