//! Session id management for shopchat
//!
//! The backend keys conversation history and cart contents by a session id
//! chosen by the client. This crate keeps exactly one such id alive, persists
//! it through a [`SessionStore`] so it survives restarts, and swaps it for a
//! fresh one on explicit reset.

pub mod id;
pub mod manager;
pub mod store;

pub use id::{EntropyFill, IdSource, TimestampIdSource, UuidIdSource};
pub use manager::SessionManager;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use std::path::PathBuf;

/// Errors raised by session storage backends
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to access session storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session storage at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
