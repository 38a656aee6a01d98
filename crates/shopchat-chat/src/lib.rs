//! Conversation and cart state for shopchat, and the controller that keeps
//! them in sync with the commerce backend.
//!
//! [`ShopChat`] runs one gateway call per user action. A successful reply is
//! folded into [`ChatState`] as a single transition; a failed one appends a
//! single error message and touches nothing else.

pub mod controller;
pub mod state;

pub use controller::{Outcome, ShopChat, FAILURE_MARKER};
pub use state::{ChatState, Conversation, LoadingGuard, SharedState};
