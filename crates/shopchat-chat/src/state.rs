use serde::Serialize;
use shopchat_types::{CartItem, GatewayReply, Message, Product};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Ordered message log; append-only except for [`Conversation::replace_all`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation holding only `greeting`
    pub fn with_greeting(greeting: &str) -> Self {
        let mut conversation = Self::new();
        conversation.replace_all(greeting);
        conversation
    }

    pub fn append_user(&mut self, text: &str) {
        self.messages.push(Message::user(text));
    }

    pub fn append_assistant(&mut self, text: &str, products: Option<Vec<Product>>) {
        self.messages.push(Message::assistant(text, products));
    }

    /// Drop the whole log and start over with one assistant message
    pub fn replace_all(&mut self, greeting: &str) {
        self.messages.clear();
        self.messages.push(Message::assistant(greeting, None));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Products of the most recent message that carried any
    pub fn last_products(&self) -> Option<&[Product]> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.products.as_deref().filter(|p| !p.is_empty()))
    }
}

/// Everything a completed gateway call may change, updated as one unit.
///
/// Cart and last results are only ever replaced wholesale with what the
/// backend sent; the client never merges or edits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatState {
    pub conversation: Conversation,
    pub cart: Vec<CartItem>,
    pub last_results: Vec<Product>,
}

impl ChatState {
    pub fn new(greeting: &str) -> Self {
        Self {
            conversation: Conversation::with_greeting(greeting),
            cart: Vec::new(),
            last_results: Vec::new(),
        }
    }

    /// Chat and image search replies: results and cart come from the reply,
    /// missing lists count as empty.
    pub fn apply_search_reply(&mut self, reply: GatewayReply) {
        self.last_results = reply.products.clone().unwrap_or_default();
        self.cart = reply.cart.unwrap_or_default();
        self.conversation.append_assistant(&reply.answer, reply.products);
    }

    /// Cart operation replies. With `refresh_results` the reply's products
    /// replace the last results when present and the old ones are kept
    /// otherwise.
    pub fn apply_cart_reply(&mut self, reply: GatewayReply, refresh_results: bool) {
        self.cart = reply.cart.unwrap_or_default();
        if refresh_results {
            if let Some(products) = reply.products {
                self.last_results = products;
            }
        }
        self.conversation.append_assistant(&reply.answer, None);
    }

    /// Session reset: one assistant message, nothing in the cart or results
    pub fn apply_reset(&mut self, reply: GatewayReply) {
        self.conversation.replace_all(&reply.answer);
        self.cart.clear();
        self.last_results.clear();
    }

    /// A failed call only adds its error message
    pub fn apply_failure(&mut self, text: &str) {
        self.conversation.append_assistant(text, None);
    }
}

struct Inner {
    state: Mutex<ChatState>,
    in_flight: AtomicUsize,
}

/// Cloneable handle to the state shared by concurrent gateway calls.
///
/// Every transition runs under one lock, so readers never observe the
/// conversation, cart and results out of step with each other.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Inner>,
}

impl SharedState {
    pub fn new(state: ChatState) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one transition atomically and return its result
    pub fn update<R>(&self, f: impl FnOnce(&mut ChatState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Read under the lock without cloning the whole state
    pub fn read<R>(&self, f: impl FnOnce(&ChatState) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> ChatState {
        self.lock().clone()
    }

    /// Mark a call as in flight until the returned guard is dropped
    pub fn begin_request(&self) -> LoadingGuard {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard { inner: Arc::clone(&self.inner) }
    }

    /// True while at least one gateway call is unresolved
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("state", &*self.lock())
            .field("in_flight", &self.inner.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

/// Clears the loading mark on drop, whichever way the call ended
pub struct LoadingGuard {
    inner: Arc<Inner>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
