use async_trait::async_trait;
use shopchat_chat::{SharedState, ShopChat};
use shopchat_gateway::{Backend, Gateway, GatewayError};
use shopchat_session::{IdSource, MemorySessionStore, SessionManager, SessionStore};
use shopchat_types::{GatewayReply, Message, Product};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

/// One request seen by the fake backend
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub payload: serde_json::Value,
    pub loading: Option<bool>,
    pub messages: Vec<Message>,
}

/// Scripted backend: replies are queued per path, everything is recorded.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<HashMap<String, VecDeque<Result<GatewayReply, GatewayError>>>>,
    delays: Mutex<HashMap<String, Duration>>,
    probe: OnceLock<SharedState>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, path: &str, reply: Result<GatewayReply, GatewayError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn delay(&self, path: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
    }

    /// Let the backend observe controller state while a request is in flight
    pub fn attach(&self, state: SharedState) {
        let _ = self.probe.set(state);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("no calls recorded")
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<GatewayReply, GatewayError> {
        let (loading, messages) = match self.probe.get() {
            Some(state) => (
                Some(state.is_loading()),
                state.read(|s| s.conversation.messages().to_vec()),
            ),
            None => (None, Vec::new()),
        };
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            payload,
            loading,
            messages,
        });

        let delay = self.delays.lock().unwrap().get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .replies
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        queued.unwrap_or_else(|| Ok(ok_reply("ok")))
    }
}

/// Deterministic ids: `id-0`, `id-1`, ...
pub struct SequentialIds(pub AtomicUsize);

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
    }
}

pub struct Harness {
    pub chat: ShopChat<Arc<FakeBackend>>,
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemorySessionStore>,
}

pub fn harness() -> Harness {
    harness_with_store(Arc::new(MemorySessionStore::new()), 0)
}

/// `first_id` offsets the generated ids so separate harnesses never collide
pub fn harness_with_store(store: Arc<MemorySessionStore>, first_id: usize) -> Harness {
    let backend = FakeBackend::new();
    let session = SessionManager::with_id_source(
        store.clone() as Arc<dyn SessionStore>,
        Box::new(SequentialIds(AtomicUsize::new(first_id))),
    );
    let chat = ShopChat::with_greeting(Gateway::new(backend.clone()), session, "Welcome!");
    backend.attach(chat.state());
    Harness { chat, backend, store }
}

pub fn products(names: &[&str]) -> Vec<Product> {
    names.iter().map(|n| Product::named(n)).collect()
}

pub fn ok_reply(answer: &str) -> GatewayReply {
    GatewayReply {
        answer: answer.to_string(),
        products: None,
        cart: None,
    }
}

pub fn full_reply(answer: &str, found: &[&str], cart: &[&str]) -> GatewayReply {
    GatewayReply {
        answer: answer.to_string(),
        products: Some(products(found)),
        cart: Some(products(cart)),
    }
}

pub fn server_error(body: &str) -> GatewayError {
    GatewayError::Status {
        status: 500,
        body: body.to_string(),
    }
}
