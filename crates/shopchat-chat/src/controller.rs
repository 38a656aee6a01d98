use shopchat_gateway::{Backend, Gateway, GatewayError, ImageInput};
use shopchat_session::SessionManager;
use shopchat_types::{CartItem, GatewayReply, ItemRef, Message, Product, DEFAULT_IMAGE_QUERY, INITIAL_GREETING};

use crate::state::{ChatState, SharedState};

/// Prefix of every locally generated error message
pub const FAILURE_MARKER: &str = "❌";

const GENERIC_FAILURE: &str = "Something went wrong";

/// How a user action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The reply was applied to the state
    Applied,
    /// The call failed; the text is what was appended to the conversation
    Failed(String),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// How a successful reply is folded into the state
#[derive(Debug, Clone, Copy)]
enum Fold {
    Search,
    Cart { refresh_results: bool },
    Reset,
}

/// Session, conversation and cart of one shopping assistant client.
///
/// Methods take `&self`; calls may overlap and each applies its effects when
/// its own reply arrives.
pub struct ShopChat<B> {
    gateway: Gateway<B>,
    session: SessionManager,
    state: SharedState,
}

impl<B: Backend> ShopChat<B> {
    pub fn new(gateway: Gateway<B>, session: SessionManager) -> Self {
        Self::with_greeting(gateway, session, INITIAL_GREETING)
    }

    pub fn with_greeting(gateway: Gateway<B>, session: SessionManager, greeting: &str) -> Self {
        let session_id = session.get_or_create();
        log::debug!("Conversation started for session {}", session_id);
        Self {
            gateway,
            session,
            state: SharedState::new(ChatState::new(greeting)),
        }
    }

    pub fn session_id(&self) -> String {
        self.session.current()
    }

    pub fn gateway(&self) -> &Gateway<B> {
        &self.gateway
    }

    /// Handle to the shared state, e.g. for a renderer running alongside
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.snapshot()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.read(|s| s.conversation.messages().to_vec())
    }

    /// Messages appended after the first `start` ones
    pub fn messages_since(&self, start: usize) -> Vec<Message> {
        self.state
            .read(|s| s.conversation.messages().get(start..).map(<[Message]>::to_vec))
            .unwrap_or_default()
    }

    pub fn message_count(&self) -> usize {
        self.state.read(|s| s.conversation.len())
    }

    pub fn cart(&self) -> Vec<CartItem> {
        self.state.read(|s| s.cart.clone())
    }

    pub fn last_results(&self) -> Vec<Product> {
        self.state.read(|s| s.last_results.clone())
    }

    /// Composer entry point: trims the input and ignores blank submissions.
    pub async fn submit(&self, input: &str) -> Option<Outcome> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }
        Some(self.send_chat(query).await)
    }

    /// Free-text query, forwarded verbatim to `/chat`
    pub async fn send_chat(&self, query: &str) -> Outcome {
        let _loading = self.state.begin_request();
        self.state.update(|s| s.conversation.append_user(query));

        let session_id = self.session.current();
        let result = self.gateway.chat(&session_id, query).await;
        self.finish("chat", result, Fold::Search)
    }

    /// Image similarity search; `query` defaults to "Find similar products"
    pub async fn send_image(&self, image: &ImageInput, query: Option<&str>) -> Outcome {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_IMAGE_QUERY);

        let _loading = self.state.begin_request();
        self.state.update(|s| s.conversation.append_user(&image.describe(query)));

        let session_id = self.session.current();
        let result = self.gateway.image_search(&session_id, image, query).await;
        self.finish("image search", result, Fold::Search)
    }

    /// Add the product displayed at 0-based `index` of the last results
    pub async fn add_to_cart(&self, index: usize) -> Outcome {
        let _loading = self.state.begin_request();
        let session_id = self.session.current();
        let item = ItemRef::from_index(index);
        let result = self.gateway.add_to_cart(&session_id, &item).await;
        self.finish("add to cart", result, Fold::Cart { refresh_results: true })
    }

    pub async fn view_cart(&self) -> Outcome {
        let _loading = self.state.begin_request();
        let session_id = self.session.current();
        let result = self.gateway.view_cart(&session_id).await;
        self.finish("view cart", result, Fold::Cart { refresh_results: true })
    }

    /// Remove the cart entry at 0-based `index`
    pub async fn remove_from_cart(&self, index: usize) -> Outcome {
        let _loading = self.state.begin_request();
        let session_id = self.session.current();
        let item = ItemRef::from_index(index);
        let result = self.gateway.remove_from_cart(&session_id, &item).await;
        self.finish("remove from cart", result, Fold::Cart { refresh_results: false })
    }

    pub async fn checkout(&self) -> Outcome {
        let _loading = self.state.begin_request();
        let session_id = self.session.current();
        let result = self.gateway.checkout(&session_id).await;
        self.finish("checkout", result, Fold::Cart { refresh_results: false })
    }

    /// Switch to a fresh session id, then ask the backend to start it clean.
    ///
    /// The new id is persisted before the call, so it stays active even if
    /// the backend call fails; the conversation is only replaced on success.
    pub async fn reset_session(&self) -> Outcome {
        let _loading = self.state.begin_request();
        let session_id = self.session.reset();
        let result = self.gateway.reset(&session_id).await;
        self.finish("session reset", result, Fold::Reset)
    }

    fn finish(&self, operation: &str, result: Result<GatewayReply, GatewayError>, fold: Fold) -> Outcome {
        match result {
            Ok(reply) => {
                self.state.update(|s| match fold {
                    Fold::Search => s.apply_search_reply(reply),
                    Fold::Cart { refresh_results } => s.apply_cart_reply(reply, refresh_results),
                    Fold::Reset => s.apply_reset(reply),
                });
                Outcome::Applied
            }
            Err(e) => {
                log::error!("{} failed: {}", operation, e);
                let mut detail = e.user_message();
                if detail.trim().is_empty() {
                    detail = GENERIC_FAILURE.to_string();
                }
                let text = format!("{} {}", FAILURE_MARKER, detail);
                self.state.update(|s| s.apply_failure(&text));
                Outcome::Failed(text)
            }
        }
    }
}
