use serde::Serialize;
use shopchat_types::{GatewayReply, ItemRef};

use crate::client::Backend;
use crate::error::GatewayError;
use crate::image::ImageInput;
use crate::requests::{CartItemRequest, ChatRequest, ImageRequest, SessionRequest};

/// Operation paths on the backend
pub mod paths {
    pub const CHAT: &str = "/chat";
    pub const IMAGE: &str = "/image";
    pub const CART_ADD: &str = "/cart/add";
    pub const CART_VIEW: &str = "/cart/view";
    pub const CART_REMOVE: &str = "/cart/remove";
    pub const CART_CHECKOUT: &str = "/cart/checkout";
    pub const SESSION_RESET: &str = "/session/reset";
}

/// The backend operations, one POST each.
///
/// The gateway only translates intents into requests; folding replies into
/// conversation and cart state is the caller's job.
pub struct Gateway<B> {
    backend: B,
}

impl<B: Backend> Gateway<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn send<T: Serialize>(&self, path: &str, request: &T) -> Result<GatewayReply, GatewayError> {
        let payload = serde_json::to_value(request)?;
        self.backend.post(path, payload).await
    }

    /// Free-text query; the backend interprets `add #2`, `view cart` and the like.
    pub async fn chat(&self, session_id: &str, query: &str) -> Result<GatewayReply, GatewayError> {
        self.send(paths::CHAT, &ChatRequest { session_id, query }).await
    }

    pub async fn image_search(
        &self,
        session_id: &str,
        image: &ImageInput,
        query: &str,
    ) -> Result<GatewayReply, GatewayError> {
        let request = match image {
            ImageInput::Url(url) => ImageRequest {
                session_id,
                image_url: Some(url.as_str()),
                image_b64: None,
                query,
            },
            ImageInput::Inline(data) => ImageRequest {
                session_id,
                image_url: None,
                image_b64: Some(data.as_str()),
                query,
            },
        };
        self.send(paths::IMAGE, &request).await
    }

    pub async fn add_to_cart(&self, session_id: &str, item: &ItemRef) -> Result<GatewayReply, GatewayError> {
        self.send(paths::CART_ADD, &CartItemRequest { session_id, item }).await
    }

    pub async fn view_cart(&self, session_id: &str) -> Result<GatewayReply, GatewayError> {
        self.send(paths::CART_VIEW, &SessionRequest { session_id }).await
    }

    pub async fn remove_from_cart(&self, session_id: &str, item: &ItemRef) -> Result<GatewayReply, GatewayError> {
        self.send(paths::CART_REMOVE, &CartItemRequest { session_id, item }).await
    }

    pub async fn checkout(&self, session_id: &str) -> Result<GatewayReply, GatewayError> {
        self.send(paths::CART_CHECKOUT, &SessionRequest { session_id }).await
    }

    /// Start a clean server-side session under `session_id` (the new id)
    pub async fn reset(&self, session_id: &str) -> Result<GatewayReply, GatewayError> {
        self.send(paths::SESSION_RESET, &SessionRequest { session_id }).await
    }
}
