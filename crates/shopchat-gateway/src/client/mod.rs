use async_trait::async_trait;
use shopchat_types::GatewayReply;
use std::sync::Arc;

use crate::error::GatewayError;

pub mod http;

/// Transport seam between the gateway and the commerce backend.
///
/// `path` is one of the fixed operation paths (e.g. `/cart/add`) and
/// `payload` the JSON body. Implementations treat any 2xx as success.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<GatewayReply, GatewayError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<GatewayReply, GatewayError> {
        (**self).post(path, payload).await
    }
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Box<B> {
    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<GatewayReply, GatewayError> {
        (**self).post(path, payload).await
    }
}
