//! Request bodies of the backend operations

use serde::Serialize;
use shopchat_types::ItemRef;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub session_id: &'a str,
    pub query: &'a str,
}

/// Exactly one of `image_url` / `image_b64` is set
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest<'a> {
    pub session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<&'a str>,
    pub query: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartItemRequest<'a> {
    pub session_id: &'a str,
    pub item: &'a ItemRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest<'a> {
    pub session_id: &'a str,
}
