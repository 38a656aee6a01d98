//! Core types and structures for shopchat
//!
//! This crate provides the data model shared by the session, gateway, chat
//! and application crates: conversation messages, the opaque product payload
//! returned by the commerce backend, and the normalized gateway reply.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Storage key under which the active session id is persisted
pub const SESSION_STORAGE_KEY: &str = "commerce_session_id";

/// Query sent along with an image search when the user gives none
pub const DEFAULT_IMAGE_QUERY: &str = "Find similar products";

/// Greeting shown as the first assistant message of a fresh conversation
pub const INITIAL_GREETING: &str = "**Hey! I'm ShopAI.**\n\nAsk me for product ideas \
(e.g., _recommend running shoes under $100_), or use **/image** with a URL or a local \
file to find similar items. You can also manage a cart with commands like `add #2` or \
`view cart`.";

// ============================================================================
// Serde helpers
// ============================================================================

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// Optional display text: numbers and booleans are stringified, objects and
/// arrays are dropped instead of failing the whole payload
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Null | serde_json::Value::Object(_) | serde_json::Value::Array(_) => Ok(None),
        other => Ok(Some(other.to_string())),
    }
}

// ============================================================================
// Product Types
// ============================================================================

/// Price as sent by the backend; some catalogs store it as a number, others
/// as free text such as `"$19.99"` or `"19.99"`. Any other shape is kept
/// as-is and displays as nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Price {
    /// Format for display: numbers get two decimals, text gets a `$` prefix
    /// unless it already has one. Empty text stays empty.
    pub fn display(&self) -> String {
        match self {
            Price::Amount(value) => format!("${:.2}", value),
            Price::Text(text) if text.is_empty() => String::new(),
            Price::Text(text) if text.starts_with('$') => text.clone(),
            Price::Text(text) => format!("${}", text),
            Price::Other(_) => String::new(),
        }
    }
}

/// Product payload returned by the backend.
///
/// The client never mutates products; fields it does not know about are kept
/// in `extra` so they survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Price>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_text",
        default
    )]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_text",
        default
    )]
    pub image_url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_text",
        default
    )]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn named(name: &str) -> Self {
        Self {
            product_name: name.to_string(),
            ..Self::default()
        }
    }

    /// Formatted price, or an empty string when the product has none
    pub fn price_label(&self) -> String {
        self.price.as_ref().map(Price::display).unwrap_or_default()
    }
}

/// Cart entries have the same shape as products
pub type CartItem = Product;

// ============================================================================
// Message Types
// ============================================================================

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub products: Option<Vec<Product>>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            products: None,
        }
    }

    pub fn assistant(text: impl Into<String>, products: Option<Vec<Product>>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            products,
        }
    }

    /// Products attached to this message, empty when there are none
    pub fn product_list(&self) -> &[Product] {
        self.products.as_deref().unwrap_or(&[])
    }
}

// ============================================================================
// Gateway Types
// ============================================================================

/// Normalized response of every backend operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GatewayReply {
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub products: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cart: Option<Vec<CartItem>>,
}

/// Positional cart/product reference of the form `#N`, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRef(String);

impl ItemRef {
    /// Reference for the product displayed at 0-based `index`
    pub fn from_index(index: usize) -> Self {
        Self(format!("#{}", index + 1))
    }

    /// Reference for a 1-based number as shown to the user; `None` for zero
    pub fn from_position(position: usize) -> Option<Self> {
        position.checked_sub(1).map(Self::from_index)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_item_ref_is_one_based() {
        assert_eq!(ItemRef::from_index(0).as_str(), "#1");
        assert_eq!(ItemRef::from_index(4).as_str(), "#5");
        assert_eq!(ItemRef::from_position(2), Some(ItemRef::from_index(1)));
        assert_eq!(ItemRef::from_position(0), None);
    }

    #[test]
    fn test_item_ref_serializes_as_plain_string() {
        let value = serde_json::to_value(ItemRef::from_index(1)).unwrap();
        assert_eq!(value, json!("#2"));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::Amount(12.5).display(), "$12.50");
        assert_eq!(Price::Text("19.99".to_string()).display(), "$19.99");
        assert_eq!(Price::Text("$5".to_string()).display(), "$5");
        assert_eq!(Price::Text(String::new()).display(), "");
        assert_eq!(Product::named("x").price_label(), "");
    }

    #[test]
    fn test_product_keeps_unknown_fields() {
        let raw = json!({
            "product_name": "Trail Runner",
            "price": 89.0,
            "url": "https://shop.example/trail",
            "rating_overall": 4.5,
            "review_count": "120"
        });
        let product: Product = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(product.product_name, "Trail Runner");
        assert_eq!(product.price, Some(Price::Amount(89.0)));
        assert_eq!(product.extra.get("rating_overall"), Some(&json!(4.5)));
        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }

    #[test]
    fn test_product_tolerates_null_name() {
        let product: Product = serde_json::from_value(json!({ "product_name": null })).unwrap();
        assert_eq!(product.product_name, "");
    }

    #[test]
    fn test_product_tolerates_unexpected_field_types() {
        let product: Product = serde_json::from_value(json!({
            "product_name": "Lamp",
            "price": true,
            "description": 42,
            "image_url": { "src": "lamp.png" },
            "url": null
        }))
        .unwrap();
        assert_eq!(product.price, Some(Price::Other(json!(true))));
        assert_eq!(product.price_label(), "");
        assert_eq!(product.description.as_deref(), Some("42"));
        assert_eq!(product.image_url, None);
        assert_eq!(product.url, None);
    }

    #[test]
    fn test_reply_with_mixed_product_shapes_still_decodes() {
        let reply: GatewayReply = serde_json::from_value(json!({
            "answer": "Here you go",
            "products": [
                { "product_name": "Mug", "price": 7.0 },
                { "product_name": "Lamp", "description": 42 }
            ],
            "cart": [{ "product_name": "Rug", "price": { "amount": 30 } }]
        }))
        .unwrap();
        let products = reply.products.unwrap();
        assert_eq!(products[0].price_label(), "$7.00");
        assert_eq!(products[1].description.as_deref(), Some("42"));
        assert_eq!(reply.cart.unwrap()[0].price_label(), "");
    }

    #[test]
    fn test_reply_defaults_missing_fields() {
        let reply: GatewayReply = serde_json::from_value(json!({ "answer": null })).unwrap();
        assert_eq!(reply, GatewayReply::default());

        let reply: GatewayReply = serde_json::from_value(json!({
            "answer": "ok",
            "products": [{ "product_name": "Mug", "price": "7" }],
            "cart": []
        }))
        .unwrap();
        assert_eq!(reply.answer, "ok");
        assert_eq!(reply.products.as_ref().map(Vec::len), Some(1));
        assert_eq!(reply.cart, Some(Vec::new()));
    }

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hello");
        assert_eq!(user.role, Role::User);
        assert!(user.product_list().is_empty());

        let assistant = Message::assistant("hi", Some(vec![Product::named("Lamp")]));
        assert_eq!(assistant.role, Role::Assistant);
        assert_eq!(assistant.product_list().len(), 1);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
