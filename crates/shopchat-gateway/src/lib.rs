//! # shopchat-gateway
//!
//! Request/response adapter for the commerce assistant backend. Every
//! operation posts one JSON body to a fixed path and folds the answer into a
//! normalized [`GatewayReply`]:
//!
//! - `/chat` - free-text queries, forwarded verbatim
//! - `/image` - image similarity search by URL or inline data
//! - `/cart/add`, `/cart/view`, `/cart/remove`, `/cart/checkout`
//! - `/session/reset`
//!
//! ## Example
//!
//! ```rust,no_run
//! use shopchat_gateway::{Gateway, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = HttpBackend::new("http://localhost:8000", None, false)?;
//!     let gateway = Gateway::new(backend);
//!
//!     let reply = gateway.chat("my-session", "recommend running shoes under $100").await?;
//!     println!("{}", reply.answer);
//!     for product in reply.products.unwrap_or_default() {
//!         println!("- {}", product.product_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod image;
pub mod requests;

pub use client::{http::HttpBackend, Backend};
pub use config::{normalize_api_base, resolve_api_base, API_BASE_ENV, DEFAULT_API_BASE};
pub use error::GatewayError;
pub use gateway::{paths, Gateway};
pub use image::{ImageError, ImageInput};
pub use shopchat_types::GatewayReply;
