//! HTTP adapter for chat gateway webhooks.
//!
//! - `POST /webhook/waha` - WAHA events
//! - `POST /webhook/baileys` - Baileys messages

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod signature;

pub use handlers::{WebhookApiError, WebhookAppState};
pub use routes::webhook_router;
pub use signature::{SignatureError, WebhookVerifier, SIGNATURE_HEADER};
