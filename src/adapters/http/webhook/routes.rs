//! Axum router configuration for chat gateway webhooks.

use axum::{routing::post, Router};

use super::handlers::{handle_baileys_webhook, handle_waha_webhook, WebhookAppState};

/// Create the webhook router, mounted at `/webhook`.
///
/// # Routes
/// - `POST /webhook/waha` - WAHA events
/// - `POST /webhook/baileys` - Baileys messages
///
/// Payloads are signature-checked when a webhook key is configured.
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().nest(
        "/webhook",
        Router::new()
            .route("/waha", post(handle_waha_webhook))
            .route("/baileys", post(handle_baileys_webhook)),
    )
}
