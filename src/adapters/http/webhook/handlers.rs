//! HTTP handlers for chat gateway webhooks.
//!
//! Gateways only need to know the event was accepted, so processing runs on
//! a spawned task and the response goes out immediately.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::{ConversationRouter, EntryPoint};
use crate::domain::foundation::ValidationError;
use crate::domain::messaging::InboundMessage;

use super::super::response::ApiResponse;
use super::dto::{BaileysWebhook, WahaWebhook};
use super::signature::{SignatureError, WebhookVerifier, SIGNATURE_HEADER};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook endpoints.
#[derive(Clone)]
pub struct WebhookAppState {
    pub router: Arc<ConversationRouter>,
    /// Signature check; `None` accepts unsigned payloads.
    pub verifier: Option<WebhookVerifier>,
}

impl WebhookAppState {
    pub fn new(router: Arc<ConversationRouter>, verifier: Option<WebhookVerifier>) -> Self {
        Self { router, verifier }
    }

    fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), WebhookApiError> {
        let Some(verifier) = &self.verifier else {
            return Ok(());
        };
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        verifier.verify(body, signature)?;
        Ok(())
    }

    fn dispatch(&self, message: InboundMessage) {
        let router = self.router.clone();
        tokio::spawn(async move {
            router.route(message, EntryPoint::ChatWebhook).await;
        });
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook/waha - Receive a WAHA event.
pub async fn handle_waha_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    state.verify(&headers, &body)?;
    let event: WahaWebhook = decode(&body)?;
    accept(&state, "waha", event.into_inbound()?)
}

/// POST /webhook/baileys - Receive a Baileys message.
pub async fn handle_baileys_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    state.verify(&headers, &body)?;
    let event: BaileysWebhook = decode(&body)?;
    accept(&state, "baileys", event.into_inbound()?)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, WebhookApiError> {
    serde_json::from_slice(body).map_err(|e| WebhookApiError::InvalidPayload(e.to_string()))
}

fn accept(
    state: &WebhookAppState,
    gateway: &'static str,
    message: Option<InboundMessage>,
) -> Result<ApiResponse<serde_json::Value>, WebhookApiError> {
    match message {
        Some(message) => {
            debug!(
                gateway,
                message_id = %message.message_id,
                account_id = %message.account_id,
                "Webhook message accepted"
            );
            state.dispatch(message);
            Ok(ApiResponse::ok("Webhook accepted", json!({ "accepted": true })))
        }
        None => Ok(ApiResponse::ok("Webhook skipped", json!({ "accepted": false }))),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum WebhookApiError {
    #[error("Invalid signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] ValidationError),
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self {
            WebhookApiError::Signature(_) => (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE"),
            WebhookApiError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
            WebhookApiError::InvalidMessage(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
        };
        warn!(error = %self, "Webhook rejected");
        ApiResponse::error(status, error_code, self.to_string()).into_response()
    }
}
