//! Axum router configuration for the cashflow endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    create_transaction, handle_bot_message, handle_reply_action, CashflowAppState,
};

/// Create the cashflow API router.
///
/// # Routes
/// - `POST /transaction` - Extract transactions from text, optionally saving them
/// - `POST /bot` - Handle a chat message forwarded by a bot service
/// - `POST /bot/reply-action` - Handle a quoted reply to a draft
pub fn cashflow_routes() -> Router<CashflowAppState> {
    Router::new()
        .route("/transaction", post(create_transaction))
        .route("/bot", post(handle_bot_message))
        .route("/bot/reply-action", post(handle_reply_action))
}

/// Create the complete cashflow module router, mounted at `/ai-cashflow`.
pub fn cashflow_router() -> Router<CashflowAppState> {
    Router::new().nest("/ai-cashflow", cashflow_routes())
}
