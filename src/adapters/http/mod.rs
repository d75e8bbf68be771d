//! HTTP adapters - REST API and webhook endpoints.
//!
//! Each surface has its own state and router; `api_router` joins them.

pub mod cashflow;
pub mod health;
pub mod response;
pub mod webhook;

use axum::Router;

pub use cashflow::{cashflow_router, CashflowAppState};
pub use health::health_routes;
pub use response::ApiResponse;
pub use webhook::{webhook_router, WebhookAppState, WebhookVerifier};

/// Builds the complete application router.
///
/// # Example
///
/// ```ignore
/// let app = api_router(cashflow_state, webhook_state);
/// axum::serve(listener, app).await?;
/// ```
pub fn api_router(cashflow: CashflowAppState, webhook: WebhookAppState) -> Router {
    Router::new()
        .merge(cashflow_router().with_state(cashflow))
        .merge(webhook_router().with_state(webhook))
        .merge(health_routes())
}
