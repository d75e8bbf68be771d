//! HTTP adapter for the cashflow bot.
//!
//! - `POST /ai-cashflow/transaction` - Direct text input
//! - `POST /ai-cashflow/bot` - Forwarded chat message
//! - `POST /ai-cashflow/bot/reply-action` - Reply to a draft

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{CashflowApiError, CashflowAppState};
pub use routes::cashflow_router;
