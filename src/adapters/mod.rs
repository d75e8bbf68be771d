//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application core to external systems:
//! - `ai` - Extraction providers (Gemini, mock)
//! - `http` - REST endpoints and chat webhooks (axum)
//! - `messaging` - Outbound chat gateways and media download
//! - `postgres` - PostgreSQL persistence (sqlx)
//! - `storage` - In-memory persistence for tests and local runs

pub mod ai;
pub mod http;
pub mod messaging;
pub mod postgres;
pub mod storage;
