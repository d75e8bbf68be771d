//! Prompt audit log port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, Timestamp};

/// One provider exchange, kept for cost and quality review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptLogEntry {
    pub model: String,
    pub prompt: String,
    pub response: String,
    pub tokens_used: u32,
    pub elapsed_ms: u64,
    pub logged_at: Timestamp,
}

/// Port for recording provider exchanges.
#[async_trait]
pub trait PromptLog: Send + Sync {
    async fn record(&self, entry: PromptLogEntry) -> Result<(), DomainError>;
}
