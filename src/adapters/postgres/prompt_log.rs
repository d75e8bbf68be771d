//! PostgreSQL implementation of PromptLog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::{PromptLog, PromptLogEntry};

/// PostgreSQL implementation of PromptLog.
#[derive(Clone)]
pub struct PostgresPromptLog {
    pool: PgPool,
}

impl PostgresPromptLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromptLog for PostgresPromptLog {
    async fn record(&self, entry: PromptLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO log_prompts (
                model, prompt, response, token_used, response_time_ms, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.model)
        .bind(&entry.prompt)
        .bind(&entry.response)
        .bind(entry.tokens_used as i32)
        .bind(entry.elapsed_ms as i64)
        .bind(entry.logged_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert prompt log: {}", e)))?;

        Ok(())
    }
}
