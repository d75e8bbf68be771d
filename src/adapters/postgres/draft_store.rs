//! PostgreSQL implementation of DraftStore.
//!
//! Drafts live in the shared `message_to_reply` correlation table; the
//! lines are stored as JSONB in `additional`. Versioned claims are a single
//! conditional `DELETE ... RETURNING`, so the database arbitrates races.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::drafting::{Draft, FeatureTag};
use crate::domain::foundation::{DomainError, MessageId, Timestamp};
use crate::domain::ledger::TransactionLine;
use crate::ports::DraftStore;

/// PostgreSQL implementation of DraftStore.
#[derive(Clone)]
pub struct PostgresDraftStore {
    pool: PgPool,
}

impl PostgresDraftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftStore for PostgresDraftStore {
    async fn put(&self, draft: &Draft) -> Result<u64, DomainError> {
        let version: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO message_to_reply (
                message_id, feature_type, message, additional, version, created_at
            ) VALUES ($1, $2, $3, $4, $5 + 1, $6)
            ON CONFLICT (message_id) DO UPDATE SET
                feature_type = EXCLUDED.feature_type,
                message = EXCLUDED.message,
                additional = EXCLUDED.additional,
                created_at = EXCLUDED.created_at,
                version = GREATEST(message_to_reply.version + 1, EXCLUDED.version)
            RETURNING version
            "#,
        )
        .bind(draft.correlation_id.as_str())
        .bind(draft.feature.as_str())
        .bind(&draft.rendered_summary)
        .bind(Json(&draft.lines))
        .bind(draft.version as i64)
        .bind(draft.created_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to store draft: {}", e)))?;

        Ok(version as u64)
    }

    async fn get(&self, correlation_id: &MessageId) -> Result<Option<Draft>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT message_id, feature_type, message, additional, version, created_at
            FROM message_to_reply
            WHERE message_id = $1
            "#,
        )
        .bind(correlation_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch draft: {}", e)))?;

        row.map(row_to_draft).transpose()
    }

    async fn take(
        &self,
        correlation_id: &MessageId,
        expected_version: u64,
    ) -> Result<Option<Draft>, DomainError> {
        let row = sqlx::query(
            r#"
            DELETE FROM message_to_reply
            WHERE message_id = $1 AND version = $2
            RETURNING message_id, feature_type, message, additional, version, created_at
            "#,
        )
        .bind(correlation_id.as_str())
        .bind(expected_version as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to claim draft: {}", e)))?;

        row.map(row_to_draft).transpose()
    }

    async fn delete(&self, correlation_id: &MessageId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM message_to_reply WHERE message_id = $1")
            .bind(correlation_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete draft: {}", e)))?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_draft(row: sqlx::postgres::PgRow) -> Result<Draft, DomainError> {
    let message_id: String = row
        .try_get("message_id")
        .map_err(|e| DomainError::database(format!("Failed to get message_id: {}", e)))?;
    let feature: String = row
        .try_get("feature_type")
        .map_err(|e| DomainError::database(format!("Failed to get feature_type: {}", e)))?;
    let summary: String = row
        .try_get("message")
        .map_err(|e| DomainError::database(format!("Failed to get message: {}", e)))?;
    let additional: Option<Json<Value>> = row
        .try_get("additional")
        .map_err(|e| DomainError::database(format!("Failed to get additional: {}", e)))?;
    let version: i64 = row
        .try_get("version")
        .map_err(|e| DomainError::database(format!("Failed to get version: {}", e)))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::database(format!("Failed to get created_at: {}", e)))?;

    let feature = FeatureTag::parse(&feature);
    let lines = decode_lines(&feature, additional.map(|Json(v)| v))?;

    Ok(Draft {
        correlation_id: MessageId::new(message_id)?,
        feature,
        rendered_summary: summary,
        lines,
        version: version as u64,
        created_at: Timestamp::from_datetime(created_at),
    })
}

/// Decodes the `additional` payload into draft lines.
///
/// Rows written by other features may carry any payload and decode to no
/// lines. A cashflow row whose lines cannot be read is an error.
fn decode_lines(
    feature: &FeatureTag,
    payload: Option<Value>,
) -> Result<Vec<TransactionLine>, DomainError> {
    let decoded = payload.map(serde_json::from_value::<Vec<TransactionLine>>);
    match (feature, decoded) {
        (FeatureTag::AiCashflow, Some(Ok(lines))) => Ok(lines),
        (FeatureTag::AiCashflow, Some(Err(e))) => Err(DomainError::database(format!(
            "Failed to decode draft lines: {}",
            e
        ))),
        (FeatureTag::AiCashflow, None) => {
            Err(DomainError::database("Cashflow draft has no lines payload"))
        }
        (_, decoded) => Ok(decoded.and_then(Result::ok).unwrap_or_default()),
    }
}
