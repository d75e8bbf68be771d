//! PostgreSQL implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::ledger::Transaction;
use crate::ports::TransactionRepository;

/// PostgreSQL implementation of TransactionRepository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create_batch(&self, transactions: &[Transaction]) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        for t in transactions {
            sqlx::query(
                r#"
                INSERT INTO transactions (
                    id, user_id, category_id, type, amount, description, transaction_date
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(t.id.as_uuid())
            .bind(t.user_id.as_uuid())
            .bind(t.category_id.value())
            .bind(t.kind.as_str())
            .bind(t.amount)
            .bind(&t.description)
            .bind(t.transaction_date.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to insert transaction: {}", e)))?;
        }

        // Dropping `tx` on an early return rolls the batch back.
        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit transactions: {}", e)))?;

        Ok(())
    }
}
