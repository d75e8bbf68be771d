//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, PhoneNumber, UserId};
use crate::domain::ledger::User;
use crate::ports::UserRepository;

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_or_create_by_phone(&self, phone: &PhoneNumber) -> Result<User, DomainError> {
        let fresh = User::register(phone.clone());

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, phone_number) VALUES ($1, $2)
            ON CONFLICT (phone_number) DO UPDATE SET phone_number = EXCLUDED.phone_number
            RETURNING id, phone_number, name
            "#,
        )
        .bind(fresh.id.as_uuid())
        .bind(phone.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to resolve user: {}", e)))?;

        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
        let name: Option<String> = row
            .try_get("name")
            .map_err(|e| DomainError::database(format!("Failed to get name: {}", e)))?;

        Ok(User {
            id: UserId::from_uuid(id),
            phone: phone.clone(),
            name,
        })
    }
}
