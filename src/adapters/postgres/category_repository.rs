//! PostgreSQL implementation of CategoryRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{CategoryId, DomainError};
use crate::domain::ledger::Category;
use crate::ports::CategoryRepository;

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to list categories: {}", e)))?;

        rows.into_iter().map(row_to_category).collect()
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to fetch category: {}", e)))?;

        row.map(row_to_category).transpose()
    }

    async fn create(&self, name: &str) -> Result<Category, DomainError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            r#"
            INSERT INTO categories (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to create category: {}", e)))?;

        row_to_category(row)
    }
}

fn row_to_category(row: sqlx::postgres::PgRow) -> Result<Category, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::database(format!("Failed to get id: {}", e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::database(format!("Failed to get name: {}", e)))?;

    Ok(Category::new(id, name))
}
