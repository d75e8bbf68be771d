//! PostgreSQL implementation of BotAccountRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::messaging::{BotAccount, BotType};
use crate::ports::BotAccountRepository;

/// PostgreSQL implementation of BotAccountRepository.
#[derive(Clone)]
pub struct PostgresBotAccountRepository {
    pool: PgPool,
}

impl PostgresBotAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BotAccountRepository for PostgresBotAccountRepository {
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<BotAccount>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT bot_type, base_url, api_key, session_id
            FROM account_bots
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch bot account: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let get = |column: &str| -> Result<String, DomainError> {
            row.try_get(column)
                .map_err(|e| DomainError::database(format!("Failed to get {}: {}", column, e)))
        };

        let bot_type: BotType = get("bot_type")?
            .parse()
            .map_err(|e| DomainError::database(format!("Invalid bot type: {}", e)))?;

        Ok(Some(BotAccount::new(
            account_id.clone(),
            bot_type,
            get("base_url")?,
            get("api_key")?,
            get("session_id")?,
        )))
    }
}
