//! In-Memory Bot Account Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::messaging::BotAccount;
use crate::ports::BotAccountRepository;

/// In-memory bot account credentials
#[derive(Debug, Clone, Default)]
pub struct InMemoryBotAccountRepository {
    accounts: Arc<RwLock<HashMap<AccountId, BotAccount>>>,
}

impl InMemoryBotAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<BotAccount>) -> Self {
        let map = accounts
            .into_iter()
            .map(|a| (a.account_id.clone(), a))
            .collect();
        Self {
            accounts: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn insert(&self, account: BotAccount) {
        self.accounts
            .write()
            .await
            .insert(account.account_id.clone(), account);
    }
}

#[async_trait]
impl BotAccountRepository for InMemoryBotAccountRepository {
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<BotAccount>, DomainError> {
        Ok(self.accounts.read().await.get(account_id).cloned())
    }
}
