//! Bot account credential lookup port.

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError};
use crate::domain::messaging::BotAccount;

/// Repository port for bot account credentials.
#[async_trait]
pub trait BotAccountRepository: Send + Sync {
    /// Find the credentials for an account. Returns `None` if not registered.
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<BotAccount>, DomainError>;
}
