//! User lookup port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PhoneNumber};
use crate::domain::ledger::User;

/// Repository port for ledger users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the user registered under `phone`, creating one if needed.
    ///
    /// Must be safe under concurrent calls for the same phone: both callers
    /// get the same user.
    async fn find_or_create_by_phone(&self, phone: &PhoneNumber) -> Result<User, DomainError>;
}
