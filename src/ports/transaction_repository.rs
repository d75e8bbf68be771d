//! Ledger write port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::ledger::Transaction;

/// Repository port for committed transactions.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a batch of transactions atomically.
    ///
    /// Either every transaction is stored or none is.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (nothing was written)
    async fn create_batch(&self, transactions: &[Transaction]) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn TransactionRepository) {}
    }
}
