//! In-Memory Ledger Adapter
//!
//! Stores committed transactions and prompt logs in memory.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::ledger::Transaction;
use crate::ports::{PromptLog, PromptLogEntry, TransactionRepository};

/// In-memory transaction ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    transactions: Arc<RwLock<Vec<Transaction>>>,
    fail_writes: bool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that rejects every write, for failure-path tests.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// All committed transactions in commit order.
    pub async fn all(&self) -> Vec<Transaction> {
        self.transactions.read().await.clone()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryLedger {
    async fn create_batch(&self, transactions: &[Transaction]) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::database("ledger unavailable"));
        }
        self.transactions
            .write()
            .await
            .extend(transactions.iter().cloned());
        Ok(())
    }
}

/// In-memory prompt audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPromptLog {
    entries: Arc<RwLock<Vec<PromptLogEntry>>>,
}

impl InMemoryPromptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<PromptLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl PromptLog for InMemoryPromptLog {
    async fn record(&self, entry: PromptLogEntry) -> Result<(), DomainError> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CategoryId, Timestamp, UserId};
    use crate::domain::ledger::{NewTransaction, TransactionLine};

    fn transaction() -> Transaction {
        let line = TransactionLine::expense(15000, 1, "kopi");
        let entry = NewTransaction::from_line(UserId::new(), CategoryId::new(1), &line).unwrap();
        Transaction::record(entry, Timestamp::now())
    }

    #[tokio::test]
    async fn batch_is_appended() {
        let ledger = InMemoryLedger::new();
        ledger.create_batch(&[transaction(), transaction()]).await.unwrap();
        assert_eq!(ledger.all().await.len(), 2);
    }

    #[tokio::test]
    async fn failing_ledger_stores_nothing() {
        let ledger = InMemoryLedger::failing();
        assert!(ledger.create_batch(&[transaction()]).await.is_err());
        assert!(ledger.all().await.is_empty());
    }
}
