//! CommitPipeline - turns approved lines into ledger transactions.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::drafting::DraftingError;
use crate::domain::foundation::{PhoneNumber, Timestamp};
use crate::domain::ledger::{NewTransaction, Transaction, TransactionLine, User};
use crate::ports::{TransactionRepository, UserRepository};

use super::category_resolver::CategoryResolver;

/// Outcome of a successful commit.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    pub user: User,
    pub transactions: Vec<Transaction>,
}

impl CommitReceipt {
    pub fn committed(&self) -> usize {
        self.transactions.len()
    }
}

/// Validates, resolves, and writes a set of lines as one atomic batch.
pub struct CommitPipeline {
    users: Arc<dyn UserRepository>,
    resolver: Arc<CategoryResolver>,
    transactions: Arc<dyn TransactionRepository>,
}

impl CommitPipeline {
    pub fn new(
        users: Arc<dyn UserRepository>,
        resolver: Arc<CategoryResolver>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            users,
            resolver,
            transactions,
        }
    }

    /// Commits every line for the user behind `phone`, or nothing.
    ///
    /// Amounts are checked before any lookup, so a bad line never leaves a
    /// partially-written ledger or a freshly-created user behind.
    pub async fn commit(
        &self,
        phone: &PhoneNumber,
        lines: &[TransactionLine],
    ) -> Result<CommitReceipt, DraftingError> {
        // 1. Validate amounts
        if lines.is_empty() {
            return Err(DraftingError::NothingToCommit);
        }
        if let Some((index, line)) = lines.iter().enumerate().find(|(_, l)| l.amount <= 0) {
            warn!(index, amount = line.amount, "Rejected commit with non-positive amount");
            return Err(DraftingError::InvalidAmount {
                index,
                amount: line.amount,
            });
        }

        // 2. Resolve user
        let user = self
            .users
            .find_or_create_by_phone(phone)
            .await
            .map_err(|e| DraftingError::UserResolution(e.to_string()))?;

        // 3. Resolve categories
        let refs: Vec<_> = lines.iter().map(|l| l.category_id).collect();
        let category_ids = self
            .resolver
            .resolve_all(&refs)
            .await
            .map_err(|e| DraftingError::CategoryResolution(e.to_string()))?;

        // 4. Build and persist
        let now = Timestamp::now();
        let transactions = lines
            .iter()
            .zip(category_ids)
            .map(|(line, category_id)| {
                NewTransaction::from_line(user.id, category_id, line)
                    .map(|entry| Transaction::record(entry, now))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.transactions
            .create_batch(&transactions)
            .await
            .map_err(|e| DraftingError::infrastructure(e.to_string()))?;

        info!(
            user_id = %user.id,
            committed = transactions.len(),
            "Committed transactions"
        );

        Ok(CommitReceipt { user, transactions })
    }
}
