//! InputTransactionHandler - direct text-to-ledger input over the REST API.

use std::sync::Arc;

use crate::domain::drafting::DraftingError;
use crate::domain::foundation::PhoneNumber;
use crate::domain::ledger::{Transaction, TransactionLine};

use super::commit::CommitPipeline;
use super::reconcile::ReconciliationEngine;

/// Command to extract transactions from text and optionally commit them.
#[derive(Debug, Clone)]
pub struct InputTransactionCommand {
    pub phone: PhoneNumber,
    pub message: String,
    pub save_as_draft: bool,
}

/// Extracted lines and, when committed, the stored transactions.
#[derive(Debug, Clone)]
pub struct InputTransactionResult {
    pub lines: Vec<TransactionLine>,
    pub summary: String,
    pub committed: Option<Vec<Transaction>>,
}

/// Handler for direct transaction input.
pub struct InputTransactionHandler {
    engine: Arc<ReconciliationEngine>,
    commit: Arc<CommitPipeline>,
}

impl InputTransactionHandler {
    pub fn new(engine: Arc<ReconciliationEngine>, commit: Arc<CommitPipeline>) -> Self {
        Self { engine, commit }
    }

    pub async fn handle(
        &self,
        cmd: InputTransactionCommand,
    ) -> Result<InputTransactionResult, DraftingError> {
        if cmd.message.trim().is_empty() {
            return Err(DraftingError::ValidationFailed {
                field: "message".to_string(),
                message: "message cannot be empty".to_string(),
            });
        }

        let proposal = self.engine.propose_from_text_freeform(&cmd.message).await?;

        let committed = if cmd.save_as_draft {
            None
        } else {
            let receipt = self.commit.commit(&cmd.phone, &proposal.lines).await?;
            Some(receipt.transactions)
        };

        Ok(InputTransactionResult {
            lines: proposal.lines,
            summary: proposal.summary,
            committed,
        })
    }
}
