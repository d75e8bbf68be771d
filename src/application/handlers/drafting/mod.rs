//! Drafting handlers - the propose/confirm workflow.

mod category_resolver;
mod commit;
mod input_transaction;
mod reconcile;
mod router;

pub use category_resolver::CategoryResolver;
pub use commit::{CommitPipeline, CommitReceipt};
pub use input_transaction::{
    InputTransactionCommand, InputTransactionHandler, InputTransactionResult,
};
pub use reconcile::{Proposal, ReconciliationEngine};
pub use router::{ConversationRouter, EntryPoint, IgnoreReason, RouterOutcome};
