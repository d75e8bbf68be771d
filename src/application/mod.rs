//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::drafting::{
    CategoryResolver, CommitPipeline, CommitReceipt, ConversationRouter, EntryPoint,
    IgnoreReason, InputTransactionCommand, InputTransactionHandler, InputTransactionResult,
    Proposal, ReconciliationEngine, RouterOutcome,
};
