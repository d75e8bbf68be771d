//! Storage Adapters
//!
//! In-memory implementations of the persistence ports. Used by tests and
//! when no database URL is configured.

mod in_memory_bot_accounts;
mod in_memory_catalog;
mod in_memory_drafts;
mod in_memory_ledger;

pub use in_memory_bot_accounts::InMemoryBotAccountRepository;
pub use in_memory_catalog::{InMemoryCategoryRepository, InMemoryUserRepository};
pub use in_memory_drafts::InMemoryDraftStore;
pub use in_memory_ledger::{InMemoryLedger, InMemoryPromptLog};
