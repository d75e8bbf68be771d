//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCategoryRepository` - Category catalog
//! - `PostgresUserRepository` - Phone-keyed user registry
//! - `PostgresTransactionRepository` - Atomic ledger batches
//! - `PostgresDraftStore` - Versioned draft correlation table
//! - `PostgresPromptLog` - Provider exchange audit log
//! - `PostgresBotAccountRepository` - Chat gateway credentials

mod bot_account_repository;
mod category_repository;
mod draft_store;
mod prompt_log;
mod transaction_repository;
mod user_repository;

pub use bot_account_repository::PostgresBotAccountRepository;
pub use category_repository::PostgresCategoryRepository;
pub use draft_store::PostgresDraftStore;
pub use prompt_log::PostgresPromptLog;
pub use transaction_repository::PostgresTransactionRepository;
pub use user_repository::PostgresUserRepository;
