//! Ledger module - categories, users, and committed transactions.

mod category;
mod transaction;
mod user;

pub use category::{
    catalog_listing, effective_category, find_in, Category, DEFAULT_CATEGORY_NAME,
};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionLine};
pub use user::User;
