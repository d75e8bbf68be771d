//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the PannyPal domain.

mod errors;
mod ids;
mod money;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, CategoryId, MessageId, PhoneNumber, TransactionId, UserId};
pub use money::{format_rupiah, group_thousands};
pub use timestamp::Timestamp;
