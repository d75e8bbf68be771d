//! Ledger owner.

use serde::Serialize;

use crate::domain::foundation::{PhoneNumber, UserId};

/// A user, identified to the chat side by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub phone: PhoneNumber,
    pub name: Option<String>,
}

impl User {
    /// Creates a user record for a phone number seen for the first time.
    pub fn register(phone: PhoneNumber) -> Self {
        Self {
            id: UserId::new(),
            phone,
            name: None,
        }
    }
}
