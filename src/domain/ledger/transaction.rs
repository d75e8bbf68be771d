//! Transaction lines and committed ledger entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    CategoryId, Timestamp, TransactionId, UserId, ValidationError,
};

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("expected INCOME or EXPENSE, got '{}'", other),
            )),
        }
    }
}

/// One proposed income or expense entry.
///
/// Lines live inside drafts before the user approves them, so `amount` may be
/// provisional (zero or negative) and `category_id` may be absent or point at
/// nothing. Both are checked only when the line is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub kind: TransactionKind,
    pub amount: i64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub description: String,
}

impl TransactionLine {
    pub fn new(
        kind: TransactionKind,
        amount: i64,
        category_id: Option<CategoryId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            category_id,
            description: description.into(),
        }
    }

    /// Shorthand for an expense line.
    pub fn expense(amount: i64, category_id: i64, description: impl Into<String>) -> Self {
        Self::new(
            TransactionKind::Expense,
            amount,
            Some(CategoryId::new(category_id)),
            description,
        )
    }

    /// Shorthand for an income line.
    pub fn income(amount: i64, category_id: i64, description: impl Into<String>) -> Self {
        Self::new(
            TransactionKind::Income,
            amount,
            Some(CategoryId::new(category_id)),
            description,
        )
    }
}

/// A validated ledger entry ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    user_id: UserId,
    category_id: CategoryId,
    kind: TransactionKind,
    amount: i64,
    description: String,
}

impl NewTransaction {
    /// Builds a ledger entry from an approved line and a resolved category.
    ///
    /// # Errors
    ///
    /// Returns `NotPositive` when the amount is zero or negative.
    pub fn from_line(
        user_id: UserId,
        category_id: CategoryId,
        line: &TransactionLine,
    ) -> Result<Self, ValidationError> {
        if line.amount <= 0 {
            return Err(ValidationError::not_positive("amount", line.amount));
        }
        if !category_id.is_assignable() {
            return Err(ValidationError::invalid_format(
                "category_id",
                format!("category {} is not assignable", category_id),
            ));
        }
        Ok(Self {
            user_id,
            category_id,
            kind: line.kind,
            amount: line.amount,
            description: line.description.trim().to_string(),
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A committed ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub transaction_date: Timestamp,
}

impl Transaction {
    /// Assigns identity and a commit time to a validated entry.
    pub fn record(entry: NewTransaction, at: Timestamp) -> Self {
        Self {
            id: TransactionId::new(),
            user_id: entry.user_id,
            category_id: entry.category_id,
            kind: entry.kind,
            amount: entry.amount,
            description: entry.description,
            transaction_date: at,
        }
    }
}
