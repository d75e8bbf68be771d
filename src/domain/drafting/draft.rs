//! Pending drafts awaiting a save, edit, or cancel reply.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{MessageId, Timestamp};
use crate::domain::ledger::TransactionLine;

/// Feature a correlated outbound message belongs to.
///
/// The correlation table is shared with other bot features; only
/// `AiCashflow` drafts are handled by the cashflow router.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureTag {
    AiCashflow,
    Other(String),
}

impl FeatureTag {
    pub fn as_str(&self) -> &str {
        match self {
            FeatureTag::AiCashflow => "AI_CASHFLOW",
            FeatureTag::Other(tag) => tag,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "AI_CASHFLOW" => FeatureTag::AiCashflow,
            other => FeatureTag::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FeatureTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FeatureTag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FeatureTag::parse(&raw))
    }
}

/// A proposal shown to the user, keyed by the id of the message that showed it.
///
/// `version` is assigned by the draft store on every write and is the token a
/// reply must present to claim the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub correlation_id: MessageId,
    pub feature: FeatureTag,
    pub rendered_summary: String,
    pub lines: Vec<TransactionLine>,
    pub version: u64,
    pub created_at: Timestamp,
}

impl Draft {
    /// Creates an unsaved cashflow draft.
    pub fn cashflow(
        correlation_id: MessageId,
        rendered_summary: impl Into<String>,
        lines: Vec<TransactionLine>,
    ) -> Self {
        Self {
            correlation_id,
            feature: FeatureTag::AiCashflow,
            rendered_summary: rendered_summary.into(),
            lines,
            version: 0,
            created_at: Timestamp::now(),
        }
    }

    pub fn is_cashflow(&self) -> bool {
        self.feature == FeatureTag::AiCashflow
    }
}
