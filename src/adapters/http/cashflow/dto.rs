//! HTTP DTOs for the cashflow bot endpoints.
//!
//! These types define the JSON request/response structure for the cashflow API
//! and convert bot API payloads into the same `InboundMessage` the chat
//! webhooks produce.

use serde::{Deserialize, Serialize};

use crate::application::{IgnoreReason, InputTransactionResult, RouterOutcome};
use crate::domain::foundation::{AccountId, MessageId, ValidationError};
use crate::domain::ledger::{Transaction, TransactionKind, TransactionLine};
use crate::domain::messaging::{
    optional_message_id, sender_of, BotType, InboundMessage, MessageContent,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to extract (and optionally save) transactions from free text.
#[derive(Debug, Clone, Deserialize)]
pub struct InputTransactionRequest {
    pub phone_number: String,
    pub message: String,
    /// Return the proposal only, without writing to the ledger.
    #[serde(default)]
    pub save_as_draft: bool,
}

/// A chat event forwarded by a bot service.
///
/// `from` is the bot account that received the message and `to` is the chat
/// it came from, which is where replies are sent.
#[derive(Debug, Clone, Deserialize)]
pub struct BotMessageRequest {
    #[serde(default)]
    pub type_bot: Option<BotType>,
    #[serde(default)]
    pub message: String,
    /// `text` or `image`.
    #[serde(rename = "type", default)]
    pub message_type: String,
    pub message_id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub quoted_message_id: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub participant: Option<String>,
}

impl BotMessageRequest {
    pub fn into_inbound(self) -> Result<InboundMessage, ValidationError> {
        let account_id = AccountId::new(self.from)?;
        let sender = sender_of(&self.to, self.participant.as_deref())?;
        let message_id = MessageId::new(self.message_id)?;

        let content = if self.message_type.eq_ignore_ascii_case("image") {
            let media_url = self
                .media_url
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| ValidationError::empty_field("media_url"))?;
            MessageContent::Image {
                caption: Some(self.message).filter(|m| !m.trim().is_empty()),
                media_url,
            }
        } else {
            MessageContent::Text { body: self.message }
        };

        let mut inbound = InboundMessage::text(account_id, self.to, sender, message_id, "")
            .with_content(content);
        if let Some(quoted) = optional_message_id(self.quoted_message_id.as_deref()) {
            inbound = inbound.quoting(quoted);
        }
        if let Some(participant) = self.participant.filter(|p| !p.trim().is_empty()) {
            inbound = inbound.with_participant(participant);
        }
        Ok(inbound)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// One proposed line as shown to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLineResponse {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: i64,
    pub category_id: Option<i64>,
    pub description: String,
}

impl From<&TransactionLine> for TransactionLineResponse {
    fn from(line: &TransactionLine) -> Self {
        Self {
            kind: line.kind,
            amount: line.amount,
            category_id: line.category_id.map(|c| c.value()),
            description: line.description.clone(),
        }
    }
}

/// A committed ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: i64,
    pub category_id: i64,
    pub description: String,
    /// ISO 8601.
    pub transaction_date: String,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            user_id: tx.user_id.to_string(),
            kind: tx.kind,
            amount: tx.amount,
            category_id: tx.category_id.value(),
            description: tx.description.clone(),
            transaction_date: tx.transaction_date.as_datetime().to_rfc3339(),
        }
    }
}

/// Result of direct transaction input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputTransactionResponse {
    pub req_payload: Vec<TransactionLineResponse>,
    pub summary: String,
    pub saved: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<TransactionResponse>,
}

impl From<InputTransactionResult> for InputTransactionResponse {
    fn from(result: InputTransactionResult) -> Self {
        Self {
            req_payload: result.lines.iter().map(Into::into).collect(),
            summary: result.summary,
            saved: result.committed.is_some(),
            transactions: result
                .committed
                .unwrap_or_default()
                .iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// What the bot did with a forwarded chat event.
#[derive(Debug, Clone, Serialize, Default)]
pub struct BotOutcomeResponse {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<TransactionLineResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_reason: Option<IgnoreReason>,
}

impl BotOutcomeResponse {
    /// Builds the body for every non-failure outcome.
    pub fn from_outcome(outcome: &RouterOutcome) -> Self {
        let mut response = Self {
            outcome: outcome.label().to_string(),
            ..Self::default()
        };
        match outcome {
            RouterOutcome::Proposed { draft_id, lines }
            | RouterOutcome::Revised { draft_id, lines } => {
                response.draft_id = Some(draft_id.to_string());
                response.lines = Some(lines.iter().map(Into::into).collect());
            }
            RouterOutcome::Saved { committed } => response.committed = Some(*committed),
            RouterOutcome::Ignored(reason) => response.ignored_reason = Some(reason.clone()),
            RouterOutcome::Cancelled
            | RouterOutcome::Clarified
            | RouterOutcome::DraftNotFound
            | RouterOutcome::Failed(_) => {}
        }
        response
    }
}
