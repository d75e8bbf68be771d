//! Inbound chat messages, decoded once at the boundary.

use serde::Serialize;

use crate::domain::foundation::{AccountId, MessageId, PhoneNumber, ValidationError};

/// Body of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { body: String },
    Image { caption: Option<String>, media_url: String },
}

impl MessageContent {
    /// Text the user typed: the body, or the image caption.
    pub fn text(&self) -> &str {
        match self {
            MessageContent::Text { body } => body,
            MessageContent::Image { caption, .. } => caption.as_deref().unwrap_or_default(),
        }
    }
}

/// A message received on one of the bot accounts.
///
/// `chat_id` is where replies go (a direct chat or a group); `sender` is the
/// user who wrote the message and the identity transactions are booked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundMessage {
    pub account_id: AccountId,
    pub chat_id: String,
    pub sender: PhoneNumber,
    pub participant: Option<String>,
    pub message_id: MessageId,
    pub quoted_message_id: Option<MessageId>,
    pub content: MessageContent,
}

impl InboundMessage {
    /// Starts a text message; refine with the `with_*` setters.
    pub fn text(
        account_id: AccountId,
        chat_id: impl Into<String>,
        sender: PhoneNumber,
        message_id: MessageId,
        body: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            chat_id: chat_id.into(),
            sender,
            participant: None,
            message_id,
            quoted_message_id: None,
            content: MessageContent::Text { body: body.into() },
        }
    }

    /// Marks the message as a reply to `quoted`.
    pub fn quoting(mut self, quoted: MessageId) -> Self {
        self.quoted_message_id = Some(quoted);
        self
    }

    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = Some(participant.into());
        self
    }

    pub fn with_content(mut self, content: MessageContent) -> Self {
        self.content = content;
        self
    }

    pub fn body_text(&self) -> &str {
        self.content.text()
    }

    pub fn is_reply(&self) -> bool {
        self.quoted_message_id.is_some()
    }
}

/// Parses an optional quoted id, treating blanks as absent.
pub fn optional_message_id(raw: Option<&str>) -> Option<MessageId> {
    raw.and_then(|id| MessageId::new(id).ok())
}

/// Parses the sender, preferring the group participant when present.
pub fn sender_of(from: &str, participant: Option<&str>) -> Result<PhoneNumber, ValidationError> {
    match participant.filter(|p| !p.trim().is_empty()) {
        Some(p) => PhoneNumber::new(p),
        None => PhoneNumber::new(from),
    }
}
