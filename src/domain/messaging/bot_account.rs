//! Bot account credentials and outbound messages.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AccountId, MessageId, ValidationError};

/// Chat gateway flavour an account is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BotType {
    Waha,
    Baileys,
}

impl BotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotType::Waha => "WAHA",
            BotType::Baileys => "BAILEYS",
        }
    }
}

impl fmt::Display for BotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WAHA" => Ok(BotType::Waha),
            "BAILEYS" => Ok(BotType::Baileys),
            other => Err(ValidationError::invalid_format(
                "bot_type",
                format!("unknown bot type '{}'", other),
            )),
        }
    }
}

/// Credentials for sending through one bot account.
#[derive(Debug, Clone)]
pub struct BotAccount {
    pub account_id: AccountId,
    pub bot_type: BotType,
    pub base_url: String,
    api_key: Secret<String>,
    pub session_id: String,
}

impl BotAccount {
    pub fn new(
        account_id: AccountId,
        bot_type: BotType,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            bot_type,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: Secret::new(api_key.into()),
            session_id: session_id.into(),
        }
    }

    /// Exposes the API key (for making requests).
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// A text message to deliver through a bot account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub account_id: AccountId,
    pub recipient: String,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub participant: Option<String>,
}

impl OutboundMessage {
    pub fn new(account_id: AccountId, recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            account_id,
            recipient: recipient.into(),
            text: text.into(),
            reply_to: None,
            participant: None,
        }
    }

    pub fn replying_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    pub fn with_participant(mut self, participant: Option<String>) -> Self {
        self.participant = participant;
        self
    }
}
