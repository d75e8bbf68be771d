//! Baileys gateway sender.
//!
//! `POST {base_url}/api/message/send` with a bearer key. The platform
//! message id comes back as `data.key.id`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::MessageId;
use crate::domain::messaging::{BotAccount, OutboundMessage};
use crate::ports::{AccountSender, DeliveredMessage, MessagingError};

use super::http_client;

/// Sends text through a Baileys gateway.
pub struct BaileysSender {
    client: Client,
}

impl BaileysSender {
    pub fn new(timeout: Duration) -> Result<Self, MessagingError> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl AccountSender for BaileysSender {
    async fn send_via(
        &self,
        account: &BotAccount,
        message: &OutboundMessage,
    ) -> Result<DeliveredMessage, MessagingError> {
        let response = self
            .client
            .post(format!("{}/api/message/send", account.base_url))
            .bearer_auth(account.api_key())
            .json(&SendRequest::from_outbound(account, message))
            .send()
            .await
            .map_err(|e| MessagingError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessagingError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: SendResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::Network(format!("Failed to parse response: {}", e)))?;

        body.message_id().map(|message_id| DeliveredMessage { message_id })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    session_id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    to: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    participant: Option<&'a str>,
}

impl<'a> SendRequest<'a> {
    fn from_outbound(account: &'a BotAccount, message: &'a OutboundMessage) -> Self {
        Self {
            session_id: &account.session_id,
            kind: "text",
            to: &message.recipient,
            text: &message.text,
            reply_to: message.reply_to.as_ref().map(MessageId::as_str),
            participant: message.participant.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    data: Option<SendResponseData>,
}

#[derive(Debug, Deserialize)]
struct SendResponseData {
    key: Option<MessageKey>,
}

#[derive(Debug, Deserialize)]
struct MessageKey {
    id: Option<String>,
}

impl SendResponse {
    fn message_id(self) -> Result<MessageId, MessagingError> {
        self.data
            .and_then(|d| d.key)
            .and_then(|k| k.id)
            .and_then(|raw| MessageId::new(raw).ok())
            .ok_or(MessagingError::MissingMessageId)
    }
}
