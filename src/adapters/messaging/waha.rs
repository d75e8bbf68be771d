//! WAHA (WhatsApp HTTP API) sender.
//!
//! `POST {base_url}/api/sendText` with the account key in `X-Api-Key`. The
//! platform message id comes back as `_data.id.id`; older builds only fill
//! the top-level `id.id`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::MessageId;
use crate::domain::messaging::{BotAccount, OutboundMessage};
use crate::ports::{AccountSender, DeliveredMessage, MessagingError};

use super::http_client;

/// Sends text through a WAHA instance.
pub struct WahaSender {
    client: Client,
}

impl WahaSender {
    pub fn new(timeout: Duration) -> Result<Self, MessagingError> {
        Ok(Self {
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl AccountSender for WahaSender {
    async fn send_via(
        &self,
        account: &BotAccount,
        message: &OutboundMessage,
    ) -> Result<DeliveredMessage, MessagingError> {
        let response = self
            .client
            .post(format!("{}/api/sendText", account.base_url))
            .header("X-Api-Key", account.api_key())
            .json(&SendTextRequest::from_outbound(account, message))
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

        let body: SendTextResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::Network(format!("Failed to parse response: {}", e)))?;

        body.message_id().map(|message_id| DeliveredMessage { message_id })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendTextRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    session: &'a str,
}

impl<'a> SendTextRequest<'a> {
    fn from_outbound(account: &'a BotAccount, message: &'a OutboundMessage) -> Self {
        Self {
            chat_id: &message.recipient,
            text: &message.text,
            reply_to: message.reply_to.as_ref().map(MessageId::as_str),
            session: &account.session_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SendTextResponse {
    #[serde(rename = "_data", default)]
    data: Option<ResponseData>,
    #[serde(default)]
    id: Option<ResponseId>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    id: Option<ResponseId>,
}

#[derive(Debug, Deserialize)]
struct ResponseId {
    id: Option<String>,
}

impl SendTextResponse {
    fn message_id(self) -> Result<MessageId, MessagingError> {
        self.data
            .and_then(|d| d.id)
            .and_then(|i| i.id)
            .or_else(|| self.id.and_then(|i| i.id))
            .and_then(|raw| MessageId::new(raw).ok())
            .ok_or(MessagingError::MissingMessageId)
    }
}
