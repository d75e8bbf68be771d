//! Outbound Messaging Gateway port.
//!
//! Sends text through a bot account and reports the id the chat platform gave
//! the delivered message. That id becomes the correlation id of any draft the
//! message presents, so an adapter must never report success without it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::drafting::DraftingError;
use crate::domain::foundation::{AccountId, MessageId};
use crate::domain::messaging::{BotAccount, OutboundMessage};

/// Receipt for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    pub message_id: MessageId,
}

/// Gateway failures.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("no bot account registered for {0}")]
    UnknownAccount(AccountId),

    #[error("gateway rejected message: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("gateway response carried no message id")]
    MissingMessageId,

    #[error("network error: {0}")]
    Network(String),

    #[error("account lookup failed: {0}")]
    Lookup(String),
}

/// Port for sending chat messages.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveredMessage, MessagingError>;
}

/// One gateway flavour bound to an already-resolved account.
///
/// The routing gateway looks the account up and hands it to the sender for
/// that account's bot type.
#[async_trait]
pub trait AccountSender: Send + Sync {
    async fn send_via(
        &self,
        account: &BotAccount,
        message: &OutboundMessage,
    ) -> Result<DeliveredMessage, MessagingError>;
}

impl From<MessagingError> for DraftingError {
    fn from(err: MessagingError) -> Self {
        DraftingError::messaging(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messaging_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn MessagingGateway) {}
        fn _accepts_sender(_sender: &dyn AccountSender) {}
    }

    #[test]
    fn messaging_error_converts() {
        let err: DraftingError = MessagingError::MissingMessageId.into();
        assert!(matches!(err, DraftingError::Messaging(_)));
    }
}
