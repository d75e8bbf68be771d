//! Routing gateway - resolves the bot account and picks its sender.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::messaging::{BotType, OutboundMessage};
use crate::ports::{
    AccountSender, BotAccountRepository, DeliveredMessage, MessagingError, MessagingGateway,
};

/// MessagingGateway that dispatches on the account's bot type.
pub struct RoutingGateway {
    accounts: Arc<dyn BotAccountRepository>,
    waha: Arc<dyn AccountSender>,
    baileys: Arc<dyn AccountSender>,
}

impl RoutingGateway {
    pub fn new(
        accounts: Arc<dyn BotAccountRepository>,
        waha: Arc<dyn AccountSender>,
        baileys: Arc<dyn AccountSender>,
    ) -> Self {
        Self {
            accounts,
            waha,
            baileys,
        }
    }
}

#[async_trait]
impl MessagingGateway for RoutingGateway {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveredMessage, MessagingError> {
        let account = self
            .accounts
            .find_by_account_id(&message.account_id)
            .await
            .map_err(|e| MessagingError::Lookup(e.to_string()))?
            .ok_or_else(|| MessagingError::UnknownAccount(message.account_id.clone()))?;

        let sender = match account.bot_type {
            BotType::Waha => &self.waha,
            BotType::Baileys => &self.baileys,
        };

        let delivered = sender.send_via(&account, &message).await?;
        debug!(
            account_id = %account.account_id,
            bot_type = account.bot_type.as_str(),
            message_id = %delivered.message_id,
            "Message delivered"
        );
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryBotAccountRepository;
    use crate::domain::foundation::{AccountId, MessageId};
    use crate::domain::messaging::BotAccount;
    use std::sync::Mutex;

    struct FakeSender {
        name: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl FakeSender {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AccountSender for FakeSender {
        async fn send_via(
            &self,
            account: &BotAccount,
            message: &OutboundMessage,
        ) -> Result<DeliveredMessage, MessagingError> {
            self.seen.lock().unwrap().push(message.text.clone());
            Ok(DeliveredMessage {
                message_id: MessageId::new(format!("{}-{}", self.name, account.session_id)).unwrap(),
            })
        }
    }

    fn gateway() -> (RoutingGateway, Arc<FakeSender>, Arc<FakeSender>) {
        let accounts = Arc::new(InMemoryBotAccountRepository::with_accounts(vec![
            BotAccount::new(AccountId::new("w").unwrap(), BotType::Waha, "http://w", "k", "s1"),
            BotAccount::new(AccountId::new("b").unwrap(), BotType::Baileys, "http://b", "k", "s2"),
        ]));
        let waha = FakeSender::new("waha");
        let baileys = FakeSender::new("baileys");
        (
            RoutingGateway::new(accounts, waha.clone(), baileys.clone()),
            waha,
            baileys,
        )
    }

    #[tokio::test]
    async fn dispatches_by_bot_type() {
        let (gateway, waha, baileys) = gateway();

        let a = gateway
            .send(OutboundMessage::new(AccountId::new("w").unwrap(), "c", "one"))
            .await
            .unwrap();
        let b = gateway
            .send(OutboundMessage::new(AccountId::new("b").unwrap(), "c", "two"))
            .await
            .unwrap();

        assert_eq!(a.message_id.as_str(), "waha-s1");
        assert_eq!(b.message_id.as_str(), "baileys-s2");
        assert_eq!(waha.seen.lock().unwrap().len(), 1);
        assert_eq!(baileys.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_account_is_rejected() {
        let (gateway, _, _) = gateway();
        let err = gateway
            .send(OutboundMessage::new(AccountId::new("zzz").unwrap(), "c", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, MessagingError::UnknownAccount(_)));
    }
}
