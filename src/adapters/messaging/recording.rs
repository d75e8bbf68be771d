//! Recording messaging doubles for tests and local runs without a gateway.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{AccountId, MessageId};
use crate::domain::messaging::OutboundMessage;
use crate::ports::{
    DeliveredMessage, ImageAttachment, MediaFetcher, MessagingError, MessagingGateway,
};

/// Gateway that records every message and hands out ids `out-1`, `out-2`, ...
#[derive(Debug, Clone, Default)]
pub struct RecordingGateway {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    counter: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All messages sent so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Text of the most recent message.
    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.text.clone())
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send(&self, message: OutboundMessage) -> Result<DeliveredMessage, MessagingError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MessagingError::Network("gateway offline".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent.lock().unwrap().push(message);
        Ok(DeliveredMessage {
            message_id: MessageId::new(format!("out-{}", n))
                .map_err(|e| MessagingError::Network(e.to_string()))?,
        })
    }
}

/// Media fetcher that returns a fixed image for any URL.
#[derive(Debug, Clone)]
pub struct StubMediaFetcher {
    image: Option<ImageAttachment>,
}

impl StubMediaFetcher {
    pub fn returning(image: ImageAttachment) -> Self {
        Self { image: Some(image) }
    }

    /// A fetcher whose every download fails.
    pub fn unavailable() -> Self {
        Self { image: None }
    }
}

#[async_trait]
impl MediaFetcher for StubMediaFetcher {
    async fn fetch_image(
        &self,
        _account_id: &AccountId,
        media_url: &str,
    ) -> Result<ImageAttachment, MessagingError> {
        self.image.clone().ok_or_else(|| MessagingError::Rejected {
            status: 404,
            body: format!("no media at {}", media_url),
        })
    }
}
