//! Messaging adapters - chat gateway senders and media download.
//!
//! - `WahaSender`, `BaileysSender` - one per gateway flavour
//! - `RoutingGateway` - resolves the account and dispatches to its sender
//! - `HttpMediaFetcher` - downloads inbound images
//! - `RecordingGateway`, `StubMediaFetcher` - doubles for tests

mod baileys;
mod media_fetcher;
mod recording;
mod routing_gateway;
mod waha;

pub use baileys::BaileysSender;
pub use media_fetcher::HttpMediaFetcher;
pub use recording::{RecordingGateway, StubMediaFetcher};
pub use routing_gateway::RoutingGateway;
pub use waha::WahaSender;

use reqwest::Client;
use std::time::Duration;

use crate::ports::MessagingError;

fn http_client(timeout: Duration) -> Result<Client, MessagingError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MessagingError::Network(format!("Failed to create HTTP client: {}", e)))
}
