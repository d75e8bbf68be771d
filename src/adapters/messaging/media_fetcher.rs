//! Media download adapter.
//!
//! Gateways hand out media URLs built against their own `localhost:3000`
//! listener; those are rewritten to the account's public base URL before
//! download.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::AccountId;
use crate::ports::{BotAccountRepository, ImageAttachment, MediaFetcher, MessagingError};

use super::http_client;

const GATEWAY_LOCAL_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Downloads media with the owning account's credentials.
pub struct HttpMediaFetcher {
    accounts: Arc<dyn BotAccountRepository>,
    client: Client,
}

impl HttpMediaFetcher {
    pub fn new(
        accounts: Arc<dyn BotAccountRepository>,
        timeout: Duration,
    ) -> Result<Self, MessagingError> {
        Ok(Self {
            accounts,
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch_image(
        &self,
        account_id: &AccountId,
        media_url: &str,
    ) -> Result<ImageAttachment, MessagingError> {
        let account = self
            .accounts
            .find_by_account_id(account_id)
            .await
            .map_err(|e| MessagingError::Lookup(e.to_string()))?
            .ok_or_else(|| MessagingError::UnknownAccount(account_id.clone()))?;

        let url = rewrite_local_origin(media_url, &account.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", account.api_key())
            .send()
            .await
            .map_err(|e| MessagingError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MessagingError::Rejected {
                status: status.as_u16(),
                body: format!("media download failed for {}", url),
            });
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(image_mime)
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MessagingError::Network(e.to_string()))?;

        Ok(ImageAttachment::new(mime_type, STANDARD.encode(&bytes)))
    }
}

fn rewrite_local_origin(media_url: &str, base_url: &str) -> String {
    match media_url.strip_prefix(GATEWAY_LOCAL_ORIGIN) {
        Some(rest) => format!("{}{}", base_url, rest),
        None => media_url.to_string(),
    }
}

/// Keeps image content types, drops parameters, and defaults the rest.
fn image_mime(content_type: &str) -> &str {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.starts_with("image/") {
        essence
    } else {
        DEFAULT_IMAGE_MIME
    }
}
