//! Media download port.

use async_trait::async_trait;

use crate::domain::foundation::AccountId;
use crate::ports::{ImageAttachment, MessagingError};

/// Port for downloading media attached to inbound messages.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Downloads `media_url` using the account's gateway credentials and
    /// returns it ready to attach to an extraction request.
    async fn fetch_image(
        &self,
        account_id: &AccountId,
        media_url: &str,
    ) -> Result<ImageAttachment, MessagingError>;
}
