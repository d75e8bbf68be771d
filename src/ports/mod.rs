//! Ports - interfaces between the application core and the outside world.
//!
//! Every port is an `async_trait` that is `Send + Sync` so handlers can hold
//! them as `Arc<dyn Port>`.

mod bot_account_repository;
mod category_repository;
mod draft_store;
mod extraction_provider;
mod media_fetcher;
mod messaging_gateway;
mod prompt_log;
mod transaction_repository;
mod user_repository;

pub use bot_account_repository::BotAccountRepository;
pub use category_repository::CategoryRepository;
pub use draft_store::DraftStore;
pub use extraction_provider::{
    AIError, ExtractionProvider, ImageAttachment, StructuredCompletion, StructuredRequest,
};
pub use media_fetcher::MediaFetcher;
pub use messaging_gateway::{AccountSender, DeliveredMessage, MessagingError, MessagingGateway};
pub use prompt_log::{PromptLog, PromptLogEntry};
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;
