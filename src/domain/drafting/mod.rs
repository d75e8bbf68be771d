//! Drafting module - the propose/confirm vocabulary.
//!
//! Pure pieces of the workflow: reply classification, drafts, provider output
//! parsing, prompts, and the summaries shown to users. Orchestration lives in
//! `application::handlers::drafting`.

mod action;
mod draft;
mod errors;
mod extraction;
mod prompt;
pub mod replies;
mod summary;

pub use action::ReplyAction;
pub use draft::{Draft, FeatureTag};
pub use errors::DraftingError;
pub use extraction::{clean_response, parse_lines, ExtractionError};
pub use prompt::{edit_prompt, image_prompt, text_prompt, transaction_schema, IMAGE_INSTRUCTION};
pub use summary::{render_summary, CALL_TO_ACTION, NO_TRANSACTIONS};
