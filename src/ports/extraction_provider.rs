//! Extraction Provider Port - Interface for the LLM that reads transactions.
//!
//! The provider is a black box with a declared output contract: callers pass
//! a prompt and a JSON schema and get back raw text that *should* satisfy the
//! schema. Nothing here trusts that it does; parsing and validation happen in
//! the domain layer.
//!
//! # Example
//!
//! ```ignore
//! let completion = provider
//!     .complete_structured(StructuredRequest::new(prompt, schema))
//!     .await?;
//! let lines = parse_lines(&completion.text)?;
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::drafting::DraftingError;

/// Port for LLM-backed extraction.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Free-form completion without an output contract.
    async fn complete_freeform(&self, prompt: &str) -> Result<String, AIError>;

    /// Completion constrained to `request.schema`, optionally over an image.
    async fn complete_structured(
        &self,
        request: StructuredRequest,
    ) -> Result<StructuredCompletion, AIError>;

    /// Schema-constrained completion over an attached image.
    async fn complete_structured_with_image(
        &self,
        prompt: &str,
        image: ImageAttachment,
        schema: Value,
    ) -> Result<StructuredCompletion, AIError> {
        self.complete_structured(StructuredRequest::new(prompt, schema).with_image(image))
            .await
    }

    /// Model identifier, for prompt logs.
    fn model_name(&self) -> String;
}

/// Image attached to a structured request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data_base64: String,
}

impl ImageAttachment {
    pub fn new(mime_type: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data_base64: data_base64.into(),
        }
    }
}

/// Request for a schema-constrained completion.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub prompt: String,
    pub schema: Value,
    pub image: Option<ImageAttachment>,
}

impl StructuredRequest {
    pub fn new(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            schema,
            image: None,
        }
    }

    /// Attaches an image to the request.
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Raw provider answer plus accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredCompletion {
    pub text: String,
    pub tokens_used: u32,
    pub elapsed_ms: u64,
    pub model: String,
}

/// Extraction provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was blocked by the provider's safety filters.
    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response envelope.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

impl From<AIError> for DraftingError {
    fn from(err: AIError) -> Self {
        DraftingError::provider(err.to_string())
    }
}
