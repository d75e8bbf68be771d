//! Drafting-specific errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, MessageId, ValidationError};

use super::extraction::ExtractionError;

/// Failures of the propose/confirm workflow.
///
/// Each variant maps to a distinct user-facing reply.
#[derive(Debug, Clone, Error)]
pub enum DraftingError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Extraction provider failed: {0}")]
    Provider(String),

    #[error("Edit result dropped lines: had {existing}, got {returned}")]
    EditDroppedLines { existing: usize, returned: usize },

    #[error("Draft has no transactions to commit")]
    NothingToCommit,

    #[error("Invalid amount {amount} at line {index}")]
    InvalidAmount { index: usize, amount: i64 },

    #[error("Validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Draft not found: {0}")]
    NotFound(MessageId),

    #[error("Draft {0} was changed by another reply")]
    Conflict(MessageId),

    #[error("User resolution failed: {0}")]
    UserResolution(String),

    #[error("Category resolution failed: {0}")]
    CategoryResolution(String),

    #[error("Messaging failed: {0}")]
    Messaging(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl DraftingError {
    pub fn provider(message: impl Into<String>) -> Self {
        DraftingError::Provider(message.into())
    }

    pub fn messaging(message: impl Into<String>) -> Self {
        DraftingError::Messaging(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        DraftingError::Infrastructure(message.into())
    }

    /// Machine-readable code for API envelopes.
    pub fn code(&self) -> ErrorCode {
        match self {
            DraftingError::Extraction(_) | DraftingError::Provider(_) => ErrorCode::AIProviderError,
            DraftingError::EditDroppedLines { .. } => ErrorCode::AIProviderError,
            DraftingError::NothingToCommit
            | DraftingError::InvalidAmount { .. }
            | DraftingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DraftingError::NotFound(_) => ErrorCode::DraftNotFound,
            DraftingError::Conflict(_) => ErrorCode::DraftConflict,
            DraftingError::UserResolution(_) => ErrorCode::UserNotFound,
            DraftingError::CategoryResolution(_) => ErrorCode::CategoryNotFound,
            DraftingError::Messaging(_) => ErrorCode::MessagingError,
            DraftingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for DraftingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                DraftingError::ValidationFailed {
                    field: err.details.get("field").cloned().unwrap_or_default(),
                    message: err.message,
                }
            }
            _ => DraftingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for DraftingError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        DraftingError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }
}
