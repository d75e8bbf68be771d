//! HTTP handlers for the cashflow bot endpoints.
//!
//! These handlers connect Axum routes to the conversation router and the
//! direct-input handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use crate::application::{
    ConversationRouter, EntryPoint, InputTransactionCommand, InputTransactionHandler,
    RouterOutcome,
};
use crate::domain::drafting::DraftingError;
use crate::domain::foundation::{ErrorCode, PhoneNumber, ValidationError};

use super::super::response::ApiResponse;
use super::dto::{
    BotMessageRequest, BotOutcomeResponse, InputTransactionRequest, InputTransactionResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the cashflow endpoints.
#[derive(Clone)]
pub struct CashflowAppState {
    pub router: Arc<ConversationRouter>,
    pub input_handler: Arc<InputTransactionHandler>,
}

impl CashflowAppState {
    pub fn new(
        router: Arc<ConversationRouter>,
        input_handler: Arc<InputTransactionHandler>,
    ) -> Self {
        Self {
            router,
            input_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /ai-cashflow/transaction - Extract transactions from text.
///
/// Saves them to the ledger unless `save_as_draft` is set.
pub async fn create_transaction(
    State(state): State<CashflowAppState>,
    payload: Result<Json<InputTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CashflowApiError> {
    let Json(request) = payload?;
    let cmd = InputTransactionCommand {
        phone: PhoneNumber::new(request.phone_number).map_err(DraftingError::from)?,
        message: request.message,
        save_as_draft: request.save_as_draft,
    };

    let result = state.input_handler.handle(cmd).await?;
    let response = InputTransactionResponse::from(result);

    let (status, message) = if response.saved {
        (StatusCode::CREATED, "Transactions saved")
    } else {
        (StatusCode::OK, "Transactions extracted")
    };
    Ok(ApiResponse::with_status(status, message, response))
}

/// POST /ai-cashflow/bot - Handle a forwarded chat message.
///
/// Unlike chat webhooks, no trigger tag is required here.
pub async fn handle_bot_message(
    State(state): State<CashflowAppState>,
    payload: Result<Json<BotMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CashflowApiError> {
    let Json(request) = payload?;
    if let Some(bot) = request.type_bot {
        info!(bot_type = %bot, message_id = %request.message_id, "Bot message received");
    }
    let inbound = request.into_inbound().map_err(DraftingError::from)?;

    let outcome = state.router.route(inbound, EntryPoint::BotApi).await;
    outcome_response(outcome)
}

/// POST /ai-cashflow/bot/reply-action - Handle a reply to a draft.
///
/// The request must quote the draft it answers.
pub async fn handle_reply_action(
    State(state): State<CashflowAppState>,
    payload: Result<Json<BotMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CashflowApiError> {
    let Json(request) = payload?;
    let inbound = request.into_inbound().map_err(DraftingError::from)?;
    if !inbound.is_reply() {
        return Err(DraftingError::from(ValidationError::empty_field("quoted_message_id")).into());
    }

    let outcome = state.router.route(inbound, EntryPoint::BotApi).await;
    outcome_response(outcome)
}

fn outcome_response(
    outcome: RouterOutcome,
) -> Result<ApiResponse<BotOutcomeResponse>, CashflowApiError> {
    let body = BotOutcomeResponse::from_outcome(&outcome);
    match outcome {
        RouterOutcome::Failed(e) => Err(e.into()),
        RouterOutcome::DraftNotFound => Ok(ApiResponse {
            code: StatusCode::NOT_FOUND.as_u16(),
            message: "Draft not found".to_string(),
            data: Some(body),
            error: Some(ErrorCode::DraftNotFound.to_string()),
        }),
        RouterOutcome::Ignored(_) => Ok(ApiResponse::ok("Message ignored", body)),
        _ => Ok(ApiResponse::ok("Message handled", body)),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts drafting errors to HTTP responses.
#[derive(Debug)]
pub struct CashflowApiError(DraftingError);

impl From<DraftingError> for CashflowApiError {
    fn from(err: DraftingError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for CashflowApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DraftingError::ValidationFailed {
            field: "body".to_string(),
            message: rejection.body_text(),
        })
    }
}

impl CashflowApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DraftingError::ValidationFailed { .. }
            | DraftingError::InvalidAmount { .. }
            | DraftingError::NothingToCommit => StatusCode::BAD_REQUEST,
            DraftingError::NotFound(_) => StatusCode::NOT_FOUND,
            DraftingError::Conflict(_) => StatusCode::CONFLICT,
            DraftingError::Extraction(_)
            | DraftingError::Provider(_)
            | DraftingError::EditDroppedLines { .. }
            | DraftingError::Messaging(_) => StatusCode::BAD_GATEWAY,
            DraftingError::UserResolution(_)
            | DraftingError::CategoryResolution(_)
            | DraftingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CashflowApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Cashflow request failed");
        }
        ApiResponse::error(status, self.0.code().to_string(), self.0.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drafting::ExtractionError;
    use crate::domain::foundation::MessageId;

    fn status_of(err: DraftingError) -> StatusCode {
        CashflowApiError::from(err).into_response().status()
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        assert_eq!(
            status_of(DraftingError::ValidationFailed {
                field: "message".into(),
                message: "empty".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DraftingError::InvalidAmount { index: 0, amount: 0 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(DraftingError::NothingToCommit), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn draft_errors_map_to_not_found_and_conflict() {
        let id = MessageId::new("out-1").unwrap();
        assert_eq!(status_of(DraftingError::NotFound(id.clone())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DraftingError::Conflict(id)), StatusCode::CONFLICT);
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        assert_eq!(
            status_of(DraftingError::Extraction(ExtractionError::NoJsonObject)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(DraftingError::provider("quota")), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(DraftingError::messaging("down")), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn persistence_failures_are_internal() {
        assert_eq!(
            status_of(DraftingError::infrastructure("pool closed")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_outcome_is_404_with_code() {
        let response = outcome_response(RouterOutcome::DraftNotFound).unwrap();
        assert_eq!(response.code, 404);
        assert_eq!(response.error.as_deref(), Some("DRAFT_NOT_FOUND"));
    }

    #[test]
    fn failed_outcome_becomes_error() {
        let result = outcome_response(RouterOutcome::Failed(DraftingError::provider("x")));
        assert!(result.is_err());
    }
}
