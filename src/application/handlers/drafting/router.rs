//! ConversationRouter - entry point for every inbound chat event.
//!
//! ```text
//!   Idle ──fresh request──▶ DraftPending(id₁)
//!   DraftPending(id₁) ──edit──▶ DraftPending(id₂)     (id₁ removed)
//!   DraftPending(id) ──save ok / cancel──▶ Idle
//!   DraftPending(id) ──save failed / unknown──▶ DraftPending(id)
//! ```
//!
//! Every state-changing reply first claims the draft with a versioned `take`.
//! A reply that loses the claim to a concurrent one is answered as if the
//! draft were already gone. A claimed draft whose save or edit fails is put
//! back, so a failure never loses the user's proposal.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::drafting::{replies, Draft, DraftingError, ReplyAction};
use crate::domain::foundation::MessageId;
use crate::domain::ledger::TransactionLine;
use crate::domain::messaging::{InboundMessage, MessageContent, OutboundMessage};
use crate::ports::{DraftStore, MediaFetcher, MessagingGateway};

use super::commit::CommitPipeline;
use super::reconcile::{Proposal, ReconciliationEngine};

/// Why an event was deliberately left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Unquoted chat message without the trigger tag.
    MissingTriggerTag,
    /// Quoted draft belongs to another bot feature.
    ForeignFeature(String),
    /// Quoted message is not a draft and the reply names no action.
    UncorrelatedReply,
    /// Nothing left to extract from once the trigger tag is removed.
    EmptyMessage,
}

/// What the router did with an event.
#[derive(Debug, Clone)]
pub enum RouterOutcome {
    Ignored(IgnoreReason),
    Proposed {
        draft_id: MessageId,
        lines: Vec<TransactionLine>,
    },
    Revised {
        draft_id: MessageId,
        lines: Vec<TransactionLine>,
    },
    Saved {
        committed: usize,
    },
    Cancelled,
    Clarified,
    DraftNotFound,
    Failed(DraftingError),
}

impl RouterOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RouterOutcome::Ignored(_) => "ignored",
            RouterOutcome::Proposed { .. } => "proposed",
            RouterOutcome::Revised { .. } => "revised",
            RouterOutcome::Saved { .. } => "saved",
            RouterOutcome::Cancelled => "cancelled",
            RouterOutcome::Clarified => "clarified",
            RouterOutcome::DraftNotFound => "draft_not_found",
            RouterOutcome::Failed(_) => "failed",
        }
    }
}

/// Where an event came from; chat webhooks see all group chatter and need
/// the trigger tag, explicit bot API calls do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    ChatWebhook,
    BotApi,
}

/// Dispatches inbound messages between fresh requests and draft replies.
pub struct ConversationRouter {
    engine: Arc<ReconciliationEngine>,
    commit: Arc<CommitPipeline>,
    drafts: Arc<dyn DraftStore>,
    gateway: Arc<dyn MessagingGateway>,
    media: Arc<dyn MediaFetcher>,
    trigger_tag: String,
}

impl ConversationRouter {
    pub fn new(
        engine: Arc<ReconciliationEngine>,
        commit: Arc<CommitPipeline>,
        drafts: Arc<dyn DraftStore>,
        gateway: Arc<dyn MessagingGateway>,
        media: Arc<dyn MediaFetcher>,
        trigger_tag: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            commit,
            drafts,
            gateway,
            media,
            trigger_tag: trigger_tag.into(),
        }
    }

    /// Handles one inbound message end to end, replying to the user on every
    /// path except `Ignored`.
    pub async fn route(&self, message: InboundMessage, entry: EntryPoint) -> RouterOutcome {
        let outcome = match message.quoted_message_id.clone() {
            None => self.route_fresh(&message, entry).await,
            Some(quoted) => self.route_reply(&message, quoted, entry).await,
        };

        match &outcome {
            RouterOutcome::Failed(e) => warn!(
                message_id = %message.message_id,
                account_id = %message.account_id,
                error = %e,
                "Cashflow event failed"
            ),
            other => debug!(
                message_id = %message.message_id,
                outcome = other.label(),
                "Cashflow event handled"
            ),
        }
        outcome
    }

    // ════════════════════════════════════════════════════════════════════════
    // Fresh requests
    // ════════════════════════════════════════════════════════════════════════

    async fn route_fresh(&self, message: &InboundMessage, entry: EntryPoint) -> RouterOutcome {
        if entry == EntryPoint::ChatWebhook && !self.has_trigger_tag(message.body_text()) {
            return RouterOutcome::Ignored(IgnoreReason::MissingTriggerTag);
        }

        let proposal = match &message.content {
            MessageContent::Text { body } => {
                let text = self.strip_trigger_tag(body);
                if text.is_empty() {
                    return RouterOutcome::Ignored(IgnoreReason::EmptyMessage);
                }
                self.engine.propose_from_text(&text).await
            }
            MessageContent::Image { media_url, .. } => {
                match self.media.fetch_image(&message.account_id, media_url).await {
                    Ok(image) => self.engine.propose_from_image(image).await,
                    Err(e) => Err(DraftingError::from(e)),
                }
            }
        };

        let proposal = match proposal {
            Ok(p) => p,
            Err(e) => return self.fail(message, e, replies::PROCESSING_FAILED).await,
        };

        match self.present(message, &proposal).await {
            Ok(draft_id) => {
                info!(draft_id = %draft_id, lines = proposal.lines.len(), "Draft proposed");
                RouterOutcome::Proposed {
                    draft_id,
                    lines: proposal.lines,
                }
            }
            Err(e) => self.fail(message, e, replies::PROCESSING_FAILED).await,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Replies to drafts
    // ════════════════════════════════════════════════════════════════════════

    async fn route_reply(
        &self,
        message: &InboundMessage,
        quoted: MessageId,
        entry: EntryPoint,
    ) -> RouterOutcome {
        let draft = match self.drafts.get(&quoted).await {
            Ok(d) => d,
            Err(e) => {
                return self
                    .fail(message, e.into(), replies::PROCESSING_FAILED)
                    .await
            }
        };

        let action = ReplyAction::classify(message.body_text());

        let draft = match draft {
            Some(d) if d.is_cashflow() => d,
            Some(d) => {
                debug!(quoted = %quoted, feature = %d.feature, "Reply quotes another feature");
                return RouterOutcome::Ignored(IgnoreReason::ForeignFeature(
                    d.feature.as_str().to_string(),
                ));
            }
            None => return self.on_correlation_miss(message, action, entry).await,
        };

        info!(draft_id = %draft.correlation_id, action = %action, "Draft reply");

        match action {
            ReplyAction::Save => self.save(message, draft).await,
            ReplyAction::Cancel => self.cancel(message, draft).await,
            ReplyAction::Edit => self.edit(message, draft).await,
            ReplyAction::Unknown => {
                self.reply(message, replies::UNKNOWN_ACTION).await;
                RouterOutcome::Clarified
            }
        }
    }

    async fn on_correlation_miss(
        &self,
        message: &InboundMessage,
        action: ReplyAction,
        entry: EntryPoint,
    ) -> RouterOutcome {
        // An action keyword always targets a draft, tagged or not.
        if entry == EntryPoint::ChatWebhook && action == ReplyAction::Unknown {
            if self.has_trigger_tag(message.body_text()) {
                let mut fresh = message.clone();
                fresh.quoted_message_id = None;
                return self.route_fresh(&fresh, entry).await;
            }
            return RouterOutcome::Ignored(IgnoreReason::UncorrelatedReply);
        }

        info!(
            message_id = %message.message_id,
            action = %action,
            "Reply quotes no pending draft"
        );
        self.not_found(message).await
    }

    async fn save(&self, message: &InboundMessage, draft: Draft) -> RouterOutcome {
        let draft = match self.claim(message, &draft).await {
            Ok(Some(d)) => d,
            Ok(None) => return self.not_found(message).await,
            Err(e) => return self.fail(message, e, replies::SAVE_FAILED).await,
        };

        match self.commit.commit(&message.sender, &draft.lines).await {
            Ok(receipt) => {
                self.reply(message, replies::SAVED).await;
                RouterOutcome::Saved {
                    committed: receipt.committed(),
                }
            }
            Err(e) => {
                self.restore(&draft).await;
                let text = save_failure_reply(&e);
                self.fail(message, e, text).await
            }
        }
    }

    async fn cancel(&self, message: &InboundMessage, draft: Draft) -> RouterOutcome {
        match self.claim(message, &draft).await {
            Ok(Some(_)) => {
                self.reply(message, replies::CANCELLED).await;
                RouterOutcome::Cancelled
            }
            Ok(None) => self.not_found(message).await,
            Err(e) => self.fail(message, e, replies::CANCEL_FAILED).await,
        }
    }

    async fn edit(&self, message: &InboundMessage, draft: Draft) -> RouterOutcome {
        let draft = match self.claim(message, &draft).await {
            Ok(Some(d)) => d,
            Ok(None) => return self.not_found(message).await,
            Err(e) => return self.fail(message, e, replies::PROCESSING_FAILED).await,
        };

        let revised = match self
            .engine
            .reconcile_edit(&draft.lines, message.body_text())
            .await
        {
            Ok(p) => p,
            Err(e) => {
                self.restore(&draft).await;
                return self.fail(message, e, replies::PROCESSING_FAILED).await;
            }
        };

        let draft_id = match self.send_summary(message, &revised).await {
            Ok(id) => id,
            Err(e) => {
                self.restore(&draft).await;
                return self.fail(message, e, replies::PROCESSING_FAILED).await;
            }
        };

        // The new summary is already visible; point the user back to the old one.
        if let Err(e) = self.store_draft(&draft_id, &revised).await {
            warn!(
                previous = %draft.correlation_id,
                draft_id = %draft_id,
                error = %e,
                "Revised draft not stored"
            );
            self.restore(&draft).await;
            return self.fail(message, e, replies::REVISION_NOT_STORED).await;
        }

        info!(
            previous = %draft.correlation_id,
            draft_id = %draft_id,
            lines = revised.lines.len(),
            "Draft revised"
        );
        RouterOutcome::Revised {
            draft_id,
            lines: revised.lines,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════

    /// Sends the summary and stores the draft under the delivered message id.
    async fn present(
        &self,
        message: &InboundMessage,
        proposal: &Proposal,
    ) -> Result<MessageId, DraftingError> {
        let draft_id = self.send_summary(message, proposal).await?;
        self.store_draft(&draft_id, proposal).await?;
        Ok(draft_id)
    }

    async fn send_summary(
        &self,
        message: &InboundMessage,
        proposal: &Proposal,
    ) -> Result<MessageId, DraftingError> {
        let delivered = self
            .gateway
            .send(self.reply_to(message, &proposal.summary))
            .await?;
        Ok(delivered.message_id)
    }

    async fn store_draft(
        &self,
        draft_id: &MessageId,
        proposal: &Proposal,
    ) -> Result<(), DraftingError> {
        let draft = Draft::cashflow(
            draft_id.clone(),
            proposal.summary.clone(),
            proposal.lines.clone(),
        );
        self.drafts.put(&draft).await?;
        Ok(())
    }

    async fn claim(
        &self,
        message: &InboundMessage,
        draft: &Draft,
    ) -> Result<Option<Draft>, DraftingError> {
        let claimed = self
            .drafts
            .take(&draft.correlation_id, draft.version)
            .await?;
        if claimed.is_none() {
            info!(
                draft_id = %draft.correlation_id,
                message_id = %message.message_id,
                "Draft claimed by a concurrent reply"
            );
        }
        Ok(claimed)
    }

    async fn restore(&self, draft: &Draft) {
        if let Err(e) = self.drafts.put(draft).await {
            error!(draft_id = %draft.correlation_id, error = %e, "Failed to restore draft");
        }
    }

    async fn not_found(&self, message: &InboundMessage) -> RouterOutcome {
        self.reply(message, &replies::draft_not_found(&self.trigger_tag))
            .await;
        RouterOutcome::DraftNotFound
    }

    async fn fail(&self, message: &InboundMessage, err: DraftingError, text: &str) -> RouterOutcome {
        self.reply(message, text).await;
        RouterOutcome::Failed(err)
    }

    /// Best-effort reply; a failed send is logged and swallowed.
    async fn reply(&self, message: &InboundMessage, text: &str) {
        if let Err(e) = self.gateway.send(self.reply_to(message, text)).await {
            warn!(message_id = %message.message_id, error = %e, "Failed to send reply");
        }
    }

    fn reply_to(&self, message: &InboundMessage, text: &str) -> OutboundMessage {
        OutboundMessage::new(message.account_id.clone(), message.chat_id.clone(), text)
            .replying_to(message.message_id.clone())
            .with_participant(message.participant.clone())
    }

    fn has_trigger_tag(&self, text: &str) -> bool {
        self.trigger_tag.is_empty() || text.to_lowercase().contains(&self.trigger_tag.to_lowercase())
    }

    fn strip_trigger_tag(&self, text: &str) -> String {
        if self.trigger_tag.is_empty() {
            return text.trim().to_string();
        }
        let tag = self.trigger_tag.to_lowercase();
        let lowered = text.to_lowercase();
        // Offsets only carry over when lowercasing kept the byte layout.
        let stripped = lowered
            .find(&tag)
            .filter(|_| lowered.len() == text.len())
            .and_then(|pos| Some((text.get(..pos)?, text.get(pos + tag.len()..)?)));
        match stripped {
            Some((before, after)) => format!("{before}{after}").trim().to_string(),
            None => text.trim().to_string(),
        }
    }
}

fn save_failure_reply(err: &DraftingError) -> &'static str {
    match err {
        DraftingError::NothingToCommit => replies::NOTHING_TO_SAVE,
        DraftingError::InvalidAmount { .. } => replies::INVALID_AMOUNT,
        DraftingError::UserResolution(_) => replies::USER_FAILED,
        DraftingError::CategoryResolution(_) => replies::CATEGORY_FAILED,
        _ => replies::SAVE_FAILED,
    }
}
