//! Integration tests for the propose/confirm drafting flow.
//!
//! These tests drive the conversation router end to end over in-memory
//! adapters:
//! 1. Fresh requests produce a draft keyed by the summary's message id
//! 2. Save, cancel, and edit replies act on that draft exactly once
//! 3. Failures reply to the user and never lose the draft

use std::sync::Arc;

use async_trait::async_trait;
use pannypal::adapters::ai::MockExtractionProvider;
use pannypal::adapters::messaging::{RecordingGateway, StubMediaFetcher};
use pannypal::adapters::storage::{
    InMemoryCategoryRepository, InMemoryDraftStore, InMemoryLedger, InMemoryPromptLog,
    InMemoryUserRepository,
};
use pannypal::application::{
    CategoryResolver, CommitPipeline, ConversationRouter, EntryPoint, IgnoreReason,
    ReconciliationEngine, RouterOutcome,
};
use pannypal::domain::drafting::{replies, Draft, DraftingError, FeatureTag, CALL_TO_ACTION};
use pannypal::domain::foundation::{AccountId, DomainError, MessageId, PhoneNumber};
use pannypal::domain::ledger::{Category, TransactionKind};
use pannypal::domain::messaging::{InboundMessage, MessageContent};
use pannypal::ports::{DraftStore, ImageAttachment};

// =============================================================================
// Test Infrastructure
// =============================================================================

const KOPI: &str = r#"{"transactions":[{"kind":"EXPENSE","amount":15000,"category_id":1,"description":"beli kopi"}]}"#;

const KOPI_AND_PARKIR: &str = r#"{"transactions":[
    {"kind":"EXPENSE","amount":15000,"category_id":1,"description":"beli kopi"},
    {"kind":"EXPENSE","amount":5000,"category_id":2,"description":"parkir"}
]}"#;

const EMPTY: &str = r#"{"transactions":[]}"#;

struct Harness {
    router: ConversationRouter,
    provider: MockExtractionProvider,
    gateway: RecordingGateway,
    drafts: Arc<InMemoryDraftStore>,
    ledger: Arc<InMemoryLedger>,
}

impl Harness {
    fn new() -> Self {
        Self::build(InMemoryLedger::new(), StubMediaFetcher::unavailable())
    }

    fn build(ledger: InMemoryLedger, media: StubMediaFetcher) -> Self {
        Self::assemble(ledger, media, |drafts| drafts as Arc<dyn DraftStore>)
    }

    /// Builds a harness whose router sees `store(drafts)` instead of the
    /// in-memory store directly.
    fn assemble(
        ledger: InMemoryLedger,
        media: StubMediaFetcher,
        store: impl FnOnce(Arc<InMemoryDraftStore>) -> Arc<dyn DraftStore>,
    ) -> Self {
        let provider = MockExtractionProvider::new();
        let gateway = RecordingGateway::new();
        let drafts = Arc::new(InMemoryDraftStore::new());
        let ledger = Arc::new(ledger);
        let categories = Arc::new(InMemoryCategoryRepository::with_categories(vec![
            Category::new(1, "Makanan"),
            Category::new(2, "Transportasi"),
        ]));

        let engine = Arc::new(ReconciliationEngine::new(
            Arc::new(provider.clone()),
            categories.clone(),
            Arc::new(InMemoryPromptLog::new()),
        ));
        let commit = Arc::new(CommitPipeline::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(CategoryResolver::new(categories, "Lainnya")),
            ledger.clone(),
        ));
        let router = ConversationRouter::new(
            engine,
            commit,
            store(drafts.clone()),
            Arc::new(gateway.clone()),
            Arc::new(media),
            "#keuangan",
        );

        Self {
            router,
            provider,
            gateway,
            drafts,
            ledger,
        }
    }

    async fn chat(&self, id: &str, text: &str) -> RouterOutcome {
        self.router
            .route(message(id, text), EntryPoint::ChatWebhook)
            .await
    }

    async fn reply(&self, id: &str, quoted: &str, text: &str) -> RouterOutcome {
        self.router
            .route(
                message(id, text).quoting(MessageId::new(quoted).unwrap()),
                EntryPoint::ChatWebhook,
            )
            .await
    }

    async fn draft(&self, id: &str) -> Option<Draft> {
        self.drafts.get(&MessageId::new(id).unwrap()).await.unwrap()
    }

    fn last_text(&self) -> String {
        self.gateway.last_text().unwrap_or_default()
    }
}

/// Draft store that refuses to store one correlation id.
struct RejectingDraftStore {
    inner: Arc<InMemoryDraftStore>,
    rejected: MessageId,
}

#[async_trait]
impl DraftStore for RejectingDraftStore {
    async fn put(&self, draft: &Draft) -> Result<u64, DomainError> {
        if draft.correlation_id == self.rejected {
            return Err(DomainError::database("draft store unavailable"));
        }
        self.inner.put(draft).await
    }

    async fn get(&self, correlation_id: &MessageId) -> Result<Option<Draft>, DomainError> {
        self.inner.get(correlation_id).await
    }

    async fn take(
        &self,
        correlation_id: &MessageId,
        expected_version: u64,
    ) -> Result<Option<Draft>, DomainError> {
        self.inner.take(correlation_id, expected_version).await
    }

    async fn delete(&self, correlation_id: &MessageId) -> Result<(), DomainError> {
        self.inner.delete(correlation_id).await
    }
}

fn message(id: &str, text: &str) -> InboundMessage {
    InboundMessage::text(
        AccountId::new("628000").unwrap(),
        "628123@c.us",
        PhoneNumber::new("628123").unwrap(),
        MessageId::new(id).unwrap(),
        text,
    )
}

// =============================================================================
// Fresh Requests
// =============================================================================

#[tokio::test]
async fn fresh_request_sends_summary_and_stores_draft() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);

    let outcome = h.chat("in-1", "beli kopi 15000 #keuangan").await;

    let draft_id = match outcome {
        RouterOutcome::Proposed { draft_id, lines } => {
            assert_eq!(lines.len(), 1);
            draft_id
        }
        other => panic!("expected proposal, got {:?}", other),
    };
    assert_eq!(draft_id.as_str(), "out-1");

    let summary = h.last_text();
    assert!(summary.contains("Rp. 15.000"));
    assert!(summary.contains("Makanan"));
    assert!(summary.contains(CALL_TO_ACTION));

    let sent = h.gateway.sent();
    assert_eq!(sent[0].reply_to.as_ref().unwrap().as_str(), "in-1");

    let draft = h.draft("out-1").await.unwrap();
    assert_eq!(draft.lines[0].amount, 15000);
    assert_eq!(draft.rendered_summary, summary);
}

#[tokio::test]
async fn trigger_tag_is_removed_before_extraction() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);

    h.chat("in-1", "#KEUANGAN beli kopi 15000").await;

    let calls = h.provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("beli kopi 15000"));
    assert!(!calls[0].prompt.to_lowercase().contains("#keuangan"));
}

#[tokio::test]
async fn untagged_chat_message_is_ignored() {
    let h = Harness::new();

    let outcome = h.chat("in-1", "beli kopi 15000").await;

    assert!(matches!(
        outcome,
        RouterOutcome::Ignored(IgnoreReason::MissingTriggerTag)
    ));
    assert_eq!(h.provider.call_count(), 0);
    assert!(h.gateway.sent().is_empty());
}

#[tokio::test]
async fn bot_api_does_not_need_trigger_tag() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);

    let outcome = h
        .router
        .route(message("in-1", "beli kopi 15000"), EntryPoint::BotApi)
        .await;

    assert!(matches!(outcome, RouterOutcome::Proposed { .. }));
}

#[tokio::test]
async fn provider_failure_apologises_without_draft() {
    let h = Harness::new();
    h.provider.enqueue("the model rambled with no json");

    let outcome = h.chat("in-1", "beli kopi #keuangan").await;

    assert!(matches!(
        outcome,
        RouterOutcome::Failed(DraftingError::Extraction(_))
    ));
    assert_eq!(h.last_text(), replies::PROCESSING_FAILED);
    assert!(h.drafts.is_empty().await);
}

#[tokio::test]
async fn receipt_image_is_sent_to_provider() {
    let h = Harness::build(
        InMemoryLedger::new(),
        StubMediaFetcher::returning(ImageAttachment::new("image/jpeg", "AAAA")),
    );
    h.provider.enqueue(KOPI);

    let image = message("in-1", "").with_content(MessageContent::Image {
        caption: Some("#keuangan".to_string()),
        media_url: "http://localhost:3000/api/files/a.jpg".to_string(),
    });
    let outcome = h.router.route(image, EntryPoint::ChatWebhook).await;

    assert!(matches!(outcome, RouterOutcome::Proposed { .. }));
    let calls = h.provider.get_calls();
    assert_eq!(calls[0].image.as_ref().unwrap().data_base64, "AAAA");
}

#[tokio::test]
async fn unavailable_image_apologises() {
    let h = Harness::new();

    let image = message("in-1", "").with_content(MessageContent::Image {
        caption: Some("struk #keuangan".to_string()),
        media_url: "http://localhost:3000/api/files/missing.jpg".to_string(),
    });
    let outcome = h.router.route(image, EntryPoint::ChatWebhook).await;

    assert!(matches!(outcome, RouterOutcome::Failed(_)));
    assert_eq!(h.provider.call_count(), 0);
    assert_eq!(h.last_text(), replies::PROCESSING_FAILED);
}

// =============================================================================
// Replies
// =============================================================================

#[tokio::test]
async fn save_commits_lines_and_clears_draft() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;

    let outcome = h.reply("in-2", "out-1", "save").await;

    assert!(matches!(outcome, RouterOutcome::Saved { committed: 1 }));
    let ledger = h.ledger.all().await;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, 15000);
    assert_eq!(ledger[0].kind, TransactionKind::Expense);
    assert_eq!(ledger[0].category_id.value(), 1);
    assert!(h.draft("out-1").await.is_none());
    assert_eq!(h.last_text(), replies::SAVED);
}

#[tokio::test]
async fn indonesian_save_keyword_is_understood() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;

    let outcome = h.reply("in-2", "out-1", "Simpan ya").await;

    assert!(matches!(outcome, RouterOutcome::Saved { .. }));
}

#[tokio::test]
async fn cancel_discards_and_second_cancel_finds_nothing() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;

    let first = h.reply("in-2", "out-1", "cancel").await;
    assert!(matches!(first, RouterOutcome::Cancelled));
    assert_eq!(h.last_text(), replies::CANCELLED);

    let second = h.reply("in-3", "out-1", "cancel").await;
    assert!(matches!(second, RouterOutcome::DraftNotFound));
    assert_eq!(h.last_text(), replies::draft_not_found("#keuangan"));

    assert!(h.ledger.all().await.is_empty());
    assert!(h.drafts.is_empty().await);
}

#[tokio::test]
async fn edit_rekeys_draft_to_new_summary() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;
    h.provider.enqueue(KOPI_AND_PARKIR);

    let outcome = h.reply("in-2", "out-1", "edit tambah parkir 5000").await;

    match outcome {
        RouterOutcome::Revised { draft_id, lines } => {
            assert_eq!(draft_id.as_str(), "out-2");
            assert_eq!(lines.len(), 2);
        }
        other => panic!("expected revision, got {:?}", other),
    }
    assert!(h.draft("out-1").await.is_none());
    let revised = h.draft("out-2").await.unwrap();
    assert_eq!(revised.lines.len(), 2);
    assert!(h.last_text().contains("Transportasi"));

    let saved = h.reply("in-3", "out-2", "save").await;
    assert!(matches!(saved, RouterOutcome::Saved { committed: 2 }));
}

#[tokio::test]
async fn edit_keeps_every_original_line() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;
    let original = h.draft("out-1").await.unwrap().lines;
    h.provider.enqueue(KOPI_AND_PARKIR);

    let outcome = h.reply("in-2", "out-1", "edit, cuacanya cerah").await;

    let RouterOutcome::Revised { lines, .. } = outcome else {
        panic!("expected revision");
    };
    for line in &original {
        assert!(lines.contains(line));
    }
}

#[tokio::test]
async fn edit_that_drops_lines_keeps_original_draft() {
    let h = Harness::new();
    h.provider.enqueue(KOPI_AND_PARKIR);
    h.chat("in-1", "kopi 15000 parkir 5000 #keuangan").await;
    h.provider.enqueue(KOPI);

    let outcome = h.reply("in-2", "out-1", "edit hapus parkir").await;

    assert!(matches!(
        outcome,
        RouterOutcome::Failed(DraftingError::EditDroppedLines {
            existing: 2,
            returned: 1
        })
    ));
    assert_eq!(h.draft("out-1").await.unwrap().lines.len(), 2);
    assert_eq!(h.last_text(), replies::PROCESSING_FAILED);
}

#[tokio::test]
async fn unstored_revision_points_back_to_previous_summary() {
    let h = Harness::assemble(
        InMemoryLedger::new(),
        StubMediaFetcher::unavailable(),
        |drafts| {
            Arc::new(RejectingDraftStore {
                inner: drafts,
                rejected: MessageId::new("out-2").unwrap(),
            })
        },
    );
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;
    h.provider.enqueue(KOPI_AND_PARKIR);

    let outcome = h.reply("in-2", "out-1", "edit tambah parkir 5000").await;

    assert!(matches!(outcome, RouterOutcome::Failed(_)));
    assert_eq!(h.last_text(), replies::REVISION_NOT_STORED);
    assert!(h.draft("out-2").await.is_none());
    assert_eq!(h.draft("out-1").await.unwrap().lines.len(), 1);

    let saved = h.reply("in-3", "out-1", "save").await;
    assert!(matches!(saved, RouterOutcome::Saved { committed: 1 }));
}

#[tokio::test]
async fn unknown_reply_asks_for_clarification() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;
    let before = h.draft("out-1").await.unwrap();

    let outcome = h.reply("in-2", "out-1", "terima kasih").await;

    assert!(matches!(outcome, RouterOutcome::Clarified));
    assert_eq!(h.last_text(), replies::UNKNOWN_ACTION);
    assert_eq!(h.draft("out-1").await.unwrap(), before);
}

#[tokio::test]
async fn saving_empty_draft_keeps_it_for_editing() {
    let h = Harness::new();
    h.provider.enqueue(EMPTY);
    h.chat("in-1", "halo #keuangan").await;

    let outcome = h.reply("in-2", "out-1", "save").await;

    assert!(matches!(
        outcome,
        RouterOutcome::Failed(DraftingError::NothingToCommit)
    ));
    assert_eq!(h.last_text(), replies::NOTHING_TO_SAVE);
    assert!(h.draft("out-1").await.is_some());
}

#[tokio::test]
async fn failed_save_preserves_draft() {
    let h = Harness::build(InMemoryLedger::failing(), StubMediaFetcher::unavailable());
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;

    let outcome = h.reply("in-2", "out-1", "save").await;

    assert!(matches!(outcome, RouterOutcome::Failed(_)));
    assert_eq!(h.last_text(), replies::SAVE_FAILED);
    let draft = h.draft("out-1").await.unwrap();
    assert_eq!(draft.lines.len(), 1);
}

#[tokio::test]
async fn concurrent_saves_commit_once() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;

    let (a, b) = tokio::join!(
        h.reply("in-2", "out-1", "save"),
        h.reply("in-3", "out-1", "save")
    );

    let saved = [&a, &b]
        .iter()
        .filter(|o| matches!(o, RouterOutcome::Saved { .. }))
        .count();
    let missed = [&a, &b]
        .iter()
        .filter(|o| matches!(o, RouterOutcome::DraftNotFound))
        .count();
    assert_eq!((saved, missed), (1, 1));
    assert_eq!(h.ledger.all().await.len(), 1);
}

// =============================================================================
// Correlation
// =============================================================================

#[tokio::test]
async fn reply_to_foreign_feature_is_left_alone() {
    let h = Harness::new();
    let mut foreign = Draft::cashflow(MessageId::new("budget-1").unwrap(), "alert", vec![]);
    foreign.feature = FeatureTag::Other("BUDGET_ALERT".to_string());
    h.drafts.put(&foreign).await.unwrap();

    let outcome = h.reply("in-1", "budget-1", "save").await;

    assert!(matches!(
        outcome,
        RouterOutcome::Ignored(IgnoreReason::ForeignFeature(ref f)) if f == "BUDGET_ALERT"
    ));
    assert!(h.gateway.sent().is_empty());
    assert!(h.draft("budget-1").await.is_some());
}

#[tokio::test]
async fn stale_action_reply_reports_not_found() {
    let h = Harness::new();

    let outcome = h.reply("in-1", "gone-1", "save").await;

    assert!(matches!(outcome, RouterOutcome::DraftNotFound));
    assert!(h.last_text().contains("#keuangan"));
}

#[tokio::test]
async fn chatter_quoting_other_messages_is_ignored() {
    let h = Harness::new();

    let outcome = h.reply("in-1", "someone-else", "haha iya").await;

    assert!(matches!(
        outcome,
        RouterOutcome::Ignored(IgnoreReason::UncorrelatedReply)
    ));
    assert!(h.gateway.sent().is_empty());
}

#[tokio::test]
async fn tagged_quote_without_action_is_fresh_request() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);

    let outcome = h.reply("in-1", "someone-else", "beli kopi 15000 #keuangan").await;

    assert!(matches!(outcome, RouterOutcome::Proposed { .. }));
}

#[tokio::test]
async fn tagged_edit_of_processed_draft_reports_not_found() {
    let h = Harness::new();
    h.provider.enqueue(KOPI);
    h.chat("in-1", "beli kopi 15000 #keuangan").await;
    h.reply("in-2", "out-1", "save").await;

    let outcome = h
        .reply("in-3", "out-1", "#keuangan edit kopi jadi 20000")
        .await;

    assert!(matches!(outcome, RouterOutcome::DraftNotFound));
    assert_eq!(h.last_text(), replies::draft_not_found("#keuangan"));
    assert_eq!(h.provider.call_count(), 1);
    assert!(h.drafts.is_empty().await);
    assert_eq!(h.ledger.all().await.len(), 1);
}

#[tokio::test]
async fn tagged_save_quoting_unknown_message_reports_not_found() {
    let h = Harness::new();

    let outcome = h.reply("in-1", "someone-else", "#keuangan simpan").await;

    assert!(matches!(outcome, RouterOutcome::DraftNotFound));
    assert_eq!(h.provider.call_count(), 0);
}

#[tokio::test]
async fn bot_api_miss_always_reports_not_found() {
    let h = Harness::new();

    let outcome = h
        .router
        .route(
            message("in-1", "hmm").quoting(MessageId::new("gone-1").unwrap()),
            EntryPoint::BotApi,
        )
        .await;

    assert!(matches!(outcome, RouterOutcome::DraftNotFound));
}
