//! Integration tests for the HTTP surface.
//!
//! These tests send requests through the complete axum router:
//! 1. Cashflow endpoints return the `{code, message, data, error}` envelope
//! 2. Webhooks check signatures and hand messages to the router
//! 3. Error statuses match the failure kind

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pannypal::adapters::ai::MockExtractionProvider;
use pannypal::adapters::http::{api_router, CashflowAppState, WebhookAppState, WebhookVerifier};
use pannypal::adapters::messaging::{RecordingGateway, StubMediaFetcher};
use pannypal::adapters::storage::{
    InMemoryCategoryRepository, InMemoryDraftStore, InMemoryLedger, InMemoryPromptLog,
    InMemoryUserRepository,
};
use pannypal::application::{
    CategoryResolver, CommitPipeline, ConversationRouter, InputTransactionHandler,
    ReconciliationEngine,
};
use pannypal::domain::ledger::Category;

// =============================================================================
// Test Infrastructure
// =============================================================================

const KOPI: &str = r#"{"transactions":[{"kind":"EXPENSE","amount":15000,"category_id":1,"description":"beli kopi"}]}"#;
const WEBHOOK_KEY: &str = "webhook-secret";

struct TestApp {
    app: Router,
    provider: MockExtractionProvider,
    gateway: RecordingGateway,
    drafts: Arc<InMemoryDraftStore>,
    ledger: Arc<InMemoryLedger>,
}

fn test_app(webhook_key: Option<&str>) -> TestApp {
    let provider = MockExtractionProvider::new();
    let gateway = RecordingGateway::new();
    let drafts = Arc::new(InMemoryDraftStore::new());
    let ledger = Arc::new(InMemoryLedger::new());
    let categories = Arc::new(InMemoryCategoryRepository::with_categories(vec![
        Category::new(1, "Makanan"),
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
    let router = Arc::new(ConversationRouter::new(
        engine.clone(),
        commit.clone(),
        drafts.clone(),
        Arc::new(gateway.clone()),
        Arc::new(StubMediaFetcher::unavailable()),
        "#keuangan",
    ));

    let app = api_router(
        CashflowAppState::new(
            router.clone(),
            Arc::new(InputTransactionHandler::new(engine, commit)),
        ),
        WebhookAppState::new(router, webhook_key.map(WebhookVerifier::new)),
    );

    TestApp {
        app,
        provider,
        gateway,
        drafts,
        ledger,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn signed(uri: &str, body: &Value, key: &str) -> Request<Body> {
    let raw = body.to_string();
    let signature = WebhookVerifier::new(key).sign(raw.as_bytes()).unwrap();
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("X-Webhook-Hmac", signature)
        .body(Body::from(raw))
        .unwrap()
}

fn bot_message(id: &str, text: &str, quoted: Option<&str>) -> Value {
    json!({
        "type_bot": "WAHA",
        "message": text,
        "type": "text",
        "message_id": id,
        "from": "628000",
        "to": "628123@c.us",
        "quoted_message_id": quoted
    })
}

fn waha_event(id: &str, text: &str) -> Value {
    json!({
        "event": "message",
        "session": "default",
        "payload": {
            "id": id,
            "from": "628123@c.us",
            "to": "628000@c.us",
            "body": text,
            "fromMe": false,
            "hasMedia": false
        }
    })
}

/// Waits for a spawned webhook task to leave a draft behind.
async fn wait_for_draft(drafts: &InMemoryDraftStore) -> bool {
    for _ in 0..50 {
        if !drafts.is_empty().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let t = test_app(None);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(&t.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// Direct Transaction Input
// =============================================================================

#[tokio::test]
async fn transaction_input_saves_by_default() {
    let t = test_app(None);
    t.provider.enqueue(KOPI);

    let (status, body) = send(
        &t.app,
        post_json(
            "/ai-cashflow/transaction",
            &json!({"phone_number": "628123", "message": "beli kopi 15000"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 201);
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["data"]["saved"], true);
    assert_eq!(body["data"]["req_payload"][0]["amount"], 15000);
    assert_eq!(body["data"]["transactions"][0]["type"], "EXPENSE");
    assert_eq!(t.ledger.all().await.len(), 1);
    assert_eq!(t.provider.freeform_call_count(), 1);
}

#[tokio::test]
async fn transaction_input_as_draft_does_not_save() {
    let t = test_app(None);
    t.provider.enqueue(KOPI);

    let (status, body) = send(
        &t.app,
        post_json(
            "/ai-cashflow/transaction",
            &json!({"phone_number": "628123", "message": "beli kopi 15000", "save_as_draft": true}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["saved"], false);
    assert!(body["data"]["summary"].as_str().unwrap().contains("Rp. 15.000"));
    assert!(t.ledger.all().await.is_empty());
}

#[tokio::test]
async fn malformed_body_gets_enveloped_bad_request() {
    let t = test_app(None);
    let request = Request::builder()
        .method("POST")
        .uri("/ai-cashflow/transaction")
        .header("content-type", "application/json")
        .body(Body::from("{\"phone_number\": "))
        .unwrap();

    let (status, body) = send(&t.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let t = test_app(None);

    let (status, _) = send(
        &t.app,
        post_json(
            "/ai-cashflow/transaction",
            &json!({"phone_number": "628123", "message": "   "}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.provider.freeform_call_count(), 0);
}

#[tokio::test]
async fn unparseable_model_output_is_bad_gateway() {
    let t = test_app(None);
    t.provider.enqueue("no json here");

    let (status, body) = send(
        &t.app,
        post_json(
            "/ai-cashflow/transaction",
            &json!({"phone_number": "628123", "message": "beli kopi"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "AI_PROVIDER_ERROR");
}

// =============================================================================
// Bot API
// =============================================================================

#[tokio::test]
async fn bot_message_proposes_then_reply_action_saves() {
    let t = test_app(None);
    t.provider.enqueue(KOPI);

    let (status, body) = send(
        &t.app,
        post_json("/ai-cashflow/bot", &bot_message("in-1", "beli kopi 15000", None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "proposed");
    assert_eq!(body["data"]["draft_id"], "out-1");

    let (status, body) = send(
        &t.app,
        post_json(
            "/ai-cashflow/bot/reply-action",
            &bot_message("in-2", "save", Some("out-1")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "saved");
    assert_eq!(body["data"]["committed"], 1);
    assert_eq!(t.ledger.all().await.len(), 1);
}

#[tokio::test]
async fn reply_action_requires_quoted_message() {
    let t = test_app(None);

    let (status, body) = send(
        &t.app,
        post_json(
            "/ai-cashflow/bot/reply-action",
            &bot_message("in-1", "save", None),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert!(t.gateway.sent().is_empty());
}

#[tokio::test]
async fn reply_action_on_missing_draft_is_not_found() {
    let t = test_app(None);

    let (status, body) = send(
        &t.app,
        post_json(
            "/ai-cashflow/bot/reply-action",
            &bot_message("in-1", "save", Some("gone-1")),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "DRAFT_NOT_FOUND");
    assert_eq!(body["data"]["outcome"], "draft_not_found");
    assert!(t.gateway.last_text().unwrap().contains("tidak ditemukan"));
}

// =============================================================================
// Webhooks
// =============================================================================

#[tokio::test]
async fn signed_waha_webhook_is_processed_in_background() {
    let t = test_app(Some(WEBHOOK_KEY));
    t.provider.enqueue(KOPI);

    let (status, body) = send(
        &t.app,
        signed(
            "/webhook/waha",
            &waha_event("in-1", "beli kopi 15000 #keuangan"),
            WEBHOOK_KEY,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], true);
    assert!(wait_for_draft(&t.drafts).await);
}

#[tokio::test]
async fn unsigned_webhook_is_rejected_when_key_configured() {
    let t = test_app(Some(WEBHOOK_KEY));

    let (status, body) = send(
        &t.app,
        post_json("/webhook/waha", &waha_event("in-1", "beli kopi #keuangan")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_SIGNATURE");
    assert_eq!(t.provider.call_count(), 0);
}

#[tokio::test]
async fn wrongly_signed_webhook_is_rejected() {
    let t = test_app(Some(WEBHOOK_KEY));

    let (status, _) = send(
        &t.app,
        signed(
            "/webhook/waha",
            &waha_event("in-1", "beli kopi #keuangan"),
            "another-key",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn baileys_webhook_accepts_unsigned_without_key() {
    let t = test_app(None);
    t.provider.enqueue(KOPI);

    let (status, body) = send(
        &t.app,
        post_json(
            "/webhook/baileys",
            &json!({
                "sessionId": "acc-1",
                "messageType": "conversation",
                "message": {"conversation": "makan 15000 #keuangan"},
                "key": {"remoteJid": "628123@s.whatsapp.net", "id": "B1", "fromMe": false}
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], true);
    assert!(wait_for_draft(&t.drafts).await);
    assert_eq!(t.gateway.sent()[0].account_id.as_str(), "acc-1");
}

#[tokio::test]
async fn non_message_events_are_skipped() {
    let t = test_app(None);

    let (status, body) = send(
        &t.app,
        post_json(
            "/webhook/waha",
            &json!({"event": "session.status", "session": "default", "payload": null}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], false);
}

#[tokio::test]
async fn invalid_webhook_json_is_bad_request() {
    let t = test_app(None);
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/baileys")
        .body(Body::from("not json"))
        .unwrap();

    let (status, body) = send(&t.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_PAYLOAD");
}
