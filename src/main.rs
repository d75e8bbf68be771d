//! PannyPal server.
//!
//! Loads configuration, wires adapters into the drafting core, and serves the
//! cashflow API and chat webhooks.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pannypal::adapters::ai::{GeminiConfig, GeminiProvider};
use pannypal::adapters::http::{api_router, CashflowAppState, WebhookAppState, WebhookVerifier};
use pannypal::adapters::messaging::{BaileysSender, HttpMediaFetcher, RoutingGateway, WahaSender};
use pannypal::adapters::postgres::{
    PostgresBotAccountRepository, PostgresCategoryRepository, PostgresDraftStore,
    PostgresPromptLog, PostgresTransactionRepository, PostgresUserRepository,
};
use pannypal::adapters::storage::{
    InMemoryBotAccountRepository, InMemoryCategoryRepository, InMemoryDraftStore, InMemoryLedger,
    InMemoryPromptLog, InMemoryUserRepository,
};
use pannypal::application::{
    CategoryResolver, CommitPipeline, ConversationRouter, InputTransactionHandler,
    ReconciliationEngine,
};
use pannypal::config::{AppConfig, DatabaseConfig, ServerConfig};
use pannypal::ports::{
    BotAccountRepository, CategoryRepository, DraftStore, PromptLog, TransactionRepository,
    UserRepository,
};

/// Persistence ports, backed by Postgres or by memory.
struct Stores {
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
    transactions: Arc<dyn TransactionRepository>,
    drafts: Arc<dyn DraftStore>,
    prompt_log: Arc<dyn PromptLog>,
    bot_accounts: Arc<dyn BotAccountRepository>,
}

impl Stores {
    fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            categories: Arc::new(PostgresCategoryRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
            drafts: Arc::new(PostgresDraftStore::new(pool.clone())),
            prompt_log: Arc::new(PostgresPromptLog::new(pool.clone())),
            bot_accounts: Arc::new(PostgresBotAccountRepository::new(pool)),
        }
    }

    fn in_memory() -> Self {
        Self {
            categories: Arc::new(InMemoryCategoryRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            transactions: Arc::new(InMemoryLedger::new()),
            drafts: Arc::new(InMemoryDraftStore::new()),
            prompt_log: Arc::new(InMemoryPromptLog::new()),
            bot_accounts: Arc::new(InMemoryBotAccountRepository::new()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);
    config.validate().context("Invalid configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting PannyPal"
    );

    let stores = build_stores(&config.database).await?;

    let api_key = config
        .ai
        .gemini_api_key
        .clone()
        .context("Gemini API key is not configured")?;
    let provider = GeminiProvider::new(
        GeminiConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )
    .context("Failed to create Gemini provider")?;

    let gateway_timeout = config.bot.gateway_timeout();
    let gateway = RoutingGateway::new(
        stores.bot_accounts.clone(),
        Arc::new(WahaSender::new(gateway_timeout)?),
        Arc::new(BaileysSender::new(gateway_timeout)?),
    );
    let media = HttpMediaFetcher::new(stores.bot_accounts.clone(), gateway_timeout)?;

    let engine = Arc::new(ReconciliationEngine::new(
        Arc::new(provider),
        stores.categories.clone(),
        stores.prompt_log.clone(),
    ));
    let resolver = Arc::new(CategoryResolver::new(
        stores.categories.clone(),
        &config.bot.default_category_name,
    ));
    let commit = Arc::new(CommitPipeline::new(
        stores.users.clone(),
        resolver,
        stores.transactions.clone(),
    ));
    let router = Arc::new(ConversationRouter::new(
        engine.clone(),
        commit.clone(),
        stores.drafts.clone(),
        Arc::new(gateway),
        Arc::new(media),
        &config.bot.trigger_tag,
    ));
    let input_handler = Arc::new(InputTransactionHandler::new(engine, commit));

    let verifier = config.bot.webhook_hmac_key.as_deref().map(WebhookVerifier::new);
    if verifier.is_none() {
        warn!("No webhook key configured; webhook signatures are not checked");
    }

    let app = api_router(
        CashflowAppState::new(router.clone(), input_handler),
        WebhookAppState::new(router, verifier),
    )
    .layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_secs,
    )))
    .layer(cors_layer(&config.server))
    .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "PannyPal listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("PannyPal stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_stores(database: &DatabaseConfig) -> Result<Stores> {
    if !database.is_configured() {
        warn!("No database URL configured; using in-memory stores");
        return Ok(Stores::in_memory());
    }

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await
        .context("Failed to connect to database")?;
    info!(max_connections = database.max_connections, "Connected to database");

    if database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Database migrations applied");
    }

    Ok(Stores::postgres(pool))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
