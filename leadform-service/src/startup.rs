//! Application startup and lifecycle management.

use crate::config::LeadformConfig;
use crate::handlers;
use crate::services::providers::openai::{OpenAiChatProvider, OpenAiConfig};
use crate::services::providers::{ChatProvider, GenerationParams};
use crate::services::{
    ConversationEngine, LeadClassifier, LeadformDb, LocalStorage, PlainTextExtractor,
    SessionLocks, Storage, TextExtractor,
};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: LeadformConfig,
    pub db: LeadformDb,
    pub engine: Arc<ConversationEngine>,
    pub classifier: Arc<LeadClassifier>,
    pub session_locks: SessionLocks,
    pub storage: Arc<dyn Storage>,
    pub extractor: Arc<dyn TextExtractor>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration and the real
    /// OpenAI provider.
    pub async fn build(config: LeadformConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn ChatProvider> = Arc::new(OpenAiChatProvider::new(OpenAiConfig {
            api_key: config.openai.api_key.clone(),
            model: config.openai.model.clone(),
        }));
        tracing::info!(model = %config.openai.model, "Initialized OpenAI chat provider");

        Self::build_with_provider(config, provider).await
    }

    /// Build with an injected chat provider (test doubles go through here).
    pub async fn build_with_provider(
        config: LeadformConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        let db = LeadformDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let engine = Arc::new(ConversationEngine::new(
            provider.clone(),
            GenerationParams {
                temperature: config.tuning.chat_temperature,
                max_tokens: config.tuning.chat_max_tokens,
            },
        ));
        let classifier = Arc::new(LeadClassifier::new(
            provider,
            GenerationParams {
                temperature: config.tuning.analysis_temperature,
                max_tokens: config.tuning.analysis_max_tokens,
            },
        ));

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.local_path,
                        e
                    );
                    e
                })?,
        );
        let extractor: Arc<dyn TextExtractor> = Arc::new(PlainTextExtractor);

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
            engine,
            classifier,
            session_locks: SessionLocks::new(),
            storage,
            extractor,
        };

        let app = router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &LeadformDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Conversation-to-lead pipeline
        .route("/chat/:form_id", post(handlers::chat::send_message))
        .route("/chat/:form_id/submit", post(handlers::chat::submit_form))
        // Forms
        .route(
            "/forms",
            get(handlers::forms::list_forms).post(handlers::forms::create_form),
        )
        .route(
            "/forms/:form_id",
            get(handlers::forms::get_form)
                .put(handlers::forms::update_form)
                .delete(handlers::forms::delete_form),
        )
        .route(
            "/forms/:form_id/duplicate",
            post(handlers::forms::duplicate_form),
        )
        // Leads
        .route(
            "/leads",
            get(handlers::leads::list_leads).post(handlers::leads::create_lead),
        )
        .route("/leads/:lead_id", get(handlers::leads::get_lead))
        .route(
            "/leads/export/:form_id",
            get(handlers::leads::export_leads_csv),
        )
        // Analytics
        .route(
            "/analytics/forms/:form_id",
            get(handlers::analytics::get_form_analytics),
        )
        .route(
            "/analytics/dashboard",
            get(handlers::analytics::get_dashboard_stats),
        )
        .route("/analytics/track", post(handlers::analytics::track_event))
        // Documents
        .route("/documents/upload", post(handlers::documents::upload_document))
        .route(
            "/documents/:document_id",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        .route(
            "/documents/:document_id/parse",
            post(handlers::documents::reparse_document),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
