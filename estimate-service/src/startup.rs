//! Application startup and lifecycle management.

use crate::config::EstimateConfig;
use crate::handlers;
use crate::pricing::EstimateEngine;
use crate::services::{
    EmailProvider, EstimateDb, KakaoMemoProvider, MemoProvider, MockEmailProvider,
    MockMemoProvider, Notifier, OpenAiAdjustmentProvider, SmtpProvider,
};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: EstimateConfig,
    pub db: EstimateDb,
    pub engine: Arc<EstimateEngine>,
    pub notifier: Arc<Notifier>,
    pub memo: Arc<dyn MemoProvider>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: EstimateConfig) -> Result<Self, AppError> {
        let db = EstimateDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        // The adjustment provider handles its own disabled state: without a
        // key every call answers with a zero adjustment and a diagnostic
        // comment, so pricing keeps working.
        let engine = Arc::new(EstimateEngine::new(Arc::new(
            OpenAiAdjustmentProvider::new(config.ai.clone()),
        )));
        if config.ai.enabled() {
            tracing::info!(model = %config.ai.model, "AI adjustment provider initialized");
        } else {
            tracing::info!("AI adjustment disabled, quotes use the rule fee only");
        }

        let email_provider: Arc<dyn EmailProvider> = if config.smtp.enabled {
            match SmtpProvider::new(config.smtp.clone()) {
                Ok(provider) => {
                    tracing::info!("SMTP email provider initialized");
                    Arc::new(provider)
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize SMTP provider: {}. Using mock.", e);
                    Arc::new(MockEmailProvider::new(true))
                }
            }
        } else {
            tracing::info!("SMTP provider disabled, using mock email provider");
            Arc::new(MockEmailProvider::new(true))
        };

        let memo_provider: Arc<dyn MemoProvider> = if config.memo.enabled() {
            tracing::info!("Chat memo provider initialized");
            Arc::new(KakaoMemoProvider::new(config.memo.clone()))
        } else {
            tracing::info!("Chat memo provider disabled, using mock memo provider");
            Arc::new(MockMemoProvider::new(true))
        };

        let notifier = Arc::new(Notifier::new(
            email_provider,
            memo_provider.clone(),
            config.notify.email_recipients.clone(),
        ));

        let state = AppState {
            config: config.clone(),
            db,
            engine,
            notifier,
            memo: memo_provider,
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Estimate service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &EstimateDb {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let cors = cors_layer(&self.state.config.cors.allowed_origins);

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/api/estimate", post(handlers::submit_estimate))
            .route("/api/estimate/recent", get(handlers::recent_estimates))
            .route("/admin/link", get(handlers::start_link))
            .route("/admin/link/callback", get(handlers::finish_link))
            .layer(cors)
            .with_state(self.state);

        axum::serve(self.listener, router).await
    }
}

/// Browser origins for the public quote form. No configured origins means
/// any origin, matching the historical deployment.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
