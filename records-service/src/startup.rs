//! Application startup and lifecycle management.

use crate::config::RecordsConfig;
use crate::handlers;
use crate::services::{ElasticsearchStore, SearchStore, Summarizer, T5Summarizer};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RecordsConfig,
    pub search: Arc<dyn SearchStore>,
    pub summarizer: Arc<dyn Summarizer>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    server: std::pin::Pin<Box<dyn std::future::Future<Output = std::io::Result<()>> + Send>>,
}

impl Application {
    /// Build the application against the real backends.
    ///
    /// Any startup failure (search backend unreachable, model load failure)
    /// propagates; the process exits rather than serving against a dead
    /// handle.
    pub async fn build(config: RecordsConfig) -> Result<Self, AppError> {
        let search: Arc<dyn SearchStore> = Arc::new(ElasticsearchStore::new(
            &config.search.url,
            &config.search.index,
        ));

        search.ping().await.map_err(|e| {
            tracing::error!("Failed to connect to Elasticsearch: {}", e);
            AppError::BadGateway(e.to_string())
        })?;
        tracing::info!(url = %config.search.url, "Connected to Elasticsearch");

        let summarizer_config = config.summarizer.clone();
        let summarizer = tokio::task::spawn_blocking(move || T5Summarizer::load(&summarizer_config))
            .await
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Model load task failed: {}", e))
            })?
            .map_err(|e| {
                tracing::error!("Failed to load summarizer model: {}", e);
                AppError::InternalError(anyhow::anyhow!(e))
            })?;
        let summarizer: Arc<dyn Summarizer> = Arc::new(summarizer);

        tracing::info!(model = %config.summarizer.model_id, "Initialized summarizer");

        if let Some(seed_file) = config.search.seed_file.clone() {
            let indexed = load_records(search.as_ref(), &seed_file).await?;
            tracing::info!(
                file = %seed_file,
                records = indexed,
                "Seeded patient records into the search index"
            );
        }

        Self::build_with(config, search, summarizer).await
    }

    /// Build the application with explicit backends (used by tests).
    pub async fn build_with(
        config: RecordsConfig,
        search: Arc<dyn SearchStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            search,
            summarizer,
        };

        let router = Router::new()
            .route("/", get(handlers::home))
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics))
            .route("/retrieve", post(handlers::retrieve))
            .route("/generate-summary", post(handlers::generate_summary))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Index a JSON array of patient records from a file.
pub async fn load_records(store: &dyn SearchStore, path: &str) -> Result<usize, AppError> {
    let data = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to read seed file {}: {}", path, e))
    })?;

    let records: Vec<serde_json::Value> = serde_json::from_str(&data).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Invalid seed file {}: {}", path, e))
    })?;

    let count = records.len();
    for record in records {
        store.index(record).await.map_err(|e| {
            AppError::InternalError(anyhow::anyhow!("Failed to index record: {}", e))
        })?;
    }
    store
        .refresh()
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to refresh index: {}", e)))?;

    Ok(count)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
