// HTTP Server Wiring

use crate::{handlers, stream};
use axum::routing::{get, post};
use axum::Router;
use gridsim_core::application::{ClusterController, ShutdownToken};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Broadcast buffer; lagged subscribers skip ahead to the newest snapshot
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// HTTP server configuration
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ClusterController>,
    pub updates: broadcast::Sender<serde_json::Value>,
}

pub fn app_state(controller: Arc<ClusterController>) -> AppState {
    let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
    AppState {
        controller,
        updates,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/api/status", get(handlers::status))
        .route("/api/update-job-rate", post(handlers::update_job_rate))
        .route("/api/stream", get(stream::status_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind, start the push loop, and serve until shutdown.
pub async fn serve(
    config: HttpServerConfig,
    controller: Arc<ClusterController>,
    shutdown: ShutdownToken,
) -> std::io::Result<()> {
    let state = app_state(Arc::clone(&controller));
    tokio::spawn(stream::push_loop(
        controller,
        state.updates.clone(),
        shutdown.clone(),
    ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    let mut shutdown = shutdown;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
