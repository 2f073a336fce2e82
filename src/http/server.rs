use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use std::path::Path;
use std::sync::Arc;

use crate::application::CashbookService;
use crate::config::ServerConfig;

use super::{entries, summary};

#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<CashbookService>,
}

impl ServerState {
    pub fn new(service: CashbookService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// API routes are reachable both at the root and under `/api`.
/// With a static directory, every other path falls through to the bundled front-end.
pub fn router(state: ServerState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/entries", post(entries::create).get(entries::list))
        .route("/summary", get(summary::get))
        .route("/health", get(health));

    let mut app = Router::new().merge(api.clone()).nest("/api", api);

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(service: CashbookService, config: &ServerConfig) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    run_with_listener(service, config, listener).await
}

pub async fn run_with_listener(
    service: CashbookService,
    config: &ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from {}", dir.display());
    }

    let app = router(ServerState::new(service), config.static_dir.as_deref());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
