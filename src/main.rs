mod clock;
mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
};

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clock::{Clock, SystemClock};
use config::Storage;
use handlers::{rest, rpc};
use repository::{MemoryRepository, NoteRepository, PgRepository};
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded note store config");

    // Repository creation and migration
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repo: Arc<dyn NoteRepository> = match cfg.storage {
        Storage::Postgres { dsn } => {
            let mut repo = PgRepository::new(&dsn, clock).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });

            repo.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });

            Arc::new(repo)
        }
        Storage::Memory => {
            tracing::warn!("Using in-memory storage, notes will not survive a restart");
            Arc::new(MemoryRepository::new(clock))
        }
    };

    // Service creation
    let service = Arc::new(NoteService::new(repo));

    let router = app(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.http_port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.http_port);
            panic!("failed to bind to port {}: {e}", cfg.http_port);
        });

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("REST/RPC server starting, listening on {}", addr);
    }

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }

    tracing::info!("Server stopped");
}

fn app(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", any(root))
        .nest("/rest", rest::router(service.clone()))
        .nest("/rpc", rpc::router(service))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}

async fn root() -> Response {
    (StatusCode::OK, "Hello world!").into_response()
}
