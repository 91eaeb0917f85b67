//! HTTP surface for roster.
//!
//! Thin axum routing onto [`Storage`] operations, mounted under the configured
//! base path, plus optional static file serving for the browser frontend.

mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::ErrorResponse;

use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    storage: Arc<Storage>,
}

impl AppState {
    /// Wrap `storage` for sharing across handlers.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// The shared store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

/// Routes relative to the base path.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route("/students/stats/summary", get(handlers::summary))
        .route(
            "/students/:id",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route("/health", get(handlers::health))
}

/// Build the full application router.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let api = api_routes();
    let app = match config.mount_path() {
        Some(path) => Router::new().nest(path, api),
        None => api,
    };

    let app = match &config.server.static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.fallback(handlers::route_not_found),
    };

    let app = app.with_state(state).layer(TraceLayer::new_for_http());
    if config.server.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Serve the API until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn serve(config: &Config, storage: Storage) -> Result<()> {
    let addr = config.bind_addr()?;
    let data_file = storage.path().display().to_string();
    let app = build_router(AppState::new(storage), config);

    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        base_path = %config.server.base_path,
        data_file = %data_file,
        "Roster server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Roster server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
