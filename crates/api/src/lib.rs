//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the subsidiary ledger report
//! - Error to response mapping

pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sea_orm::DatabaseConnection;
use subledger_core::subledger::SubledgerSource;
use subledger_db::SubledgerRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger store the report reads from.
    pub source: Arc<dyn SubledgerSource>,
    /// Deadline for a single report request.
    pub report_timeout: Duration,
}

impl AppState {
    /// Creates state over any ledger store.
    #[must_use]
    pub fn new(source: Arc<dyn SubledgerSource>, report_timeout: Duration) -> Self {
        Self {
            source,
            report_timeout,
        }
    }

    /// Creates state backed by the ledger database.
    #[must_use]
    pub fn from_database(db: DatabaseConnection, report_timeout: Duration) -> Self {
        Self::new(Arc::new(SubledgerRepository::new(db)), report_timeout)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
