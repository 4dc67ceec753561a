//! Axum router configuration for the worker endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_bank_ticket, health, WorkerAppState};

/// Worker API routes, nested under `/api/worker/v1`.
///
/// Routes:
/// - `POST /ticket` - Open the seats of a ticket detail
pub fn worker_routes() -> Router<WorkerAppState> {
    Router::new().route("/ticket", post(create_bank_ticket))
}

/// Complete router for the worker service.
pub fn worker_router() -> Router<WorkerAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/worker/v1", worker_routes())
}
