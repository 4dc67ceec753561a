//! HTTP handlers for the worker endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::{CreateBankTicketCommand, CreateBankTicketHandler};
use crate::domain::inventory::InventoryError;

use super::dto::{CreateBankTicketRequest, CreateBankTicketResponse, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the worker routes.
#[derive(Clone)]
pub struct WorkerAppState {
    pub create_bank_ticket: Arc<CreateBankTicketHandler>,
}

impl WorkerAppState {
    pub fn new(create_bank_ticket: Arc<CreateBankTicketHandler>) -> Self {
        Self { create_bank_ticket }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/worker/v1/ticket - Open the seats of a ticket detail
pub async fn create_bank_ticket(
    State(state): State<WorkerAppState>,
    body: Result<Json<CreateBankTicketRequest>, JsonRejection>,
) -> Result<impl IntoResponse, WorkerApiError> {
    let Json(request) = body.map_err(|rejection| {
        WorkerApiError(InventoryError::bad_request(rejection.body_text()))
    })?;
    let command = CreateBankTicketCommand::from(request);

    let result = state.create_bank_ticket.handle(command).await?;

    Ok(Json(CreateBankTicketResponse {
        message: result.message().to_string(),
        created: result.created(),
    }))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts inventory errors to HTTP responses.
#[derive(Debug)]
pub struct WorkerApiError(pub InventoryError);

impl From<InventoryError> for WorkerApiError {
    fn from(err: InventoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WorkerApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "worker request failed");
        }
        let body = ErrorResponse::new(self.0.code(), self.0.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryInventoryStore;
    use crate::domain::inventory::fixtures::ticket_detail;

    fn state(store: &Arc<InMemoryInventoryStore>) -> WorkerAppState {
        WorkerAppState::new(Arc::new(CreateBankTicketHandler::new(
            store.clone(),
            store.clone(),
            3,
        )))
    }

    fn request(ticket_id: &str, event_id: &str) -> Result<Json<CreateBankTicketRequest>, JsonRejection> {
        Ok(Json(CreateBankTicketRequest {
            ticket_id: ticket_id.to_string(),
            event_id: event_id.to_string(),
        }))
    }

    #[tokio::test]
    async fn create_bank_ticket_returns_ok_with_message() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.insert_ticket_detail(ticket_detail("t-1", 4, 4)).await;

        let response = create_bank_ticket(State(state(&store)), request("t-1", "evt-1"))
            .await
            .map(IntoResponse::into_response)
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.bank_ticket_count().await, 4);
    }

    #[tokio::test]
    async fn unknown_ticket_maps_to_not_found() {
        let store = Arc::new(InMemoryInventoryStore::new());

        let err = create_bank_ticket(State(state(&store)), request("missing", "evt-1"))
            .await
            .err()
            .unwrap();

        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_event_id_maps_to_bad_request() {
        let store = Arc::new(InMemoryInventoryStore::new());

        let err = create_bank_ticket(State(state(&store)), request("t-1", ""))
            .await
            .err()
            .unwrap();

        assert_eq!(err.0, InventoryError::bad_request("Field 'eventId' cannot be empty"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = WorkerApiError(InventoryError::conflict("seat allocation kept colliding"))
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
