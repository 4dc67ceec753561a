//! HTTP adapter for the worker's manual trigger endpoints.
//!
//! - `POST /api/worker/v1/ticket` - Open the seats of a ticket detail
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CreateBankTicketRequest, CreateBankTicketResponse, ErrorResponse};
pub use handlers::{WorkerApiError, WorkerAppState};
pub use routes::{worker_router, worker_routes};
