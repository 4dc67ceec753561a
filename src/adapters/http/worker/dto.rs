//! HTTP DTOs for the worker endpoints.

use serde::{Deserialize, Serialize};

use crate::application::CreateBankTicketCommand;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request body of `POST /api/worker/v1/ticket`.
///
/// Fields default to empty so a missing key reaches command validation and
/// comes back as a 400 with the field name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankTicketRequest {
    #[serde(default)]
    pub ticket_id: String,
    #[serde(default)]
    pub event_id: String,
}

impl From<CreateBankTicketRequest> for CreateBankTicketCommand {
    fn from(req: CreateBankTicketRequest) -> Self {
        CreateBankTicketCommand {
            ticket_id: req.ticket_id,
            event_id: req.event_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankTicketResponse {
    pub message: String,
    /// Seats inserted by this request; zero when the partition was full.
    pub created: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error body returned by every worker endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
