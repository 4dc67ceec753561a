//! Inventory operation errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors surfaced by the allocation, distribution, and sweep operations.
///
/// The variants follow the worker's error taxonomy; ingress adapters map
/// them to transport-level responses via [`InventoryError::status_code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// A referenced ticket detail, config, or ticket is absent.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with current inventory state.
    #[error("{0}")]
    BadRequest(String),

    /// Concurrent allocation kept colliding on the same seats.
    #[error("{0}")]
    Conflict(String),

    /// The store failed or returned something the worker cannot interpret.
    #[error("{0}")]
    InternalServerError(String),
}

impl InventoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        InventoryError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        InventoryError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        InventoryError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        InventoryError::InternalServerError(message.into())
    }

    /// HTTP status equivalent for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            InventoryError::NotFound(_) => 404,
            InventoryError::BadRequest(_) => 400,
            InventoryError::Conflict(_) => 409,
            InventoryError::InternalServerError(_) => 500,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            InventoryError::NotFound(_) => "NOT_FOUND",
            InventoryError::BadRequest(_) => "BAD_REQUEST",
            InventoryError::Conflict(_) => "CONFLICT",
            InventoryError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            InventoryError::NotFound(msg)
            | InventoryError::BadRequest(msg)
            | InventoryError::Conflict(msg)
            | InventoryError::InternalServerError(msg) => msg,
        }
    }
}

impl From<DomainError> for InventoryError {
    fn from(err: DomainError) -> Self {
        match err.code {
            code if code.is_not_found() => InventoryError::NotFound(err.message),
            ErrorCode::QuotaExceeded
            | ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => InventoryError::BadRequest(err.message),
            ErrorCode::SeatConflict => InventoryError::Conflict(err.message),
            _ => InventoryError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ValidationError> for InventoryError {
    fn from(err: ValidationError) -> Self {
        InventoryError::BadRequest(err.to_string())
    }
}
