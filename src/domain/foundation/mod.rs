//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, message envelopes, and error types
//! that form the vocabulary of the ticket inventory domain.

mod errors;
mod events;
mod percentage;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{EventEnvelope, EventId};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
