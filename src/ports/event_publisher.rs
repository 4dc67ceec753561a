//! EventPublisher port - puts messages on a topic.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Publishes topic messages.
///
/// The worker itself only consumes; publishing exists so local runs and
/// tests can feed the consumers through the same topic names the
/// checkout and admin services use.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
