//! EventSubscriber port - routes topic messages to consumers.
//!
//! Consumers register on a topic name without knowing whether delivery
//! comes from the in-process bus or Redis pub/sub.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Processes messages from one or more topics.
///
/// A returned error is logged by the delivering adapter; the message is
/// not redelivered either way.
///
/// ```ignore
/// #[async_trait]
/// impl EventHandler for CreateBankTicketConsumer {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let message: CreateBankTicketMessage = event.payload_as()?;
///         // open the seats ...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "CreateBankTicketConsumer"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Name used in delivery logs.
    fn name(&self) -> &'static str;
}

/// Registers handlers on topics.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, topic: &str, handler: Arc<dyn EventHandler>);

    fn subscribe_all(&self, topics: &[&str], handler: Arc<dyn EventHandler>);
}
