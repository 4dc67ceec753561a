//! Consumer for seat allocation requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::{CreateBankTicketCommand, CreateBankTicketHandler};
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Payload of the create-bank-ticket topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankTicketMessage {
    pub ticket_id: String,
    pub event_id: String,
}

pub struct CreateBankTicketConsumer {
    handler: Arc<CreateBankTicketHandler>,
}

impl CreateBankTicketConsumer {
    pub fn new(handler: Arc<CreateBankTicketHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl EventHandler for CreateBankTicketConsumer {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let message: CreateBankTicketMessage = match event.payload_as() {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    topic = %event.event_type,
                    event_id = %event.event_id,
                    error = %e,
                    "dropping malformed create bank ticket message"
                );
                return Ok(());
            }
        };

        let command = CreateBankTicketCommand {
            ticket_id: message.ticket_id,
            event_id: message.event_id,
        };
        match self.handler.handle(command).await {
            Ok(result) => tracing::info!(
                event_id = %event.event_id,
                created = result.created(),
                "{}",
                result.message()
            ),
            Err(e) => tracing::error!(
                event_id = %event.event_id,
                error = %e,
                "create bank ticket failed"
            ),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "CreateBankTicketConsumer"
    }
}
