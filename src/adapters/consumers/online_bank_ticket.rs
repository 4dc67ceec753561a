//! Consumer for online quota distribution requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::{
    CreateOnlineBankTicketCommand, CreateOnlineBankTicketHandler, CreateOnlineBankTicketResult,
};
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Payload of the online bank ticket topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineBankTicketMessage {
    pub tag: String,
    #[serde(default)]
    pub country_code: String,
}

pub struct OnlineBankTicketConsumer {
    handler: Arc<CreateOnlineBankTicketHandler>,
}

impl OnlineBankTicketConsumer {
    pub fn new(handler: Arc<CreateOnlineBankTicketHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl EventHandler for OnlineBankTicketConsumer {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let message: OnlineBankTicketMessage = match event.payload_as() {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    topic = %event.event_type,
                    event_id = %event.event_id,
                    error = %e,
                    "dropping malformed online bank ticket message"
                );
                return Ok(());
            }
        };

        let command = CreateOnlineBankTicketCommand {
            tag: message.tag,
            country_code: message.country_code,
        };
        match self.handler.handle(command).await {
            Ok(result) => {
                let countries = match &result {
                    CreateOnlineBankTicketResult::Provisioned(countries) => countries.len(),
                    CreateOnlineBankTicketResult::NothingToProvision => 0,
                };
                tracing::info!(
                    event_id = %event.event_id,
                    countries = countries,
                    "{}",
                    result.message()
                );
            }
            Err(e) => tracing::error!(
                event_id = %event.event_id,
                error = %e,
                "online bank ticket distribution failed"
            ),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "OnlineBankTicketConsumer"
    }
}
