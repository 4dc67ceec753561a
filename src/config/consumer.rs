//! Topic consumer configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Topics the worker consumes
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumerConfig {
    /// Requests to open a ticket detail's seats
    #[serde(default = "default_create_bank_ticket_topic")]
    pub create_bank_ticket_topic: String,

    /// Requests to distribute a tag's online quota
    #[serde(default = "default_online_bank_ticket_topic")]
    pub online_bank_ticket_topic: String,

    /// Subscribe to the topics in this process
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ConsumerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.create_bank_ticket_topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic("create bank ticket"));
        }
        if self.online_bank_ticket_topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic("online bank ticket"));
        }
        Ok(())
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            create_bank_ticket_topic: default_create_bank_ticket_topic(),
            online_bank_ticket_topic: default_online_bank_ticket_topic(),
            enabled: default_enabled(),
        }
    }
}

fn default_create_bank_ticket_topic() -> String {
    "concert-create-bank-ticket".to_string()
}

fn default_online_bank_ticket_topic() -> String {
    "concert-update-online-bank-ticket".to_string()
}

fn default_enabled() -> bool {
    true
}
