//! Topic consumers.
//!
//! Each consumer decodes one topic's payload, calls the matching
//! application handler, and logs the outcome. Messages are always
//! acknowledged: a bad payload or a failed run is logged, never redelivered.

mod create_bank_ticket;
mod online_bank_ticket;

use std::sync::Arc;

pub use create_bank_ticket::{CreateBankTicketConsumer, CreateBankTicketMessage};
pub use online_bank_ticket::{OnlineBankTicketConsumer, OnlineBankTicketMessage};

use crate::config::ConsumerConfig;
use crate::ports::EventSubscriber;

/// Register both consumers on their configured topics.
pub fn register_consumers(
    subscriber: &dyn EventSubscriber,
    config: &ConsumerConfig,
    create_bank_ticket: Arc<CreateBankTicketConsumer>,
    online_bank_ticket: Arc<OnlineBankTicketConsumer>,
) {
    subscriber.subscribe(&config.create_bank_ticket_topic, create_bank_ticket);
    subscriber.subscribe(&config.online_bank_ticket_topic, online_bank_ticket);
}
