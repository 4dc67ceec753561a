//! Topic consumers wired onto the in-memory bus.

mod common;

use std::sync::Arc;

use serde_json::json;

use ticket_worker::adapters::{
    register_consumers, CreateBankTicketConsumer, InMemoryEventBus, InMemoryInventoryStore,
    OnlineBankTicketConsumer,
};
use ticket_worker::application::{CreateBankTicketHandler, CreateOnlineBankTicketHandler};
use ticket_worker::config::ConsumerConfig;
use ticket_worker::domain::foundation::EventEnvelope;
use ticket_worker::ports::EventPublisher;

use common::{detail, online_config, EVENT, TAG};

fn wired_bus(store: &Arc<InMemoryInventoryStore>, config: &ConsumerConfig) -> InMemoryEventBus {
    let bus = InMemoryEventBus::new();
    let create = CreateBankTicketHandler::new(store.clone(), store.clone(), 3);
    let online = CreateOnlineBankTicketHandler::new(store.clone(), store.clone(), 3);
    register_consumers(
        &bus,
        config,
        Arc::new(CreateBankTicketConsumer::new(Arc::new(create))),
        Arc::new(OnlineBankTicketConsumer::new(Arc::new(online))),
    );
    bus
}

#[tokio::test]
async fn both_topics_get_one_consumer() {
    let store = Arc::new(InMemoryInventoryStore::new());
    let config = ConsumerConfig::default();

    let bus = wired_bus(&store, &config);

    assert_eq!(bus.handler_count(&config.create_bank_ticket_topic), 1);
    assert_eq!(bus.handler_count(&config.online_bank_ticket_topic), 1);
}

#[tokio::test]
async fn create_topic_opens_seats() {
    let store = Arc::new(InMemoryInventoryStore::new());
    store.insert_ticket_detail(detail("gold-id", "ID", "Gold", 6, 6)).await;
    let config = ConsumerConfig::default();
    let bus = wired_bus(&store, &config);

    bus.publish(EventEnvelope::new(
        config.create_bank_ticket_topic.clone(),
        json!({ "ticketId": "gold-id", "eventId": EVENT }),
    ))
    .await
    .unwrap();

    assert_eq!(store.bank_ticket_count().await, 6);
}

#[tokio::test]
async fn failed_distribution_is_still_acknowledged() {
    let store = Arc::new(InMemoryInventoryStore::new());
    store.insert_online_config(online_config(100, [50, 50, 0, 0])).await;
    store.insert_ticket_detail(detail("gold-id", "ID", "Gold", 10, 4)).await;
    let config = ConsumerConfig::default();
    let bus = wired_bus(&store, &config);

    let result = bus
        .publish(EventEnvelope::new(
            config.online_bank_ticket_topic.clone(),
            json!({ "tag": TAG, "countryCode": "ID" }),
        ))
        .await;

    assert!(result.is_ok());
    assert_eq!(store.bank_ticket_count().await, 0);
}

#[tokio::test]
async fn custom_topics_are_honoured() {
    let store = Arc::new(InMemoryInventoryStore::new());
    store.insert_ticket_detail(detail("gold-id", "ID", "Gold", 2, 2)).await;
    let config = ConsumerConfig {
        create_bank_ticket_topic: "staging-create-bank-ticket".to_string(),
        ..Default::default()
    };
    let bus = wired_bus(&store, &config);

    bus.publish(EventEnvelope::new(
        "concert-create-bank-ticket",
        json!({ "ticketId": "gold-id", "eventId": EVENT }),
    ))
    .await
    .unwrap();
    assert_eq!(store.bank_ticket_count().await, 0);

    bus.publish(EventEnvelope::new(
        "staging-create-bank-ticket",
        json!({ "ticketId": "gold-id", "eventId": EVENT }),
    ))
    .await
    .unwrap();
    assert_eq!(store.bank_ticket_count().await, 2);
}
