//! End-to-end inventory lifecycle through the in-memory store.
//!
//! Seats are opened, held by a checkout that never pays, swept back, and
//! the online quota is distributed once offline sales close.

mod common;

use std::sync::Arc;

use ticket_worker::adapters::InMemoryInventoryStore;
use ticket_worker::application::{
    CreateBankTicketCommand, CreateBankTicketHandler, CreateOnlineBankTicketCommand,
    CreateOnlineBankTicketHandler, CreateOnlineBankTicketResult, ExpireBankTicketsHandler,
    ExpirePaymentsHandler, SweepPolicy,
};
use ticket_worker::domain::foundation::Timestamp;
use ticket_worker::domain::inventory::InventoryError;

use common::{detail, hold, online_config, pending_payment, EVENT, TAG};

struct Worker {
    store: Arc<InMemoryInventoryStore>,
    create: CreateBankTicketHandler,
    online: CreateOnlineBankTicketHandler,
    payments: ExpirePaymentsHandler,
    bank_tickets: ExpireBankTicketsHandler,
}

fn worker() -> Worker {
    let store = Arc::new(InMemoryInventoryStore::new());
    let policy = SweepPolicy::default();
    Worker {
        create: CreateBankTicketHandler::new(store.clone(), store.clone(), 3),
        online: CreateOnlineBankTicketHandler::new(store.clone(), store.clone(), 3),
        payments: ExpirePaymentsHandler::new(store.clone(), store.clone(), policy),
        bank_tickets: ExpireBankTicketsHandler::new(store.clone(), store.clone(), policy),
        store,
    }
}

fn open(ticket_id: &str) -> CreateBankTicketCommand {
    CreateBankTicketCommand {
        ticket_id: ticket_id.to_string(),
        event_id: EVENT.to_string(),
    }
}

#[tokio::test]
async fn quota_raise_tops_up_partition_without_reusing_seats() {
    let w = worker();
    let gold = detail("gold-id", "ID", "Gold", 3, 3);
    w.store.insert_ticket_detail(gold.clone()).await;

    w.create.handle(open("gold-id")).await.unwrap();

    let mut raised = gold.clone();
    raised.total_quota = 5;
    raised.total_remaining = 5;
    w.store.insert_ticket_detail(raised).await;

    let second = w.create.handle(open("gold-id")).await.unwrap();
    assert_eq!(second.created(), 2);

    let seats: Vec<u32> = w
        .store
        .bank_tickets(&gold.partition())
        .await
        .iter()
        .map(|t| t.seat_number)
        .collect();
    assert_eq!(seats, vec![1, 2, 3, 4, 5]);

    let third = w.create.handle(open("gold-id")).await.unwrap();
    assert_eq!(third.created(), 0);
}

#[tokio::test]
async fn unpaid_checkout_is_swept_back_into_inventory() {
    let w = worker();
    let gold = detail("gold-id", "ID", "Gold", 4, 4);
    w.store.insert_ticket_detail(gold.clone()).await;
    w.create.handle(open("gold-id")).await.unwrap();

    // Checkout takes seat 2 and never pays
    let now = Timestamp::now();
    let seat = w.store.bank_tickets(&gold.partition()).await[1].clone();
    let held = hold(seat, now.minus_minutes(40));
    w.store.insert_bank_ticket(held.clone()).await;
    w.store
        .insert_payment(pending_payment("pay-1", &held, now.minus_minutes(20)))
        .await;
    w.store.insert_order(&held.ticket_number).await;
    let mut sold = gold.clone();
    sold.total_remaining = 3;
    w.store.insert_ticket_detail(sold).await;

    // The bank ticket sweep leaves it alone while the payment is valid
    let bank_summary = w.bank_tickets.handle().await.unwrap();
    assert_eq!((bank_summary.scanned, bank_summary.skipped), (1, 1));
    assert_eq!(w.store.ticket_detail("gold-id").await.unwrap().total_remaining, 3);

    let summary = w.payments.handle().await.unwrap();
    assert_eq!(summary.reclaimed, 1);
    assert_eq!(summary.message(), "Success delete expired payment ticket");

    let reclaimed = w.store.bank_tickets(&gold.partition()).await[1].clone();
    assert!(!reclaimed.is_used);
    assert!(reclaimed.payment_status.is_empty());
    assert_eq!(reclaimed.price, gold.ticket_price);
    assert!(!w.store.has_order(&held.ticket_number).await);
    assert!(!w.store.payment("pay-1").await.unwrap().is_valid_payment);
    assert_eq!(w.store.ticket_detail("gold-id").await.unwrap().total_remaining, 4);

    // Nothing left for either sweep
    assert_eq!(w.payments.handle().await.unwrap().message(), "Expiry payment ticket empty");
    assert_eq!(w.bank_tickets.handle().await.unwrap().message(), "Expiry bank ticket empty");
}

#[tokio::test]
async fn orphaned_hold_without_payment_is_reclaimed_by_bank_ticket_sweep() {
    let w = worker();
    let gold = detail("gold-id", "ID", "Gold", 2, 2);
    w.store.insert_ticket_detail(gold.clone()).await;
    w.create.handle(open("gold-id")).await.unwrap();

    let seat = w.store.bank_tickets(&gold.partition()).await[0].clone();
    w.store
        .insert_bank_ticket(hold(seat, Timestamp::now().minus_minutes(30)))
        .await;
    let mut sold = gold.clone();
    sold.total_remaining = 1;
    w.store.insert_ticket_detail(sold).await;

    let summary = w.bank_tickets.handle().await.unwrap();

    assert_eq!(summary.reclaimed, 1);
    assert_eq!(w.store.ticket_detail("gold-id").await.unwrap().total_remaining, 2);
}

#[tokio::test]
async fn full_detail_refuses_reclaim_and_keeps_hold() {
    let w = worker();
    let gold = detail("gold-id", "ID", "Gold", 2, 2);
    w.store.insert_ticket_detail(gold.clone()).await;
    w.create.handle(open("gold-id")).await.unwrap();

    let seat = w.store.bank_tickets(&gold.partition()).await[0].clone();
    let held = hold(seat, Timestamp::now().minus_minutes(30));
    w.store.insert_bank_ticket(held.clone()).await;

    let err = w.bank_tickets.handle().await.unwrap_err();

    assert_eq!(err, InventoryError::bad_request("totalRemaining full"));
    let still_held = w.store.bank_tickets(&gold.partition()).await[0].clone();
    assert!(still_held.is_payment_pending());
}

#[tokio::test]
async fn online_distribution_opens_after_offline_sells_out() {
    let w = worker();
    w.store.insert_online_config(online_config(200, [50, 25, 25, 0])).await;
    w.store.insert_ticket_detail(detail("gold-id", "ID", "Gold", 10, 2)).await;
    w.store.insert_ticket_detail(detail("gold-sg", "SG", "Gold", 10, 6)).await;
    w.store.insert_ticket_detail(detail("online-id", "ID", "Online", 0, 0)).await;
    w.store.insert_ticket_detail(detail("online-sg", "SG", "Online", 0, 0)).await;
    let command = CreateOnlineBankTicketCommand {
        tag: TAG.to_string(),
        country_code: "ID".to_string(),
    };

    // ID still has seats offline
    let err = w.online.handle(command.clone()).await.unwrap_err();
    assert_eq!(err, InventoryError::bad_request("offline ticket still ready"));
    assert_eq!(w.store.bank_ticket_count().await, 0);

    w.store.insert_ticket_detail(detail("gold-id", "ID", "Gold", 10, 0)).await;
    let result = w.online.handle(command.clone()).await.unwrap();

    let CreateOnlineBankTicketResult::Provisioned(countries) = result else {
        panic!("expected provisioned countries");
    };
    let quotas: Vec<(String, u32)> = countries
        .iter()
        .map(|c| (c.quota.country_code.clone(), c.quota.total_quota))
        .collect();
    assert_eq!(quotas, vec![("ID".to_string(), 100), ("SG".to_string(), 50)]);
    assert_eq!(w.store.ticket_detail("online-sg").await.unwrap().total_remaining, 50);

    let rerun = w.online.handle(command).await.unwrap();
    assert_eq!(rerun, CreateOnlineBankTicketResult::NothingToProvision);
    assert_eq!(w.store.bank_ticket_count().await, 150);
}

#[tokio::test]
async fn concurrent_allocations_never_duplicate_seats() {
    let w = Arc::new(worker());
    let gold = detail("gold-id", "ID", "Gold", 50, 50);
    w.store.insert_ticket_detail(gold.clone()).await;

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let w = Arc::clone(&w);
        tasks.push(tokio::spawn(async move { w.create.handle(open("gold-id")).await }));
    }
    for task in tasks {
        // Losers either find the partition full or report a conflict
        match task.await.unwrap() {
            Ok(_) | Err(InventoryError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    let seats: Vec<u32> = w
        .store
        .bank_tickets(&gold.partition())
        .await
        .iter()
        .map(|t| t.seat_number)
        .collect();
    assert_eq!(seats, (1..=50).collect::<Vec<_>>());
}
