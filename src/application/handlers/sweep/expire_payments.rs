//! ExpirePaymentsHandler - Reclaims seats of unpaid, expired payments.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::inventory::InventoryError;
use crate::ports::{HoldRelease, HoldSource, InventoryReader, InventoryRepository};

use super::{SweepKind, SweepPolicy, SweepSummary};

/// Handler for the payment expiry sweep.
///
/// For each expired payment: invalidates it, deletes its order, clears the
/// seat, and returns one seat to the ticket detail's remaining count.
pub struct ExpirePaymentsHandler {
    reader: Arc<dyn InventoryReader>,
    repository: Arc<dyn InventoryRepository>,
    policy: SweepPolicy,
}

impl ExpirePaymentsHandler {
    pub fn new(
        reader: Arc<dyn InventoryReader>,
        repository: Arc<dyn InventoryRepository>,
        policy: SweepPolicy,
    ) -> Self {
        Self {
            reader,
            repository,
            policy,
        }
    }

    #[tracing::instrument(name = "update_all_expiry_payment", skip(self))]
    pub async fn handle(&self) -> Result<SweepSummary, InventoryError> {
        let cutoff = self.policy.cutoff(Timestamp::now());
        let payments = self
            .reader
            .find_expired_payments(cutoff, self.policy.page_size)
            .await?;

        let mut summary = SweepSummary::new(SweepKind::Payments);
        summary.scanned = payments.len();
        if payments.is_empty() {
            tracing::info!("{}", summary.message());
            return Ok(summary);
        }

        for payment in payments {
            let detail = self
                .reader
                .find_ticket_detail_by_id(&payment.ticket.ticket_id)
                .await?
                .ok_or_else(|| InventoryError::not_found("ticket detail not found"))?;

            // Refuse before touching the payment, order or seat.
            detail.remaining_after_release()?;

            tracing::info!(
                payment_id = %payment.payment_id,
                ticket_number = %payment.ticket.ticket_number,
                "payment expired"
            );

            let released = self
                .repository
                .release_hold(&HoldRelease {
                    ticket_number: payment.ticket.ticket_number.clone(),
                    ticket_id: detail.ticket_id.clone(),
                    price: detail.ticket_price,
                    source: HoldSource::Payment {
                        payment_id: payment.payment_id.clone(),
                    },
                })
                .await?;

            let Some(remaining) = released else {
                tracing::info!(ticket_number = %payment.ticket.ticket_number, "hold already released");
                summary.skipped += 1;
                continue;
            };

            tracing::debug!(
                ticket_id = %detail.ticket_id,
                total_remaining = remaining,
                "seat returned to pool"
            );
            summary.reclaimed += 1;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryInventoryStore;
    use crate::domain::inventory::fixtures::ticket_detail;
    use crate::domain::inventory::{BankTicket, TicketTemplate, PENDING_PAYMENT_STATUS};
    use crate::domain::payment::fixtures::pending_payment;

    fn handler(store: &Arc<InMemoryInventoryStore>) -> ExpirePaymentsHandler {
        ExpirePaymentsHandler::new(store.clone(), store.clone(), SweepPolicy::default())
    }

    async fn held_seat(store: &InMemoryInventoryStore, ticket_number: &str) {
        let detail = ticket_detail("t-1", 10, 10);
        let mut ticket = BankTicket::issue(
            &detail.partition(),
            &TicketTemplate::from(&detail),
            1,
            Timestamp::now().minus_minutes(30),
        );
        ticket.ticket_number = ticket_number.to_string();
        ticket.is_used = true;
        ticket.user_id = "user-1".to_string();
        ticket.queue_id = "queue-1".to_string();
        ticket.payment_status = PENDING_PAYMENT_STATUS.to_string();
        ticket.price = 1;
        store.insert_bank_ticket(ticket).await;
    }

    #[tokio::test]
    async fn reclaims_expired_payment() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let now = Timestamp::now();
        store.insert_ticket_detail(ticket_detail("t-1", 10, 9)).await;
        store
            .insert_payment(pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(20)))
            .await;
        store.insert_order("tn-1").await;
        held_seat(&store, "tn-1").await;

        let summary = handler(&store).handle().await.unwrap();

        assert_eq!(summary.reclaimed, 1);
        assert_eq!(summary.message(), "Success delete expired payment ticket");
        assert!(!store.payment("p-1").await.unwrap().is_valid_payment);
        assert!(!store.has_order("tn-1").await);
        let seat = store.find_bank_ticket("tn-1").await.unwrap().unwrap();
        assert!(!seat.is_used);
        assert!(seat.user_id.is_empty() && seat.queue_id.is_empty());
        assert!(seat.payment_status.is_empty());
        assert_eq!(seat.price, 750_000);
        assert_eq!(store.ticket_detail("t-1").await.unwrap().total_remaining, 10);
    }

    #[tokio::test]
    async fn full_detail_fails_without_writes() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let now = Timestamp::now();
        store.insert_ticket_detail(ticket_detail("t-1", 10, 10)).await;
        store
            .insert_payment(pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(20)))
            .await;
        store.insert_order("tn-1").await;
        held_seat(&store, "tn-1").await;

        let err = handler(&store).handle().await.unwrap_err();

        assert_eq!(err, InventoryError::bad_request("totalRemaining full"));
        assert!(store.payment("p-1").await.unwrap().is_valid_payment);
        assert!(store.has_order("tn-1").await);
        assert!(store.find_bank_ticket("tn-1").await.unwrap().unwrap().is_used);
        assert_eq!(store.ticket_detail("t-1").await.unwrap().total_remaining, 10);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let now = Timestamp::now();
        store.insert_ticket_detail(ticket_detail("t-1", 10, 8)).await;
        store
            .insert_payment(pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(20)))
            .await;
        let handler = handler(&store);

        handler.handle().await.unwrap();
        let again = handler.handle().await.unwrap();

        assert_eq!(again.scanned, 0);
        assert_eq!(again.message(), "Expiry payment ticket empty");
        assert_eq!(store.ticket_detail("t-1").await.unwrap().total_remaining, 9);
    }

    #[tokio::test]
    async fn payments_inside_grace_are_left_alone() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let now = Timestamp::now();
        store.insert_ticket_detail(ticket_detail("t-1", 10, 8)).await;
        store
            .insert_payment(pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(5)))
            .await;

        let summary = handler(&store).handle().await.unwrap();

        assert_eq!(summary.scanned, 0);
        assert!(store.payment("p-1").await.unwrap().is_valid_payment);
    }

    #[tokio::test]
    async fn stops_at_first_failure_keeping_earlier_reclaims() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let now = Timestamp::now();
        store.insert_ticket_detail(ticket_detail("t-1", 10, 8)).await;
        let first = pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(40));
        // created_at follows expiry_time, so this is also processing order.
        let orphan = pending_payment("p-2", "tn-2", "t-missing", now.minus_minutes(30));
        let last = pending_payment("p-3", "tn-3", "t-1", now.minus_minutes(20));
        for payment in [first, orphan, last] {
            store.insert_payment(payment).await;
        }

        let err = handler(&store).handle().await.unwrap_err();

        assert_eq!(err, InventoryError::not_found("ticket detail not found"));
        assert!(!store.payment("p-1").await.unwrap().is_valid_payment);
        assert!(store.payment("p-3").await.unwrap().is_valid_payment);
        assert_eq!(store.ticket_detail("t-1").await.unwrap().total_remaining, 9);
    }

    #[tokio::test]
    async fn reads_at_most_one_page() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let now = Timestamp::now();
        store.insert_ticket_detail(ticket_detail("t-1", 10, 0)).await;
        for i in 0..3 {
            store
                .insert_payment(pending_payment(
                    &format!("p-{}", i),
                    &format!("tn-{}", i),
                    "t-1",
                    now.minus_minutes(20),
                ))
                .await;
        }
        let handler = ExpirePaymentsHandler::new(
            store.clone(),
            store.clone(),
            SweepPolicy {
                page_size: 2,
                ..SweepPolicy::default()
            },
        );

        let summary = handler.handle().await.unwrap();

        assert_eq!(summary.reclaimed, 2);
        assert_eq!(store.ticket_detail("t-1").await.unwrap().total_remaining, 2);
    }
}
