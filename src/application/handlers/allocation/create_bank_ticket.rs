//! CreateBankTicketHandler - Opens the seats of one ticket detail.

use std::sync::Arc;

use crate::domain::foundation::ValidationError;
use crate::domain::inventory::{InventoryError, Partition, SeatRange, TicketTemplate};
use crate::ports::{InventoryReader, InventoryRepository};

use super::SeatAllocator;

/// Command to allocate every remaining seat of a ticket detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBankTicketCommand {
    pub ticket_id: String,
    pub event_id: String,
}

impl CreateBankTicketCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ticket_id.trim().is_empty() {
            return Err(ValidationError::empty_field("ticketId"));
        }
        if self.event_id.trim().is_empty() {
            return Err(ValidationError::empty_field("eventId"));
        }
        Ok(())
    }
}

/// Result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBankTicketResult {
    pub partition: Partition,
    pub seats: SeatRange,
}

impl CreateBankTicketResult {
    /// Number of seats inserted by this call.
    pub fn created(&self) -> usize {
        self.seats.len()
    }

    pub fn message(&self) -> &'static str {
        "Success create bank ticket"
    }
}

/// Handler for opening a ticket detail's seats.
///
/// Seats continue after the highest existing seat of the partition, so
/// calling it again after the quota was raised tops the partition up.
pub struct CreateBankTicketHandler {
    reader: Arc<dyn InventoryReader>,
    repository: Arc<dyn InventoryRepository>,
    allocator: SeatAllocator,
}

impl CreateBankTicketHandler {
    pub fn new(
        reader: Arc<dyn InventoryReader>,
        repository: Arc<dyn InventoryRepository>,
        max_attempts: u32,
    ) -> Self {
        Self {
            allocator: SeatAllocator::new(Arc::clone(&reader), max_attempts),
            reader,
            repository,
        }
    }

    #[tracing::instrument(
        name = "create_bank_ticket",
        skip(self, cmd),
        fields(ticket_id = %cmd.ticket_id, event_id = %cmd.event_id)
    )]
    pub async fn handle(
        &self,
        cmd: CreateBankTicketCommand,
    ) -> Result<CreateBankTicketResult, InventoryError> {
        cmd.validate()?;

        let detail = self
            .reader
            .find_ticket_detail(&cmd.ticket_id, &cmd.event_id)
            .await?
            .ok_or_else(|| InventoryError::not_found("ticket detail not found"))?;

        let partition = detail.partition();
        let template = TicketTemplate::from(&detail);
        let repository = Arc::clone(&self.repository);

        let seats = self
            .allocator
            .allocate(&partition, detail.total_quota, &template, move |batch| {
                let repository = Arc::clone(&repository);
                async move {
                    if batch.is_empty() {
                        return Ok(());
                    }
                    repository.insert_bank_tickets(&batch).await
                }
            })
            .await?;

        tracing::info!(
            partition = %partition,
            created = seats.len(),
            "bank tickets created"
        );

        Ok(CreateBankTicketResult { partition, seats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryInventoryStore;
    use crate::domain::foundation::Timestamp;
    use crate::domain::inventory::fixtures::ticket_detail;
    use crate::domain::inventory::BankTicket;

    fn handler(store: &Arc<InMemoryInventoryStore>) -> CreateBankTicketHandler {
        CreateBankTicketHandler::new(store.clone(), store.clone(), 3)
    }

    fn command(ticket_id: &str) -> CreateBankTicketCommand {
        CreateBankTicketCommand {
            ticket_id: ticket_id.to_string(),
            event_id: "evt-1".to_string(),
        }
    }

    #[tokio::test]
    async fn fresh_partition_gets_seats_one_to_quota() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 10, 10);
        store.insert_ticket_detail(detail.clone()).await;

        let result = handler(&store).handle(command("t-1")).await.unwrap();

        assert_eq!(result.created(), 10);
        assert_eq!(result.message(), "Success create bank ticket");
        let seats: Vec<u32> = store
            .bank_tickets(&detail.partition())
            .await
            .iter()
            .map(|t| t.seat_number)
            .collect();
        assert_eq!(seats, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn continues_after_existing_last_seat() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 10, 10);
        store.insert_ticket_detail(detail.clone()).await;
        store
            .insert_bank_ticket(BankTicket::issue(
                &detail.partition(),
                &TicketTemplate::from(&detail),
                5,
                Timestamp::now(),
            ))
            .await;

        let result = handler(&store).handle(command("t-1")).await.unwrap();

        assert_eq!(result.created(), 5);
        assert_eq!(result.seats.start(), 6);
        assert_eq!(store.bank_tickets(&detail.partition()).await.len(), 6);
    }

    #[tokio::test]
    async fn zero_quota_succeeds_without_inserting() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.insert_ticket_detail(ticket_detail("t-1", 0, 0)).await;

        let result = handler(&store).handle(command("t-1")).await.unwrap();

        assert_eq!(result.created(), 0);
        assert_eq!(store.bank_ticket_count().await, 0);
    }

    #[tokio::test]
    async fn second_call_is_a_no_op() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.insert_ticket_detail(ticket_detail("t-1", 4, 4)).await;
        let handler = handler(&store);

        handler.handle(command("t-1")).await.unwrap();
        let again = handler.handle(command("t-1")).await.unwrap();

        assert_eq!(again.created(), 0);
        assert_eq!(store.bank_ticket_count().await, 4);
    }

    #[tokio::test]
    async fn tickets_copy_price_and_type_from_detail() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let detail = ticket_detail("t-1", 2, 2);
        store.insert_ticket_detail(detail.clone()).await;

        handler(&store).handle(command("t-1")).await.unwrap();

        for ticket in store.bank_tickets(&detail.partition()).await {
            assert_eq!(ticket.price, detail.ticket_price);
            assert_eq!(ticket.ticket_type, detail.ticket_type);
            assert_eq!(ticket.ticket_id, "t-1");
            assert!(!ticket.is_used);
        }
    }

    #[tokio::test]
    async fn missing_detail_is_not_found() {
        let store = Arc::new(InMemoryInventoryStore::new());

        let err = handler(&store).handle(command("missing")).await.unwrap_err();

        assert_eq!(err, InventoryError::not_found("ticket detail not found"));
    }

    #[tokio::test]
    async fn blank_identifiers_are_rejected() {
        let store = Arc::new(InMemoryInventoryStore::new());

        let err = handler(&store)
            .handle(CreateBankTicketCommand {
                ticket_id: " ".to_string(),
                event_id: "evt-1".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, InventoryError::BadRequest(_)));
    }
}
