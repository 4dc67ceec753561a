//! ExpireBankTicketsHandler - Reclaims seats stuck in `pending` status.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::inventory::InventoryError;
use crate::ports::{HoldRelease, HoldSource, InventoryReader, InventoryRepository};

use super::{SweepKind, SweepPolicy, SweepSummary};

/// Handler for the bank ticket expiry sweep.
///
/// A seat still backed by a valid payment is skipped; the payment sweep
/// owns it.
pub struct ExpireBankTicketsHandler {
    reader: Arc<dyn InventoryReader>,
    repository: Arc<dyn InventoryRepository>,
    policy: SweepPolicy,
}

impl ExpireBankTicketsHandler {
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

    #[tracing::instrument(name = "update_all_expiry_bank_ticket", skip(self))]
    pub async fn handle(&self) -> Result<SweepSummary, InventoryError> {
        let cutoff = self.policy.cutoff(Timestamp::now());
        let tickets = self
            .reader
            .find_expired_bank_tickets(cutoff, self.policy.page_size)
            .await?;

        let mut summary = SweepSummary::new(SweepKind::BankTickets);
        summary.scanned = tickets.len();
        if tickets.is_empty() {
            tracing::info!("{}", summary.message());
            return Ok(summary);
        }

        for ticket in tickets {
            if self
                .reader
                .find_valid_payment_by_ticket_number(&ticket.ticket_number)
                .await?
                .is_some()
            {
                tracing::info!(
                    ticket_number = %ticket.ticket_number,
                    "valid payment exists, skipping bank ticket"
                );
                summary.skipped += 1;
                continue;
            }

            let detail = self
                .reader
                .find_ticket_detail_by_id(&ticket.ticket_id)
                .await?
                .ok_or_else(|| InventoryError::not_found("ticket detail not found"))?;

            detail.remaining_after_release()?;

            tracing::info!(
                ticket_number = %ticket.ticket_number,
                seat_number = ticket.seat_number,
                "bank ticket expired"
            );

            let released = self
                .repository
                .release_hold(&HoldRelease {
                    ticket_number: ticket.ticket_number.clone(),
                    ticket_id: detail.ticket_id.clone(),
                    price: detail.ticket_price,
                    source: HoldSource::BankTicket,
                })
                .await?;

            let Some(remaining) = released else {
                tracing::info!(ticket_number = %ticket.ticket_number, "hold already released");
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
