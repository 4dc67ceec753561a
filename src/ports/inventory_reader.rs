//! Inventory reader port (query side).
//!
//! Every call re-reads current store state; the worker keeps no cached
//! copy of counters between operations.

use async_trait::async_trait;

use crate::domain::distribution::{CountryAvailability, OnlineTicketConfig};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::inventory::{BankTicket, Partition, TicketDetail};
use crate::domain::payment::PaymentHistory;

/// Reader port for inventory queries.
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Ticket detail by `{ticketId, eventId}`.
    async fn find_ticket_detail(
        &self,
        ticket_id: &str,
        event_id: &str,
    ) -> Result<Option<TicketDetail>, DomainError>;

    /// Ticket detail by `ticketId` alone.
    async fn find_ticket_detail_by_id(
        &self,
        ticket_id: &str,
    ) -> Result<Option<TicketDetail>, DomainError>;

    /// Ticket detail by `{tag, ticketType, countryCode}`.
    async fn find_ticket_detail_by_tag(
        &self,
        tag: &str,
        ticket_type: &str,
        country_code: &str,
    ) -> Result<Option<TicketDetail>, DomainError>;

    /// Highest issued seat number in a partition, if any.
    async fn find_last_seat(&self, partition: &Partition) -> Result<Option<u32>, DomainError>;

    /// Online config for a tag.
    async fn find_online_config(&self, tag: &str)
        -> Result<Option<OnlineTicketConfig>, DomainError>;

    /// Offline availability per country for a tag.
    ///
    /// Sums `totalRemaining`/`totalQuota` over the tag's non-online ticket
    /// details grouped by country code, sorted ascending by available count
    /// (ties by country code).
    async fn find_country_availability(
        &self,
        tag: &str,
    ) -> Result<Vec<CountryAvailability>, DomainError>;

    /// Pending, still-valid payments whose `expiryTime <= cutoff`,
    /// oldest `createdAt` first, at most `limit` rows.
    async fn find_expired_payments(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<PaymentHistory>, DomainError>;

    /// Bank tickets with `paymentStatus == "pending"` and `updatedAt <= cutoff`,
    /// oldest `createdAt` first, at most `limit` rows.
    async fn find_expired_bank_tickets(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<BankTicket>, DomainError>;

    /// A valid payment bound to the ticket number, if one exists.
    async fn find_valid_payment_by_ticket_number(
        &self,
        ticket_number: &str,
    ) -> Result<Option<PaymentHistory>, DomainError>;

    async fn find_bank_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Option<BankTicket>, DomainError>;
}
