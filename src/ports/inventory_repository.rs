//! Inventory repository port (write side).
//!
//! Each method is one unit of work. Adapters must apply all of its writes
//! or none of them.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::inventory::SeatBatch;

/// Repository port for inventory mutations.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Insert a batch of freshly issued seats.
    ///
    /// An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// - `SeatConflict` if any seat number is already taken in the partition
    /// - `DatabaseError` on store failure
    async fn insert_bank_tickets(&self, batch: &SeatBatch) -> Result<(), DomainError>;

    /// Open one country for online sales.
    ///
    /// Inserts the seat batch, records the country code on the config slot
    /// for the country number when there is one, and rewrites the online ticket detail's quota and remaining counts.
    ///
    /// # Errors
    ///
    /// - `SeatConflict` if any seat number is already taken
    /// - `OnlineConfigNotFound` if the config does not exist
    /// - `TicketDetailNotFound` if the online ticket detail does not exist
    /// - `DatabaseError` on store failure
    async fn provision_online_country(
        &self,
        command: &ProvisionOnlineCountry,
    ) -> Result<(), DomainError>;

    /// Return an expired hold's seat to the pool.
    ///
    /// Returns the ticket detail's new `totalRemaining`, or `None` when the
    /// hold was already released or a valid payment now backs the seat.
    ///
    /// # Errors
    ///
    /// - `TicketDetailNotFound` if the ticket detail does not exist
    /// - `QuotaExceeded` if `totalRemaining` is already at `totalQuota`
    /// - `DatabaseError` on store failure
    async fn release_hold(&self, command: &HoldRelease) -> Result<Option<u32>, DomainError>;
}

/// Writes that provision one country's online partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOnlineCountry {
    pub tag: String,
    pub country_number: u8,
    pub country_code: String,
    pub batch: SeatBatch,
    pub total_quota: u32,
    pub total_remaining: u32,
}

/// Where an expired hold was discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldSource {
    /// An unpaid payment; the payment is invalidated and its order deleted.
    Payment { payment_id: String },
    /// A bank ticket stuck in `pending` with no valid payment behind it.
    BankTicket,
}

/// Writes that reclaim one held seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldRelease {
    pub ticket_number: String,
    pub ticket_id: String,
    /// Price restored onto the bank ticket.
    pub price: i64,
    pub source: HoldSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn InventoryRepository) {}
    }
}
