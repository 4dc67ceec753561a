//! Ticket detail: one sales partition of an event.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

use super::{InventoryError, Partition};

/// Wire marker for online sales partitions.
pub const ONLINE_TICKET_TYPE: &str = "Online";

/// Sales channel of a ticket detail.
///
/// Online partitions are provisioned by the distributor; every other value
/// is an offline category kept verbatim (e.g. "Gold", "Platinum").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketType {
    Online,
    Offline(String),
}

impl TicketType {
    pub fn as_str(&self) -> &str {
        match self {
            TicketType::Online => ONLINE_TICKET_TYPE,
            TicketType::Offline(name) => name,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, TicketType::Online)
    }
}

impl From<String> for TicketType {
    fn from(value: String) -> Self {
        if value == ONLINE_TICKET_TYPE {
            TicketType::Online
        } else {
            TicketType::Offline(value)
        }
    }
}

impl From<&str> for TicketType {
    fn from(value: &str) -> Self {
        TicketType::from(value.to_string())
    }
}

impl From<TicketType> for String {
    fn from(value: TicketType) -> Self {
        match value {
            TicketType::Online => ONLINE_TICKET_TYPE.to_string(),
            TicketType::Offline(name) => name,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Country a partition is sold in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub place: String,
}

/// Quota bookkeeping for one sales partition.
///
/// Invariant: `total_remaining <= total_quota`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetail {
    pub ticket_id: String,
    pub event_id: String,
    pub ticket_type: TicketType,
    pub ticket_price: i64,
    pub total_quota: u32,
    pub total_remaining: u32,
    #[serde(default)]
    pub continent_name: String,
    #[serde(default)]
    pub continent_code: String,
    pub country: Country,
    #[serde(default)]
    pub tag: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TicketDetail {
    /// Partition whose seat numbers this detail governs.
    pub fn partition(&self) -> Partition {
        Partition::new(
            self.country.code.clone(),
            self.ticket_type.clone(),
            self.event_id.clone(),
        )
    }

    /// Remaining count after one reclaimed seat returns to the pool.
    ///
    /// # Errors
    ///
    /// `BadRequest("totalRemaining full")` when the pool is already at quota.
    pub fn remaining_after_release(&self) -> Result<u32, InventoryError> {
        let next = self.total_remaining.saturating_add(1);
        if next > self.total_quota {
            return Err(InventoryError::bad_request("totalRemaining full"));
        }
        Ok(next)
    }

    /// Remaining count after the quota is rewritten to `new_quota`.
    ///
    /// Computed as `(new_quota - total_quota) + total_remaining`, so seats
    /// already sold stay sold.
    ///
    /// # Errors
    ///
    /// `BadRequest` when the result would leave `[0, new_quota]`.
    pub fn remaining_after_requota(&self, new_quota: u32) -> Result<u32, InventoryError> {
        let remaining = i64::from(new_quota) - i64::from(self.total_quota)
            + i64::from(self.total_remaining);
        if remaining < 0 || remaining > i64::from(new_quota) {
            return Err(InventoryError::bad_request(format!(
                "quota {} leaves totalRemaining out of range ({})",
                new_quota, remaining
            )));
        }
        Ok(remaining as u32)
    }
}
