//! Bank tickets: individually numbered seats within a partition.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

use super::{TicketDetail, TicketType};

/// Payment status value marking a seat held by an unfinished checkout.
pub const PENDING_PAYMENT_STATUS: &str = "pending";

/// Scope of seat-number uniqueness: `{countryCode, ticketType, eventId}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub country_code: String,
    pub ticket_type: TicketType,
    pub event_id: String,
}

impl Partition {
    pub fn new(
        country_code: impl Into<String>,
        ticket_type: TicketType,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            ticket_type,
            event_id: event_id.into(),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.event_id, self.ticket_type, self.country_code)
    }
}

/// One allocated seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTicket {
    pub ticket_number: String,
    pub seat_number: u32,
    pub is_used: bool,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub queue_id: String,
    pub ticket_id: String,
    pub event_id: String,
    pub country_code: String,
    pub price: i64,
    pub ticket_type: TicketType,
    #[serde(default)]
    pub payment_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BankTicket {
    /// Issues an unheld seat with a fresh globally unique ticket number.
    pub fn issue(partition: &Partition, template: &TicketTemplate, seat_number: u32, now: Timestamp) -> Self {
        Self {
            ticket_number: Uuid::new_v4().to_string(),
            seat_number,
            is_used: false,
            user_id: String::new(),
            queue_id: String::new(),
            ticket_id: template.ticket_id.clone(),
            event_id: partition.event_id.clone(),
            country_code: partition.country_code.clone(),
            price: template.price,
            ticket_type: partition.ticket_type.clone(),
            payment_status: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn partition(&self) -> Partition {
        Partition::new(
            self.country_code.clone(),
            self.ticket_type.clone(),
            self.event_id.clone(),
        )
    }

    /// Whether the seat is held by a checkout that has not paid yet.
    pub fn is_payment_pending(&self) -> bool {
        self.payment_status == PENDING_PAYMENT_STATUS
    }
}

/// Fields copied from the ticket detail onto every issued seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTemplate {
    pub ticket_id: String,
    pub price: i64,
}

impl From<&TicketDetail> for TicketTemplate {
    fn from(detail: &TicketDetail) -> Self {
        Self {
            ticket_id: detail.ticket_id.clone(),
            price: detail.ticket_price,
        }
    }
}

/// Inclusive run of seat numbers `[start, ceiling]`; empty when `start > ceiling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRange {
    start: u32,
    ceiling: u32,
}

impl SeatRange {
    /// Seats following the partition's highest issued seat, up to `ceiling`.
    pub fn after(last_seat: Option<u32>, ceiling: u32) -> Self {
        let start = last_seat.map_or(1, |seat| seat.saturating_add(1));
        Self { start, ceiling }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.ceiling
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.ceiling - self.start) as usize + 1
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.ceiling
    }
}

/// Seats ready to be inserted for one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatBatch {
    pub partition: Partition,
    pub range: SeatRange,
    pub tickets: Vec<BankTicket>,
}

impl SeatBatch {
    /// Materializes one ticket per seat in `range`.
    pub fn build(partition: Partition, range: SeatRange, template: &TicketTemplate) -> Self {
        let now = Timestamp::now();
        let tickets = range
            .iter()
            .map(|seat| BankTicket::issue(&partition, template, seat, now))
            .collect();
        Self {
            partition,
            range,
            tickets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }
}
