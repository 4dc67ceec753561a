//! Inventory module - ticket details, seats, and their errors.

mod bank_ticket;
mod errors;
mod ticket_detail;

pub use bank_ticket::{
    BankTicket, Partition, SeatBatch, SeatRange, TicketTemplate, PENDING_PAYMENT_STATUS,
};
pub use errors::InventoryError;
pub use ticket_detail::{Country, TicketDetail, TicketType, ONLINE_TICKET_TYPE};

#[cfg(test)]
pub(crate) use ticket_detail::fixtures;
