//! Allocation handlers.
//!
//! - `SeatAllocator` - retrying "last seat + 1" allocation shared with distribution
//! - `CreateBankTicketHandler` - opens all seats of one ticket detail

mod create_bank_ticket;
mod seat_allocator;

pub use create_bank_ticket::{
    CreateBankTicketCommand, CreateBankTicketHandler, CreateBankTicketResult,
};
pub use seat_allocator::{SeatAllocator, DEFAULT_MAX_ATTEMPTS};
