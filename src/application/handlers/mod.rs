//! Application handlers.
//!
//! Command handlers that orchestrate the worker's inventory operations.
//!
//! - `allocation` - seat allocation for a ticket detail
//! - `distribution` - online quota distribution across ranked countries
//! - `sweep` - reclaiming seats from expired holds

pub mod allocation;
pub mod distribution;
pub mod sweep;

pub use allocation::{
    CreateBankTicketCommand, CreateBankTicketHandler, CreateBankTicketResult, SeatAllocator,
};
pub use distribution::{
    CreateOnlineBankTicketCommand, CreateOnlineBankTicketHandler, CreateOnlineBankTicketResult,
    ProvisionedCountry,
};
pub use sweep::{
    ExpireBankTicketsHandler, ExpirePaymentsHandler, SweepKind, SweepPolicy, SweepSummary,
};
