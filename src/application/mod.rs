//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Every ingress (HTTP, scheduler, topic consumers) calls into these handlers.

pub mod handlers;

pub use handlers::{
    CreateBankTicketCommand, CreateBankTicketHandler, CreateBankTicketResult,
    CreateOnlineBankTicketCommand, CreateOnlineBankTicketHandler, CreateOnlineBankTicketResult,
    ExpireBankTicketsHandler, ExpirePaymentsHandler, SweepKind, SweepPolicy, SweepSummary,
};
