//! Distribution handlers.

mod create_online_bank_ticket;

pub use create_online_bank_ticket::{
    CreateOnlineBankTicketCommand, CreateOnlineBankTicketHandler, CreateOnlineBankTicketResult,
    ProvisionedCountry,
};
