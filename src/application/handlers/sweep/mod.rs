//! Sweep handlers.
//!
//! Reclaim seats held by checkouts that never paid. Both sweeps read one
//! page of candidates per run, oldest first, and stop at the first error.
//! Reclaimed holds leave the candidate filter, so the next run picks up
//! where this one ended.

mod expire_bank_tickets;
mod expire_payments;

use std::time::Duration;

use crate::domain::foundation::Timestamp;

pub use expire_bank_tickets::ExpireBankTicketsHandler;
pub use expire_payments::ExpirePaymentsHandler;

/// Which hold a sweep looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Payments,
    BankTickets,
}

/// Thresholds shared by both sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    /// How long past its expiry a hold is left alone.
    pub expiry_grace: Duration,
    /// Candidates read per run.
    pub page_size: usize,
}

impl SweepPolicy {
    /// Holds older than this instant are eligible.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now.minus(self.expiry_grace)
    }
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            expiry_grace: Duration::from_secs(15 * 60),
            page_size: 100,
        }
    }
}

/// What one sweep run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub kind: SweepKind,
    pub scanned: usize,
    pub reclaimed: usize,
    /// Candidates left alone because a valid payment still backs them.
    pub skipped: usize,
}

impl SweepSummary {
    fn new(kind: SweepKind) -> Self {
        Self {
            kind,
            scanned: 0,
            reclaimed: 0,
            skipped: 0,
        }
    }

    pub fn message(&self) -> &'static str {
        match (self.kind, self.scanned) {
            (SweepKind::Payments, 0) => "Expiry payment ticket empty",
            (SweepKind::Payments, _) => "Success delete expired payment ticket",
            (SweepKind::BankTickets, 0) => "Expiry bank ticket empty",
            (SweepKind::BankTickets, _) => "Success delete expired bank ticket",
        }
    }
}
