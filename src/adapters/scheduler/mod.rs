//! Cron-style ingress: periodic expiry sweeps.

mod sweep_scheduler;

pub use sweep_scheduler::{
    SweepOutcome, SweepScheduler, SweepSchedulerConfig, BANK_TICKET_SWEEP_JOB, PAYMENT_SWEEP_JOB,
};
