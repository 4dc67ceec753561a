//! SweepScheduler - Background service that fires the expiry sweeps.
//!
//! Two independent intervals drive the payment and bank ticket sweeps.
//! Every fire takes a named job lock first, so when several replicas run
//! the same schedule only one of them sweeps and the rest skip that tick.
//!
//! ## Graceful Shutdown
//!
//! The loop exits when the watch channel flips to `true`. A sweep that is
//! already running finishes before the loop observes the signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::application::{ExpireBankTicketsHandler, ExpirePaymentsHandler, SweepKind, SweepSummary};
use crate::config::WorkerConfig;
use crate::domain::inventory::InventoryError;
use crate::ports::JobLock;

pub const PAYMENT_SWEEP_JOB: &str = "update-all-expiry-payment";
pub const BANK_TICKET_SWEEP_JOB: &str = "update-all-expiry-bank-ticket";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSchedulerConfig {
    pub payment_interval: Duration,
    pub bank_ticket_interval: Duration,
    pub lock_ttl: Duration,
}

impl Default for SweepSchedulerConfig {
    fn default() -> Self {
        Self::from(&WorkerConfig::default())
    }
}

impl From<&WorkerConfig> for SweepSchedulerConfig {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            payment_interval: config.payment_sweep_interval(),
            bank_ticket_interval: config.bank_ticket_sweep_interval(),
            lock_ttl: config.job_lock_ttl(),
        }
    }
}

/// What happened on one scheduled fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Another holder had the job lock.
    Skipped,
    Completed(SweepSummary),
    Failed(InventoryError),
}

pub struct SweepScheduler {
    payments: Arc<ExpirePaymentsHandler>,
    bank_tickets: Arc<ExpireBankTicketsHandler>,
    lock: Arc<dyn JobLock>,
    config: SweepSchedulerConfig,
}

impl SweepScheduler {
    pub fn new(
        payments: Arc<ExpirePaymentsHandler>,
        bank_tickets: Arc<ExpireBankTicketsHandler>,
        lock: Arc<dyn JobLock>,
        config: SweepSchedulerConfig,
    ) -> Self {
        Self {
            payments,
            bank_tickets,
            lock,
            config,
        }
    }

    /// Run both schedules until shutdown is signalled.
    ///
    /// The first sweep of each kind fires one full interval after start.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut payment_tick = ticker(self.config.payment_interval);
        let mut bank_ticket_tick = ticker(self.config.bank_ticket_interval);

        tracing::info!(
            payment_interval_secs = self.config.payment_interval.as_secs(),
            bank_ticket_interval_secs = self.config.bank_ticket_interval.as_secs(),
            "sweep scheduler started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("sweep scheduler stopping");
                        return;
                    }
                }
                _ = payment_tick.tick() => {
                    self.run_once(SweepKind::Payments).await;
                }
                _ = bank_ticket_tick.tick() => {
                    self.run_once(SweepKind::BankTickets).await;
                }
            }
        }
    }

    /// Fire one sweep under its job lock and log the result.
    pub async fn run_once(&self, kind: SweepKind) -> SweepOutcome {
        let job = job_name(kind);

        let token = match self.lock.try_acquire(job, self.config.lock_ttl).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!(job = job, "sweep already running elsewhere, skipping");
                return SweepOutcome::Skipped;
            }
            Err(e) => {
                tracing::error!(job = job, error = %e, "failed to take job lock");
                return SweepOutcome::Failed(InventoryError::from(e));
            }
        };

        let result = match kind {
            SweepKind::Payments => self.payments.handle().await,
            SweepKind::BankTickets => self.bank_tickets.handle().await,
        };

        if let Err(e) = self.lock.release(job, &token).await {
            tracing::warn!(job = job, error = %e, "failed to release job lock");
        }

        match result {
            Ok(summary) => {
                tracing::info!(
                    job = job,
                    scanned = summary.scanned,
                    reclaimed = summary.reclaimed,
                    skipped = summary.skipped,
                    "{}",
                    summary.message()
                );
                SweepOutcome::Completed(summary)
            }
            Err(e) => {
                tracing::error!(job = job, error = %e, "sweep failed");
                SweepOutcome::Failed(e)
            }
        }
    }
}

fn job_name(kind: SweepKind) -> &'static str {
    match kind {
        SweepKind::Payments => PAYMENT_SWEEP_JOB,
        SweepKind::BankTickets => BANK_TICKET_SWEEP_JOB,
    }
}

fn ticker(period: Duration) -> time::Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
