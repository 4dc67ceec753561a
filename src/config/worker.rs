//! Worker configuration: sweep schedule and allocation policy

use serde::Deserialize;
use std::time::Duration;

use crate::application::SweepPolicy;

use super::error::ValidationError;

/// Background job configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Seconds between payment expiry sweeps
    #[serde(default = "default_payment_sweep_interval")]
    pub payment_sweep_interval_secs: u64,

    /// Seconds between bank ticket expiry sweeps
    #[serde(default = "default_bank_ticket_sweep_interval")]
    pub bank_ticket_sweep_interval_secs: u64,

    /// Minutes a hold may sit past expiry before it is reclaimed
    #[serde(default = "default_expiry_grace")]
    pub expiry_grace_minutes: u64,

    /// Candidates read per sweep run
    #[serde(default = "default_page_size")]
    pub sweep_page_size: usize,

    /// Seat allocation attempts before reporting a conflict
    #[serde(default = "default_max_attempts")]
    pub allocation_max_attempts: u32,

    /// Seconds a sweep job lock lives if the holder never releases it
    #[serde(default = "default_job_lock_ttl")]
    pub job_lock_ttl_secs: u64,

    /// Run the sweep scheduler in this process
    #[serde(default = "default_true")]
    pub scheduler_enabled: bool,
}

impl WorkerConfig {
    pub fn payment_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.payment_sweep_interval_secs)
    }

    pub fn bank_ticket_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.bank_ticket_sweep_interval_secs)
    }

    pub fn job_lock_ttl(&self) -> Duration {
        Duration::from_secs(self.job_lock_ttl_secs)
    }

    pub fn sweep_policy(&self) -> SweepPolicy {
        SweepPolicy {
            expiry_grace: Duration::from_secs(self.expiry_grace_minutes * 60),
            page_size: self.sweep_page_size,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.payment_sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("payment sweep"));
        }
        if self.bank_ticket_sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidInterval("bank ticket sweep"));
        }
        if self.sweep_page_size == 0 || self.sweep_page_size > 1000 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.allocation_max_attempts == 0 || self.allocation_max_attempts > 10 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.job_lock_ttl_secs == 0 {
            return Err(ValidationError::InvalidLockTtl);
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            payment_sweep_interval_secs: default_payment_sweep_interval(),
            bank_ticket_sweep_interval_secs: default_bank_ticket_sweep_interval(),
            expiry_grace_minutes: default_expiry_grace(),
            sweep_page_size: default_page_size(),
            allocation_max_attempts: default_max_attempts(),
            job_lock_ttl_secs: default_job_lock_ttl(),
            scheduler_enabled: true,
        }
    }
}

fn default_payment_sweep_interval() -> u64 {
    5 * 60
}

fn default_bank_ticket_sweep_interval() -> u64 {
    10 * 60
}

fn default_expiry_grace() -> u64 {
    15
}

fn default_page_size() -> usize {
    100
}

fn default_max_attempts() -> u32 {
    3
}

fn default_job_lock_ttl() -> u64 {
    4 * 60
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_config_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.payment_sweep_interval(), Duration::from_secs(300));
        assert_eq!(config.bank_ticket_sweep_interval(), Duration::from_secs(600));
        assert_eq!(config.allocation_max_attempts, 3);
        assert!(config.scheduler_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sweep_policy_matches_default_policy() {
        assert_eq!(WorkerConfig::default().sweep_policy(), SweepPolicy::default());
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let config = WorkerConfig {
            bank_ticket_sweep_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidInterval("bank ticket sweep"))
        );
    }

    #[test]
    fn test_validation_rejects_bad_page_size_and_attempts() {
        let config = WorkerConfig {
            sweep_page_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPageSize));

        let config = WorkerConfig {
            allocation_max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxAttempts));
    }
}
