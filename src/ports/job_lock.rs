//! Job lock port - keeps overlapping scheduled runs from sweeping twice.
//!
//! Implementations can use in-memory storage for a single process or
//! Redis when several replicas share the same schedule.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::foundation::DomainError;

/// Proof of ownership returned by a successful acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken(String);

impl LockToken {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LockToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Port for named, expiring mutual exclusion.
#[async_trait]
pub trait JobLock: Send + Sync {
    /// Try to take the lock for `job`.
    ///
    /// Returns `None` when another holder owns it. The lock expires on its
    /// own after `ttl` so a crashed holder cannot wedge the job.
    async fn try_acquire(&self, job: &str, ttl: Duration)
        -> Result<Option<LockToken>, DomainError>;

    /// Release the lock if `token` still owns it.
    async fn release(&self, job: &str, token: &LockToken) -> Result<(), DomainError>;
}
