//! In-memory job lock for tests and single-replica runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::foundation::DomainError;
use crate::ports::{JobLock, LockToken};

#[derive(Debug, Clone)]
struct Held {
    token: LockToken,
    expires_at: Instant,
}

/// Job lock backed by a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobLock {
    held: Arc<RwLock<HashMap<String, Held>>>,
}

impl InMemoryJobLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `job` is currently held by anyone.
    pub async fn is_held(&self, job: &str) -> bool {
        let held = self.held.read().await;
        held.get(job)
            .map(|h| h.expires_at > Instant::now())
            .unwrap_or(false)
    }
}

#[async_trait]
impl JobLock for InMemoryJobLock {
    async fn try_acquire(
        &self,
        job: &str,
        ttl: Duration,
    ) -> Result<Option<LockToken>, DomainError> {
        let now = Instant::now();
        let mut held = self.held.write().await;

        if let Some(current) = held.get(job) {
            if current.expires_at > now {
                return Ok(None);
            }
        }

        let token = LockToken::new();
        held.insert(
            job.to_string(),
            Held {
                token: token.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(Some(token))
    }

    async fn release(&self, job: &str, token: &LockToken) -> Result<(), DomainError> {
        let mut held = self.held.write().await;
        if held.get(job).map(|h| &h.token == token).unwrap_or(false) {
            held.remove(job);
        }
        Ok(())
    }
}
