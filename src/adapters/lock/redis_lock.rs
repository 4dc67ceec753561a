//! Redis-backed job lock for multi-replica deployments.
//!
//! Acquire is `SET key token NX PX ttl`; release runs a compare-and-delete
//! script so a holder whose lock already expired cannot drop someone else's.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{JobLock, LockToken};

const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

#[derive(Clone)]
pub struct RedisJobLock {
    conn: MultiplexedConnection,
    prefix: String,
}

impl RedisJobLock {
    pub fn new(conn: MultiplexedConnection, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, job: &str) -> String {
        format!("{}{}", self.prefix, job)
    }
}

fn cache_error(context: &str, err: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("{}: {}", context, err))
}

#[async_trait]
impl JobLock for RedisJobLock {
    async fn try_acquire(
        &self,
        job: &str,
        ttl: Duration,
    ) -> Result<Option<LockToken>, DomainError> {
        let token = LockToken::new();
        let mut conn = self.conn.clone();

        // Nil reply when the key already exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(job))
            .arg(token.as_str())
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis().max(1) as u64)
            .query_async(&mut conn)
            .await
            .map_err(|e| cache_error("Failed to acquire job lock", e))?;

        Ok(reply.map(|_| token))
    }

    async fn release(&self, job: &str, token: &LockToken) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();

        let released: i64 = redis::Script::new(RELEASE_SCRIPT)
            .key(self.key(job))
            .arg(token.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| cache_error("Failed to release job lock", e))?;

        if released == 0 {
            tracing::debug!(job = job, "job lock already expired or taken over");
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedisJobLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisJobLock")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
