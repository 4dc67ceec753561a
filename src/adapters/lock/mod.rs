//! Job lock adapters.
//!
//! - `InMemoryJobLock` - single process, tests
//! - `RedisJobLock` - shared across replicas

mod in_memory;
mod redis_lock;

pub use in_memory::InMemoryJobLock;
pub use redis_lock::RedisJobLock;
