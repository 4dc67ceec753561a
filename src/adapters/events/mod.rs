//! Topic delivery adapters.
//!
//! - `InMemoryEventBus` - in-process bus for tests
//! - `RedisEventSubscriber` - Redis pub/sub delivery for the binary

mod in_memory;
mod redis_subscriber;

pub use in_memory::InMemoryEventBus;
pub use redis_subscriber::RedisEventSubscriber;
