//! Adapters - Implementations of port interfaces and ingress.
//!
//! Outbound (ports):
//! - `postgres` - PostgreSQL inventory store
//! - `memory` - In-memory inventory store for tests and local runs
//! - `lock` - Job locks (in-memory, Redis)
//! - `events` - Topic delivery (in-memory bus, Redis pub/sub)
//!
//! Inbound:
//! - `http` - Axum routes
//! - `scheduler` - Periodic expiry sweeps
//! - `consumers` - Topic message handlers

pub mod consumers;
pub mod events;
pub mod http;
pub mod lock;
pub mod memory;
pub mod postgres;
pub mod scheduler;

pub use consumers::{register_consumers, CreateBankTicketConsumer, OnlineBankTicketConsumer};
pub use events::{InMemoryEventBus, RedisEventSubscriber};
pub use http::{worker_router, WorkerAppState};
pub use lock::{InMemoryJobLock, RedisJobLock};
pub use memory::InMemoryInventoryStore;
pub use postgres::{PostgresInventoryReader, PostgresInventoryRepository};
pub use scheduler::{SweepOutcome, SweepScheduler, SweepSchedulerConfig};
