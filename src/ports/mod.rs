//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the worker core and the outside world. Adapters implement these ports.
//!
//! ## Inventory Ports
//!
//! - `InventoryReader` - Query side over ticket details, seats, payments, configs
//! - `InventoryRepository` - Atomic units of work that mutate inventory
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for putting messages on a topic
//! - `EventSubscriber` - Port for subscribing to topics
//! - `EventHandler` - Handler that processes incoming messages
//!
//! ## Scheduling
//!
//! - `JobLock` - Named expiring lock so overlapping sweep runs are skipped

mod event_publisher;
mod event_subscriber;
mod inventory_reader;
mod inventory_repository;
mod job_lock;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use inventory_reader::InventoryReader;
pub use inventory_repository::{HoldRelease, HoldSource, InventoryRepository, ProvisionOnlineCountry};
pub use job_lock::{JobLock, LockToken};
