//! In-memory adapters for tests and local runs.

mod inventory_store;

pub use inventory_store::InMemoryInventoryStore;
