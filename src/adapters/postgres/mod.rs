//! PostgreSQL adapters for the inventory store.
//!
//! Tables and indexes live in `migrations/`.

mod inventory_reader;
mod inventory_repository;
mod rows;

pub use inventory_reader::PostgresInventoryReader;
pub use inventory_repository::PostgresInventoryRepository;
