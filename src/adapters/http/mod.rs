//! HTTP adapters - Axum routes and handlers.

pub mod worker;

pub use worker::{worker_router, WorkerAppState};
