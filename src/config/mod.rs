//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `TICKET_WORKER`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use ticket_worker::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod consumer;
mod database;
mod error;
mod redis;
mod server;
mod worker;

pub use consumer::ConsumerConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use worker::WorkerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL inventory store
    pub database: DatabaseConfig,

    /// Redis for job locks and topic delivery
    pub redis: RedisConfig,

    /// Sweep schedule and allocation policy
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Consumed topics
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `TICKET_WORKER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `TICKET_WORKER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TICKET_WORKER__WORKER__SWEEP_PAGE_SIZE=50` -> `worker.sweep_page_size = 50`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TICKET_WORKER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.worker.validate()?;
        self.consumer.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
