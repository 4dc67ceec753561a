//! Ticket worker server
//!
//! - Connects the PostgreSQL inventory store (running migrations if enabled)
//! - Connects Redis for job locks and topic delivery
//! - Serves the manual allocation endpoint
//! - Runs the expiry sweep schedule and the topic consumers
//!
//! Configuration comes from `TICKET_WORKER__*` environment variables.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use http::HeaderName;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ticket_worker::adapters::{
    register_consumers, worker_router, CreateBankTicketConsumer, OnlineBankTicketConsumer,
    PostgresInventoryReader, PostgresInventoryRepository, RedisEventSubscriber, RedisJobLock,
    SweepScheduler, SweepSchedulerConfig, WorkerAppState,
};
use ticket_worker::application::{
    CreateBankTicketHandler, CreateOnlineBankTicketHandler, ExpireBankTicketsHandler,
    ExpirePaymentsHandler,
};
use ticket_worker::config::{AppConfig, ServerConfig};
use ticket_worker::ports::{InventoryReader, InventoryRepository, JobLock};

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let json = server.log_json.then(|| tracing_subscriber::fmt::layer().json());
    let plain = (!server.log_json).then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    tracing::info!(
        environment = ?config.server.environment,
        "starting ticket worker"
    );

    // Inventory store
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }
    let reader: Arc<dyn InventoryReader> = Arc::new(PostgresInventoryReader::new(pool.clone()));
    let repository: Arc<dyn InventoryRepository> =
        Arc::new(PostgresInventoryRepository::new(pool.clone()));

    // Redis
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = tokio::time::timeout(
        config.redis.timeout(),
        redis_client.get_multiplexed_tokio_connection(),
    )
    .await??;
    let job_lock: Arc<dyn JobLock> =
        Arc::new(RedisJobLock::new(redis_conn, config.redis.lock_prefix.clone()));

    // Core handlers
    let max_attempts = config.worker.allocation_max_attempts;
    let policy = config.worker.sweep_policy();
    let create_bank_ticket = Arc::new(CreateBankTicketHandler::new(
        reader.clone(),
        repository.clone(),
        max_attempts,
    ));
    let create_online_bank_ticket = Arc::new(CreateOnlineBankTicketHandler::new(
        reader.clone(),
        repository.clone(),
        max_attempts,
    ));
    let expire_payments = Arc::new(ExpirePaymentsHandler::new(
        reader.clone(),
        repository.clone(),
        policy,
    ));
    let expire_bank_tickets = Arc::new(ExpireBankTicketsHandler::new(
        reader.clone(),
        repository.clone(),
        policy,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut background = Vec::new();

    if config.worker.scheduler_enabled {
        let scheduler = SweepScheduler::new(
            expire_payments,
            expire_bank_tickets,
            job_lock,
            SweepSchedulerConfig::from(&config.worker),
        );
        let rx = shutdown_rx.clone();
        background.push(tokio::spawn(async move { scheduler.run(rx).await }));
    }

    if config.consumer.enabled {
        let subscriber = RedisEventSubscriber::new(redis_client);
        register_consumers(
            &subscriber,
            &config.consumer,
            Arc::new(CreateBankTicketConsumer::new(create_bank_ticket.clone())),
            Arc::new(OnlineBankTicketConsumer::new(create_online_bank_ticket)),
        );
        let rx = shutdown_rx.clone();
        background.push(tokio::spawn(async move {
            if let Err(e) = subscriber.run(rx).await {
                tracing::error!(error = %e, "topic subscriber stopped");
            }
        }));
    }

    // HTTP
    let request_id = HeaderName::from_static("x-request-id");
    let app = worker_router()
        .with_state(WorkerAppState::new(create_bank_ticket))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    for task in background {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "background task ended abnormally");
        }
    }
    pool.close().await;

    Ok(())
}
