//! Redis pub/sub delivery for topic consumers.
//!
//! Handlers register per topic through [`EventSubscriber`]; [`run`] then
//! subscribes to every registered topic and dispatches each message until
//! the shutdown signal flips.
//!
//! [`run`]: RedisEventSubscriber::run

use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventSubscriber};

pub struct RedisEventSubscriber {
    client: redis::Client,
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

fn cache_error(context: &str, err: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("{}: {}", context, err))
}

impl RedisEventSubscriber {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        topics.sort();
        topics
    }

    /// Hand one raw message to the topic's handlers.
    ///
    /// Handler failures are logged, not returned; a bad message must not
    /// stop delivery of the ones behind it.
    pub async fn deliver(&self, topic: &str, raw: &str) -> usize {
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .cloned()
            .unwrap_or_default();

        let envelope = EventEnvelope::from_raw(topic, raw);
        let mut handled = 0;
        for handler in handlers {
            match handler.handle(envelope.clone()).await {
                Ok(()) => handled += 1,
                Err(e) => tracing::error!(
                    topic = topic,
                    handler = handler.name(),
                    event_id = %envelope.event_id,
                    error = %e,
                    "topic handler failed"
                ),
            }
        }
        handled
    }

    /// Consume messages until `shutdown` is set to `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let topics = self.topics();
        if topics.is_empty() {
            tracing::warn!("no topic handlers registered, subscriber idle");
            return Ok(());
        }

        #[allow(deprecated)]
        let conn = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| cache_error("Failed to connect for pub/sub", e))?;
        let mut pubsub = conn.into_pubsub();
        for topic in &topics {
            pubsub
                .subscribe(topic)
                .await
                .map_err(|e| cache_error("Failed to subscribe", e))?;
        }
        tracing::info!(topics = ?topics, "subscribed to topics");

        let mut messages = pubsub.on_message();
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("topic subscriber stopping");
                        return Ok(());
                    }
                }
                next = messages.next() => {
                    let Some(msg) = next else {
                        return Err(DomainError::new(
                            ErrorCode::CacheError,
                            "pub/sub connection closed",
                        ));
                    };
                    let topic = msg.get_channel_name().to_string();
                    match msg.get_payload::<String>() {
                        Ok(raw) => {
                            self.deliver(&topic, &raw).await;
                        }
                        Err(e) => tracing::warn!(
                            topic = %topic,
                            error = %e,
                            "dropping message with unreadable payload"
                        ),
                    }
                }
            }
        }
    }
}

impl EventSubscriber for RedisEventSubscriber {
    fn subscribe(&self, topic: &str, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic.to_string())
            .or_default()
            .push(handler);
    }

    fn subscribe_all(&self, topics: &[&str], handler: Arc<dyn EventHandler>) {
        for topic in topics {
            self.subscribe(topic, Arc::clone(&handler));
        }
    }
}

impl std::fmt::Debug for RedisEventSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventSubscriber")
            .field("topics", &self.topics())
            .finish_non_exhaustive()
    }
}
