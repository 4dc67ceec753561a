//! Message envelope for topic deliveries.
//!
//! Ingress consumers receive raw payloads from a topic. The transport wraps
//! each payload in an [`EventEnvelope`] so handlers see one shape regardless
//! of where the message came from.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::Timestamp;

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport envelope for topic messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique ID for this delivery.
    pub event_id: EventId,

    /// Topic the message arrived on; used for routing.
    pub event_type: String,

    /// When the transport received the message.
    pub occurred_at: Timestamp,

    /// Message body as JSON.
    pub payload: JsonValue,
}

impl EventEnvelope {
    /// Creates a new envelope for a decoded JSON payload.
    pub fn new(event_type: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    /// Creates an envelope from raw bytes off the wire.
    ///
    /// Bodies that are not valid JSON are kept as a JSON string so the
    /// handler can report them instead of the transport dropping them.
    pub fn from_raw(event_type: impl Into<String>, raw: &str) -> Self {
        let payload = serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()));
        Self::new(event_type, payload)
    }

    /// Deserialize payload to a specific message type.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        tag: String,
    }

    #[test]
    fn event_id_generates_unique_values() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn from_raw_parses_json_body() {
        let envelope = EventEnvelope::from_raw("topic-a", r#"{"tag":"concert"}"#);
        assert_eq!(envelope.event_type, "topic-a");
        assert_eq!(
            envelope.payload_as::<Probe>().unwrap(),
            Probe { tag: "concert".to_string() }
        );
    }

    #[test]
    fn from_raw_keeps_garbage_as_string() {
        let envelope = EventEnvelope::from_raw("topic-a", "not json");
        assert_eq!(envelope.payload, json!("not json"));
        assert!(envelope.payload_as::<Probe>().is_err());
    }
}
