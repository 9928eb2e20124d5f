//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name used by observers to route the payload.
    pub event_type: String,
    /// Scenario the event was produced in.
    pub scenario_id: String,
    /// Monotonically increasing position within the navigator's lifetime.
    pub sequence_number: i64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// Flattens the event into the envelope handed to publishers.
    fn to_envelope(&self) -> EventEnvelope {
        EventEnvelope {
            metadata: self.metadata().clone(),
            payload: self.to_payload(),
        }
    }
}

/// Serialized form of a domain event as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Shorthand for `self.metadata.event_type`.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.metadata.event_type
    }
}
