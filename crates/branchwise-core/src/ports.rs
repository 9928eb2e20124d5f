//! Ports to the collaborators the engine talks to but does not own.
//!
//! Content fetch and persistence are the only asynchronous boundaries. Both
//! are single-shot: no cancellation, no timeout, no retry at this layer.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::EventEnvelope;

/// Source of raw scenario documents.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetches the raw text of the document stored under `path`
    /// (for example `index.json` or `workplace-conflict.json`).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentUnavailable` if the document cannot be read.
    async fn fetch(&self, path: &str) -> Result<String, DomainError>;
}

/// Key-value persistence capability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the write is not durable.
    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError>;
}

/// Observer notified after every completed transition.
///
/// Publication is fire-and-forget from the navigator's point of view: an
/// error is logged and otherwise ignored.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Delivers one event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if delivery fails.
    async fn publish(&self, event: &EventEnvelope) -> Result<(), DomainError>;
}
