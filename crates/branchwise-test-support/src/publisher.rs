//! Test publishers: mock `EventPublisher` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use branchwise_core::error::DomainError;
use branchwise_core::event::EventEnvelope;
use branchwise_core::ports::EventPublisher;

/// A publisher that records every event it receives.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<EventEnvelope>>,
}

impl RecordingPublisher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all published events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<EventEnvelope> {
        self.published.lock().unwrap().clone()
    }

    /// Returns the event types published so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn event_types(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.metadata.event_type.clone())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &EventEnvelope) -> Result<(), DomainError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A publisher that rejects every event.
#[derive(Debug)]
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: &EventEnvelope) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("statistics collector offline".into()))
    }
}
