//! Test stores: mock `KeyValueStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use branchwise_core::error::DomainError;
use branchwise_core::ports::KeyValueStore;

/// An in-memory store that records every write.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
    writes: Mutex<Vec<(String, serde_json::Value)>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: serde_json::Value) -> Self {
        let store = Self::new();
        store.values.lock().unwrap().insert(key.to_owned(), value);
        store
    }

    /// Returns the current value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Returns every `(key, value)` written, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(String, serde_json::Value)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), DomainError> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.clone()));
        self.values.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }
}

/// A store that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn put(&self, _key: &str, _value: serde_json::Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }
}

/// A store whose reads succeed (empty) but whose writes fail, like a full
/// quota. Useful for testing that a failed save does not block a transition.
#[derive(Debug)]
pub struct WriteFailingStore;

#[async_trait]
impl KeyValueStore for WriteFailingStore {
    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: serde_json::Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("quota exceeded".into()))
    }
}
