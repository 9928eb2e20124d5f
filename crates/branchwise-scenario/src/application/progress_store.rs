//! Typed access to the progress document in the key-value store.

use std::sync::Arc;

use branchwise_core::error::DomainError;
use branchwise_core::ports::KeyValueStore;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::progress::ProgressDocument;
use crate::domain::traversal::TraversalSnapshot;

/// Store key the progress document lives under.
pub const PROGRESS_KEY: &str = "progress";

/// Field of the progress document holding the saved position.
pub const USER_PROGRESS_FIELD: &str = "userProgress";

/// Reads and writes the `ProgressDocument`.
#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore").finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Wraps a key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the document, or a default one if nothing is stored yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read or
    /// holds something that is not a progress document.
    pub async fn load(&self) -> Result<ProgressDocument, DomainError> {
        match self.store.get(PROGRESS_KEY).await? {
            None => Ok(ProgressDocument::default()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                DomainError::Infrastructure(format!("progress document is corrupt: {e}"))
            }),
        }
    }

    /// Replaces the stored document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the write fails.
    pub async fn save(&self, document: &ProgressDocument) -> Result<(), DomainError> {
        let value = serde_json::to_value(document).map_err(|e| {
            DomainError::Infrastructure(format!("progress serialization failed: {e}"))
        })?;
        self.store.put(PROGRESS_KEY, value).await
    }

    /// Loads, applies `change`, and saves.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the read or the write fails;
    /// a failed read writes nothing.
    pub async fn update<F>(&self, change: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut ProgressDocument) + Send,
    {
        let mut document = self.load().await?;
        change(&mut document);
        self.save(&document).await
    }

    /// Reads only the saved position. The rest of the document is not
    /// decoded, so a malformed field elsewhere does not hide it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read or
    /// the saved position itself is malformed.
    pub async fn load_user_progress(&self) -> Result<Option<TraversalSnapshot>, DomainError> {
        let Some(document) = self.store.get(PROGRESS_KEY).await? else {
            return Ok(None);
        };
        match document.get(USER_PROGRESS_FIELD) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => serde_json::from_value(raw.clone()).map(Some).map_err(|e| {
                DomainError::Infrastructure(format!("saved position is corrupt: {e}"))
            }),
        }
    }

    /// Replaces only the saved position, leaving every other field of the
    /// stored document as it is, valid or not. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the read or the write fails.
    pub async fn save_user_progress(
        &self,
        snapshot: Option<&TraversalSnapshot>,
    ) -> Result<(), DomainError> {
        let mut document = match self.store.get(PROGRESS_KEY).await? {
            Some(Value::Object(map)) => map,
            Some(_) => {
                warn!("stored progress document is not an object; starting a new one");
                Map::new()
            }
            None => Map::new(),
        };
        let value = serde_json::to_value(snapshot).map_err(|e| {
            DomainError::Infrastructure(format!("progress serialization failed: {e}"))
        })?;
        document.insert(USER_PROGRESS_FIELD.to_owned(), value);
        self.store.put(PROGRESS_KEY, Value::Object(document)).await
    }
}
