//! Single-file JSON implementation of the `KeyValueStore` port.
//!
//! The whole store is one JSON object. Writes go to a sibling temporary
//! file which is then renamed over the original, so an interrupted write
//! leaves the previous contents intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use branchwise_core::error::DomainError;
use branchwise_core::ports::KeyValueStore;

/// Key-value store persisted as a JSON object in one file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn infrastructure(&self, detail: impl std::fmt::Display) -> DomainError {
        DomainError::Infrastructure(format!("{}: {detail}", self.path.display()))
    }

    async fn read_all(&self) -> Result<Map<String, Value>, DomainError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.infrastructure(e)),
        };
        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(self.infrastructure("store file is not a JSON object")),
            Err(e) => Err(self.infrastructure(e)),
        }
    }

    async fn write_all(&self, map: Map<String, Value>) -> Result<(), DomainError> {
        let text = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| self.infrastructure(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.infrastructure(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|e| self.infrastructure(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.infrastructure(e))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_all().await?;
        map.insert(key.to_owned(), value);
        self.write_all(map).await?;
        debug!(key, path = %self.path.display(), "store entry written");
        Ok(())
    }
}
