//! Directory-backed implementation of the `ContentSource` port.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use branchwise_core::error::DomainError;
use branchwise_core::ports::ContentSource;

/// Serves documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    root: PathBuf,
}

impl FileContentSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves `path` under the root, refusing anything that could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(DomainError::ContentUnavailable(format!(
                "{path}: path is outside the content directory"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn fetch(&self, path: &str) -> Result<String, DomainError> {
        let full_path = self.resolve(path)?;
        debug!(path = %full_path.display(), "reading content document");
        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| DomainError::ContentUnavailable(format!("{path}: {e}")))
    }
}
