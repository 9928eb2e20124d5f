//! Test content sources: mock `ContentSource` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use branchwise_core::error::DomainError;
use branchwise_core::ports::ContentSource;

/// A content source backed by an in-memory map of path to document text.
/// Records every path it was asked for.
#[derive(Debug, Default)]
pub struct StaticContentSource {
    documents: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl StaticContentSource {
    /// Creates an empty source; every fetch fails until documents are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document, serializing `document` as JSON.
    #[must_use]
    pub fn with_json(mut self, path: &str, document: &serde_json::Value) -> Self {
        self.documents.insert(path.to_owned(), document.to_string());
        self
    }

    /// Adds a document verbatim.
    #[must_use]
    pub fn with_text(mut self, path: &str, text: &str) -> Self {
        self.documents.insert(path.to_owned(), text.to_owned());
        self
    }

    /// Returns every path passed to `fetch`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fetched_paths(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn fetch(&self, path: &str) -> Result<String, DomainError> {
        self.fetched.lock().unwrap().push(path.to_owned());
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::ContentUnavailable(format!("{path}: not found")))
    }
}

/// A content source that always fails. Useful for testing fallbacks.
#[derive(Debug)]
pub struct FailingContentSource;

#[async_trait]
impl ContentSource for FailingContentSource {
    async fn fetch(&self, path: &str) -> Result<String, DomainError> {
        Err(DomainError::ContentUnavailable(format!(
            "{path}: connection refused"
        )))
    }
}
