//! Graph loader: fetches scenario documents and validates them before they
//! can become active.

use std::sync::Arc;

use branchwise_core::error::DomainError;
use branchwise_core::ports::ContentSource;
use tracing::{debug, warn};

use crate::domain::graph::ScenarioGraph;
use crate::domain::index::ScenarioIndex;
use crate::domain::validation::parse_scenario;

/// Path of the scenario catalogue relative to the content root.
pub const INDEX_PATH: &str = "index.json";

/// Loads scenario graphs and the catalogue from a `ContentSource`.
///
/// The loader holds no state of its own; concurrent loads are independent.
#[derive(Clone)]
pub struct GraphLoader {
    source: Arc<dyn ContentSource>,
}

impl std::fmt::Debug for GraphLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphLoader").finish_non_exhaustive()
    }
}

/// Maps a scenario identifier to its document path: `foo` to `foo.json`,
/// while names already ending in `.json` are used as-is.
#[must_use]
pub fn document_path(identifier: &str) -> String {
    if identifier.ends_with(".json") {
        identifier.to_owned()
    } else {
        format!("{identifier}.json")
    }
}

impl GraphLoader {
    /// Creates a loader over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Fetches and validates the scenario `identifier`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentUnavailable` if the document cannot be
    /// fetched or is not JSON, and `DomainError::InvalidGraph` if structural
    /// validation fails.
    pub async fn load(&self, identifier: &str) -> Result<Arc<ScenarioGraph>, DomainError> {
        let path = document_path(identifier);
        let text = self.source.fetch(&path).await?;
        let graph = parse_scenario(identifier, &text)?;
        debug!(
            scenario_id = %graph.id,
            nodes = graph.node_count(),
            "scenario graph validated"
        );
        Ok(Arc::new(graph))
    }

    /// Fetches the scenario catalogue, falling back to the built-in minimal
    /// catalogue if it cannot be fetched or parsed.
    pub async fn load_index(&self) -> ScenarioIndex {
        match self.try_load_index().await {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "scenario index unavailable; using built-in fallback");
                ScenarioIndex::fallback()
            }
        }
    }

    async fn try_load_index(&self) -> Result<ScenarioIndex, DomainError> {
        let text = self.source.fetch(INDEX_PATH).await?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::ContentUnavailable(format!("{INDEX_PATH}: {e}")))
    }
}
