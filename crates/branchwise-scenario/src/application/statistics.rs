//! Strategy-usage statistics collected from navigation events.

use async_trait::async_trait;
use branchwise_core::error::DomainError;
use branchwise_core::event::EventEnvelope;
use branchwise_core::ports::EventPublisher;
use tracing::debug;

use crate::application::progress_store::ProgressStore;
use crate::domain::events::ScenarioEventKind;

/// Folds choice and completion events into the `statistics` and
/// `completedScenarios` parts of the progress document.
#[derive(Debug, Clone)]
pub struct StrategyStatistics {
    progress: ProgressStore,
}

impl StrategyStatistics {
    /// Creates a collector writing through `progress`.
    #[must_use]
    pub fn new(progress: ProgressStore) -> Self {
        Self { progress }
    }
}

#[async_trait]
impl EventPublisher for StrategyStatistics {
    async fn publish(&self, event: &EventEnvelope) -> Result<(), DomainError> {
        let kind: ScenarioEventKind = serde_json::from_value(event.payload.clone())
            .map_err(|e| DomainError::Infrastructure(format!("unrecognised event payload: {e}")))?;

        match kind {
            ScenarioEventKind::ChoiceMade(payload) => {
                self.progress
                    .update(|document| document.record_choice(&payload.strategy))
                    .await
            }
            ScenarioEventKind::ScenarioCompleted(payload) => {
                self.progress
                    .update(|document| {
                        if document.mark_completed(&payload.scenario_id) {
                            debug!(scenario_id = %payload.scenario_id, "scenario completed for the first time");
                        }
                    })
                    .await
            }
            ScenarioEventKind::WentBack(_) | ScenarioEventKind::Restarted(_) => Ok(()),
        }
    }
}
