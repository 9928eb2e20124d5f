//! The scenario navigator: owns the active session and wires every
//! transition to persistence and statistics.
//!
//! The navigator is single-writer. Each mutating operation runs to
//! completion before the next one is accepted, so observers never see a
//! partial transition. After every successful transition the new snapshot
//! is persisted and the produced events are published; neither side effect
//! can fail the transition itself.

use std::sync::Arc;

use branchwise_core::clock::Clock;
use branchwise_core::error::DomainError;
use branchwise_core::event::DomainEvent;
use branchwise_core::ports::EventPublisher;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::loader::GraphLoader;
use crate::application::progress_store::ProgressStore;
use crate::domain::events::ScenarioEvent;
use crate::domain::graph::{Choice, Node};
use crate::domain::session::ScenarioSession;
use crate::domain::traversal::{HistoryEntry, TraversalSnapshot};

/// Whether the snapshot of a transition reached the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SaveStatus {
    Saved,
    /// The in-memory state is still authoritative for this session.
    Failed(String),
}

impl SaveStatus {
    /// Returns `true` if the snapshot was saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Id of the node now current.
    pub node_id: String,
    /// The node now current.
    pub node: Node,
    pub save: SaveStatus,
}

/// Result of resuming from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// The snapshot was adopted as-is.
    Resumed,
    /// The snapshot no longer matched the graph; a fresh session was started.
    Restarted { reason: String },
}

/// Navigates one scenario at a time on behalf of one user.
pub struct Navigator {
    loader: GraphLoader,
    progress: ProgressStore,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    session: Option<ScenarioSession>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("loader", &self.loader)
            .field("progress", &self.progress)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Creates a navigator with no active scenario.
    #[must_use]
    pub fn new(
        loader: GraphLoader,
        progress: ProgressStore,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loader,
            progress,
            publisher,
            clock,
            session: None,
        }
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&ScenarioSession> {
        self.session.as_ref()
    }

    /// The active session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn active(&self) -> Result<&ScenarioSession, DomainError> {
        self.session.as_ref().ok_or(DomainError::NoActiveScenario)
    }

    /// The current node.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn current_node(&self) -> Result<&Node, DomainError> {
        Ok(self.active()?.current_node())
    }

    /// Choices currently offered, in authoring order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn available_choices(&self) -> Result<Vec<&Choice>, DomainError> {
        Ok(self.active()?.available_choices())
    }

    /// Approximate completion percentage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn progress(&self) -> Result<f64, DomainError> {
        Ok(self.active()?.progress())
    }

    /// Whether the current node is terminal.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn is_complete(&self) -> Result<bool, DomainError> {
        Ok(self.active()?.is_complete())
    }

    /// Whether `go_back` would succeed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn can_go_back(&self) -> Result<bool, DomainError> {
        Ok(self.active()?.can_go_back())
    }

    /// A copy of the history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, DomainError> {
        Ok(self.active()?.history().to_vec())
    }

    /// Loads `identifier` and starts it from the beginning, discarding any
    /// previously active session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentUnavailable` or `DomainError::InvalidGraph`
    /// if the graph fails to load; the previous session stays active.
    pub async fn load_scenario(&mut self, identifier: &str) -> Result<Transition, DomainError> {
        let graph = self.loader.load(identifier).await?;
        info!(scenario_id = identifier, title = graph.title(), "scenario loaded");
        let session =
            ScenarioSession::start(identifier, graph).continuing_from(self.last_sequence());
        self.session = Some(session);
        self.commit().await
    }

    /// Loads the snapshot's scenario and continues where it left off.
    ///
    /// A snapshot that no longer matches the graph is not trusted: the
    /// scenario starts over and the outcome says why.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentUnavailable` or `DomainError::InvalidGraph`
    /// if the graph fails to load.
    pub async fn resume_from(
        &mut self,
        snapshot: TraversalSnapshot,
    ) -> Result<ResumeOutcome, DomainError> {
        let graph = self.loader.load(&snapshot.scenario_id).await?;
        let scenario_id = snapshot.scenario_id.clone();
        let last_sequence = self.last_sequence();

        match ScenarioSession::restore(Arc::clone(&graph), snapshot) {
            Ok(session) => {
                let session = session.continuing_from(last_sequence);
                info!(
                    scenario_id = %session.scenario_id(),
                    node_id = %session.current_node_id(),
                    history_len = session.history().len(),
                    "scenario resumed"
                );
                self.session = Some(session);
                Ok(ResumeOutcome::Resumed)
            }
            Err(reason) => {
                warn!(%scenario_id, %reason, "saved progress is stale; starting over");
                self.session =
                    Some(ScenarioSession::start(scenario_id, graph).continuing_from(last_sequence));
                self.commit().await?;
                Ok(ResumeOutcome::Restarted { reason })
            }
        }
    }

    /// Resumes from the persisted snapshot, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read, and
    /// any error of [`Navigator::resume_from`].
    pub async fn resume_saved(&mut self) -> Result<Option<ResumeOutcome>, DomainError> {
        let Some(snapshot) = self.saved_snapshot().await? else {
            return Ok(None);
        };
        self.resume_from(snapshot).await.map(Some)
    }

    /// The persisted snapshot, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    pub async fn saved_snapshot(&self) -> Result<Option<TraversalSnapshot>, DomainError> {
        self.progress.load_user_progress().await
    }

    /// Forgets the persisted snapshot. The active session is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be updated.
    pub async fn clear_saved(&self) -> Result<(), DomainError> {
        self.progress.save_user_progress(None).await
    }

    /// Takes the choice `choice_id` from the current node.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownChoice` or `DomainError::ChoiceNotAvailable`
    /// for a rejected choice, and `DomainError::NoActiveScenario` before the
    /// first load. The state is unchanged on error.
    pub async fn advance(&mut self, choice_id: &str) -> Result<Transition, DomainError> {
        let session = self.session.as_mut().ok_or(DomainError::NoActiveScenario)?;
        session.advance(choice_id, self.clock.as_ref())?;
        debug!(
            scenario_id = %session.scenario_id(),
            choice_id,
            node_id = %session.current_node_id(),
            "advanced"
        );
        self.commit().await
    }

    /// Undoes the most recent choice.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoHistory` at the initial position and
    /// `DomainError::NoActiveScenario` before the first load.
    pub async fn go_back(&mut self) -> Result<Transition, DomainError> {
        let session = self.session.as_mut().ok_or(DomainError::NoActiveScenario)?;
        session.go_back(self.clock.as_ref())?;
        debug!(
            scenario_id = %session.scenario_id(),
            node_id = %session.current_node_id(),
            "went back"
        );
        self.commit().await
    }

    /// Goes back until the history holds `target_len` entries, or until the
    /// start node is reached. Never fails for an out-of-range target.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub async fn go_back_to(&mut self, target_len: usize) -> Result<Transition, DomainError> {
        let session = self.session.as_mut().ok_or(DomainError::NoActiveScenario)?;
        let steps = session.go_back_to(target_len, self.clock.as_ref());
        debug!(
            scenario_id = %session.scenario_id(),
            target_len,
            steps,
            "went back to history index"
        );
        self.commit().await
    }

    /// Returns to the start node with empty history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoActiveScenario` before the first load.
    pub async fn restart(&mut self) -> Result<Transition, DomainError> {
        let session = self.session.as_mut().ok_or(DomainError::NoActiveScenario)?;
        session.restart(self.clock.as_ref());
        info!(scenario_id = %session.scenario_id(), "scenario restarted");
        self.commit().await
    }

    /// Sequence number of the last event produced by this navigator.
    fn last_sequence(&self) -> i64 {
        self.session
            .as_ref()
            .map_or(0, ScenarioSession::last_sequence)
    }

    /// Persists the active session and publishes its pending events.
    async fn commit(&mut self) -> Result<Transition, DomainError> {
        let session = self.session.as_mut().ok_or(DomainError::NoActiveScenario)?;
        let events = session.take_uncommitted_events();
        let snapshot = session.snapshot();
        let node_id = session.current_node_id().to_owned();
        let node = session.current_node().clone();

        let save = self.save(snapshot).await;
        self.publish(&events).await;

        Ok(Transition {
            node_id,
            node,
            save,
        })
    }

    async fn save(&self, snapshot: TraversalSnapshot) -> SaveStatus {
        match self.progress.save_user_progress(Some(&snapshot)).await {
            Ok(()) => SaveStatus::Saved,
            Err(err) => {
                warn!(error = %err, "failed to save progress");
                SaveStatus::Failed(err.to_string())
            }
        }
    }

    async fn publish(&self, events: &[ScenarioEvent]) {
        for event in events {
            if let Err(err) = self.publisher.publish(&event.to_envelope()).await {
                warn!(
                    event_type = event.event_type(),
                    error = %err,
                    "failed to publish event"
                );
            }
        }
    }
}
