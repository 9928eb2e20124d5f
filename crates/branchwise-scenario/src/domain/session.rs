//! The traversal session: one active walk through one scenario graph.
//!
//! The session is the sole mutator of its `TraversalState`. Every mutating
//! operation either completes fully or leaves the state untouched, and
//! records the domain events it produced until the caller drains them.

use std::collections::HashSet;
use std::sync::Arc;

use branchwise_core::clock::Clock;
use branchwise_core::error::DomainError;
use branchwise_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    ChoiceMade, Restarted, ScenarioCompleted, ScenarioEvent, ScenarioEventKind, WentBack,
};
use super::graph::{Choice, Node, ScenarioGraph};
use super::traversal::{HistoryEntry, TraversalSnapshot, TraversalState};

/// Traversal state over a shared, immutable graph.
#[derive(Debug)]
pub struct ScenarioSession {
    /// Identifier the graph was loaded under; what a snapshot resumes from.
    scenario_id: String,
    graph: Arc<ScenarioGraph>,
    state: TraversalState,
    /// Sequence number of the last event produced.
    last_sequence: i64,
    /// Events produced since the last drain.
    uncommitted_events: Vec<ScenarioEvent>,
}

impl ScenarioSession {
    /// Starts a fresh session at the `start` node. `scenario_id` is the
    /// identifier the graph was loaded under, which need not equal the
    /// document's own `id`.
    #[must_use]
    pub fn start(scenario_id: impl Into<String>, graph: Arc<ScenarioGraph>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            graph,
            state: TraversalState::initial(),
            last_sequence: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Restores a session from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns a description of the inconsistency if the snapshot no longer
    /// matches the graph (for example after a content update).
    pub fn restore(
        graph: Arc<ScenarioGraph>,
        snapshot: TraversalSnapshot,
    ) -> Result<Self, String> {
        snapshot.check_against(&graph)?;
        Ok(Self {
            scenario_id: snapshot.scenario_id,
            graph,
            state: TraversalState {
                current_node_id: snapshot.current_node_id,
                history: snapshot.history,
            },
            last_sequence: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// Continues event numbering after `last_sequence`, so a navigator that
    /// replaces its session keeps sequence numbers increasing.
    #[must_use]
    pub fn continuing_from(mut self, last_sequence: i64) -> Self {
        self.last_sequence = last_sequence;
        self
    }

    /// Sequence number of the last event this session produced.
    #[must_use]
    pub fn last_sequence(&self) -> i64 {
        self.last_sequence
    }

    /// The graph being navigated.
    #[must_use]
    pub fn graph(&self) -> &ScenarioGraph {
        &self.graph
    }

    /// The identifier the scenario was loaded under.
    #[must_use]
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// The traversal state.
    #[must_use]
    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    /// Id of the current node.
    #[must_use]
    pub fn current_node_id(&self) -> &str {
        &self.state.current_node_id
    }

    /// The current node.
    ///
    /// # Panics
    ///
    /// Never: the current node id is always a node of the graph, since
    /// sessions start at the validated `start` node, only move along
    /// validated choice targets and only restore checked snapshots.
    #[must_use]
    pub fn current_node(&self) -> &Node {
        self.graph
            .node(&self.state.current_node_id)
            .expect("current node id is always a node of the graph")
    }

    /// Choices made so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    /// Returns `true` if there is a choice to undo.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.state.history.is_empty()
    }

    /// Returns `true` if the current node is terminal.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_node().is_terminal()
    }

    /// Set of choice ids made anywhere in the history.
    #[must_use]
    pub fn made_choice_ids(&self) -> HashSet<&str> {
        self.state
            .history
            .iter()
            .map(|entry| entry.choice_id.as_str())
            .collect()
    }

    /// The current node's choices whose requirements pass, in authoring
    /// order.
    #[must_use]
    pub fn available_choices(&self) -> Vec<&Choice> {
        let made = self.made_choice_ids();
        self.current_node()
            .choices
            .iter()
            .filter(|choice| choice.is_available(&made))
            .collect()
    }

    /// Approximate completion percentage for display.
    ///
    /// Computed as `(history length + 1) / node count`, capped at 100. Node
    /// count is not path length, so this is only a rough indicator: a short
    /// path through a large graph finishes well below 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        let visited = (self.state.history.len() + 1) as f64;
        let total = self.graph.node_count().max(1) as f64;
        (visited / total * 100.0).min(100.0)
    }

    /// Takes the choice `choice_id` from the current node.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownChoice` if the current node has no such
    /// choice, or `DomainError::ChoiceNotAvailable` if its requirements are
    /// not met. The state is unchanged in both cases.
    pub fn advance(&mut self, choice_id: &str, clock: &dyn Clock) -> Result<&Node, DomainError> {
        let from_node_id = self.state.current_node_id.clone();
        let node = self.current_node();

        let Some(choice) = node.choice(choice_id) else {
            return Err(DomainError::UnknownChoice {
                node_id: from_node_id,
                choice_id: choice_id.to_owned(),
            });
        };
        let next_node_id = match &choice.next_node {
            Some(target) if choice.is_available(&self.made_choice_ids()) => target.clone(),
            _ => {
                return Err(DomainError::ChoiceNotAvailable {
                    node_id: from_node_id,
                    choice_id: choice_id.to_owned(),
                });
            }
        };

        let strategy = choice.strategy.clone();
        let entry = HistoryEntry {
            node_id: from_node_id.clone(),
            choice_id: choice.id.clone(),
            choice_text: choice.text.clone(),
            strategy: strategy.clone(),
            timestamp: clock.now_millis(),
        };

        self.state.history.push(entry);
        self.state.current_node_id.clone_from(&next_node_id);

        let scenario_id = self.scenario_id.clone();
        self.record(
            ScenarioEventKind::ChoiceMade(ChoiceMade {
                scenario_id: scenario_id.clone(),
                node_id: from_node_id,
                choice_id: choice_id.to_owned(),
                strategy,
            }),
            clock,
        );
        if self.is_complete() {
            self.record(
                ScenarioEventKind::ScenarioCompleted(ScenarioCompleted {
                    scenario_id,
                    node_id: next_node_id,
                }),
                clock,
            );
        }

        Ok(self.current_node())
    }

    /// Undoes the most recent choice.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoHistory` at the initial position; the state is
    /// unchanged.
    pub fn go_back(&mut self, clock: &dyn Clock) -> Result<&Node, DomainError> {
        let entry = self.state.history.pop().ok_or(DomainError::NoHistory)?;
        let from_node_id =
            std::mem::replace(&mut self.state.current_node_id, entry.node_id.clone());

        self.record(
            ScenarioEventKind::WentBack(WentBack {
                scenario_id: self.scenario_id.clone(),
                from_node_id,
                to_node_id: entry.node_id,
            }),
            clock,
        );

        Ok(self.current_node())
    }

    /// Goes back repeatedly until the history holds `target_len` entries.
    ///
    /// Best effort: a target at or beyond the current length does nothing,
    /// and the walk stops at the start node. Returns the number of steps
    /// taken.
    pub fn go_back_to(&mut self, target_len: usize, clock: &dyn Clock) -> usize {
        let mut steps = 0;
        while self.state.history.len() > target_len && self.go_back(clock).is_ok() {
            steps += 1;
        }
        steps
    }

    /// Returns to `start` and clears the history.
    pub fn restart(&mut self, clock: &dyn Clock) {
        self.state = TraversalState::initial();
        self.record(
            ScenarioEventKind::Restarted(Restarted {
                scenario_id: self.scenario_id.clone(),
            }),
            clock,
        );
    }

    /// The persisted form of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TraversalSnapshot {
        TraversalSnapshot {
            scenario_id: self.scenario_id.clone(),
            current_node_id: self.state.current_node_id.clone(),
            history: self.state.history.clone(),
        }
    }

    /// Returns events produced since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[ScenarioEvent] {
        &self.uncommitted_events
    }

    /// Removes and returns events produced since the last drain.
    pub fn take_uncommitted_events(&mut self) -> Vec<ScenarioEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn record(&mut self, kind: ScenarioEventKind, clock: &dyn Clock) {
        self.last_sequence += 1;
        let event = ScenarioEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                scenario_id: self.scenario_id.clone(),
                sequence_number: self.last_sequence,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}
