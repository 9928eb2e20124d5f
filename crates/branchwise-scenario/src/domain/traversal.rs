//! Traversal state and its persisted snapshot.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::graph::{START_NODE_ID, ScenarioGraph, Strategy};

/// One recorded transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The node the choice was made from.
    pub node_id: String,
    pub choice_id: String,
    pub choice_text: String,
    pub strategy: Strategy,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Position and path of one session through one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalState {
    pub(crate) current_node_id: String,
    pub(crate) history: Vec<HistoryEntry>,
}

impl TraversalState {
    /// The state every session begins in.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            current_node_id: START_NODE_ID.to_owned(),
            history: Vec::new(),
        }
    }

    /// The node the session is at.
    #[must_use]
    pub fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    /// Choices made so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

/// The persisted unit of progress: which scenario, where, and how we got
/// there. Stored as the `userProgress` part of the progress document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalSnapshot {
    #[serde(rename = "currentScenario")]
    pub scenario_id: String,
    #[serde(rename = "currentNode")]
    pub current_node_id: String,
    #[serde(rename = "choiceHistory", default)]
    pub history: Vec<HistoryEntry>,
}

impl TraversalSnapshot {
    /// Checks that replaying the snapshot's history from `start` through
    /// `graph` lands on its current node. Each recorded choice must still be
    /// available given the choices recorded before it.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistency found.
    pub fn check_against(&self, graph: &ScenarioGraph) -> Result<(), String> {
        if !graph.contains_node(&self.current_node_id) {
            return Err(format!(
                "current node '{}' no longer exists",
                self.current_node_id
            ));
        }

        let mut expected_node = START_NODE_ID;
        let mut made = HashSet::new();
        for (index, entry) in self.history.iter().enumerate() {
            if entry.node_id != expected_node {
                return Err(format!(
                    "history entry {index} starts at '{}' but the path is at '{expected_node}'",
                    entry.node_id
                ));
            }
            let node = graph
                .node(&entry.node_id)
                .ok_or_else(|| format!("history node '{}' no longer exists", entry.node_id))?;
            let choice = node.choice(&entry.choice_id).ok_or_else(|| {
                format!(
                    "choice '{}' no longer exists on node '{}'",
                    entry.choice_id, entry.node_id
                )
            })?;
            expected_node = choice
                .next_node
                .as_deref()
                .filter(|_| choice.is_available(&made))
                .ok_or_else(|| {
                    format!(
                        "choice '{}' on node '{}' is no longer available at history entry {index}",
                        entry.choice_id, entry.node_id
                    )
                })?;
            made.insert(entry.choice_id.as_str());
        }

        if expected_node == self.current_node_id {
            Ok(())
        } else {
            Err(format!(
                "history leads to '{expected_node}' but the snapshot is at '{}'",
                self.current_node_id
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::parse_scenario;
    use serde_json::json;

    fn graph() -> ScenarioGraph {
        let document = json!({
            "id": "s",
            "metadata": {},
            "nodes": {
                "start": { "type": "scene", "choices": [
                    { "id": "a", "text": "A", "strategy": "collaborating", "nextNode": "middle" }
                ]},
                "middle": { "type": "scene", "choices": [
                    { "id": "b", "text": "B", "strategy": "avoiding", "nextNode": "end" }
                ]},
                "end": { "type": "resolution" }
            }
        });
        parse_scenario("s", &document.to_string()).unwrap()
    }

    fn entry(node_id: &str, choice_id: &str) -> HistoryEntry {
        HistoryEntry {
            node_id: node_id.to_owned(),
            choice_id: choice_id.to_owned(),
            choice_text: choice_id.to_uppercase(),
            strategy: Strategy::Collaborating,
            timestamp: 0,
        }
    }

    fn snapshot(current: &str, history: Vec<HistoryEntry>) -> TraversalSnapshot {
        TraversalSnapshot {
            scenario_id: "s".to_owned(),
            current_node_id: current.to_owned(),
            history,
        }
    }

    #[test]
    fn test_snapshot_serializes_to_user_progress_layout() {
        let value = serde_json::to_value(snapshot("middle", vec![entry("start", "a")])).unwrap();

        assert_eq!(
            value,
            json!({
                "currentScenario": "s",
                "currentNode": "middle",
                "choiceHistory": [{
                    "nodeId": "start",
                    "choiceId": "a",
                    "choiceText": "A",
                    "strategy": "collaborating",
                    "timestamp": 0
                }]
            })
        );
    }

    #[test]
    fn test_consistent_snapshot_passes() {
        let snapshot = snapshot("end", vec![entry("start", "a"), entry("middle", "b")]);

        assert!(snapshot.check_against(&graph()).is_ok());
    }

    #[test]
    fn test_snapshot_at_missing_node_is_stale() {
        let err = snapshot("epilogue", Vec::new())
            .check_against(&graph())
            .unwrap_err();

        assert_eq!(err, "current node 'epilogue' no longer exists");
    }

    #[test]
    fn test_snapshot_with_removed_choice_is_stale() {
        let err = snapshot("middle", vec![entry("start", "z")])
            .check_against(&graph())
            .unwrap_err();

        assert_eq!(err, "choice 'z' no longer exists on node 'start'");
    }

    #[test]
    fn test_snapshot_taking_a_now_gated_choice_is_stale() {
        // Arrange
        let document = json!({
            "id": "s",
            "metadata": {},
            "nodes": {
                "start": { "type": "scene", "choices": [
                    { "id": "a", "text": "A", "strategy": "collaborating", "nextNode": "middle",
                      "requirements": { "previousChoices": ["tutorial"] } }
                ]},
                "middle": { "type": "resolution" }
            }
        });
        let gated = parse_scenario("s", &document.to_string()).unwrap();

        // Act
        let err = snapshot("middle", vec![entry("start", "a")])
            .check_against(&gated)
            .unwrap_err();

        // Assert
        assert_eq!(
            err,
            "choice 'a' on node 'start' is no longer available at history entry 0"
        );
    }

    #[test]
    fn test_snapshot_whose_history_does_not_reach_current_is_stale() {
        let err = snapshot("end", vec![entry("start", "a")])
            .check_against(&graph())
            .unwrap_err();

        assert_eq!(err, "history leads to 'middle' but the snapshot is at 'end'");
    }
}
