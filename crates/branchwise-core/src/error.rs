//! Domain error types.

use thiserror::Error;

/// Every failure the scenario engine reports to its callers.
///
/// Failures are local: an operation that returns one of these leaves the
/// traversal state exactly as it was before the call.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The content source could not be fetched or parsed.
    #[error("content unavailable: {0}")]
    ContentUnavailable(String),

    /// A scenario failed structural validation and was rejected in full.
    #[error("invalid scenario graph '{scenario_id}': {}", violations.join("; "))]
    InvalidGraph {
        /// Identifier the graph was requested under.
        scenario_id: String,
        /// Every violation detected by the failing validation step.
        violations: Vec<String>,
    },

    /// The choice id does not exist on the current node.
    #[error("unknown choice '{choice_id}' on node '{node_id}'")]
    UnknownChoice {
        /// Node the choice was attempted from.
        node_id: String,
        /// The rejected choice id.
        choice_id: String,
    },

    /// The choice exists on the current node but its requirements are unmet.
    #[error("choice '{choice_id}' on node '{node_id}' is not available")]
    ChoiceNotAvailable {
        /// Node the choice was attempted from.
        node_id: String,
        /// The gated-out choice id.
        choice_id: String,
    },

    /// Go-back was requested at the initial position.
    #[error("no history to go back through")]
    NoHistory,

    /// A navigation operation was invoked before any scenario was loaded.
    #[error("no scenario is active")]
    NoActiveScenario,

    /// A persistence or publication error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_graph_message_lists_all_violations() {
        let err = DomainError::InvalidGraph {
            scenario_id: "feedback".to_owned(),
            violations: vec![
                "node 'a' choice 'x' targets missing node 'zz'".to_owned(),
                "node 'b' choice 'y' targets missing node 'qq'".to_owned(),
            ],
        };

        assert_eq!(
            err.to_string(),
            "invalid scenario graph 'feedback': node 'a' choice 'x' targets missing node 'zz'; \
             node 'b' choice 'y' targets missing node 'qq'"
        );
    }

    #[test]
    fn test_unknown_choice_message_names_node_and_choice() {
        let err = DomainError::UnknownChoice {
            node_id: "start".to_owned(),
            choice_id: "nope".to_owned(),
        };

        assert_eq!(err.to_string(), "unknown choice 'nope' on node 'start'");
    }
}
