//! Structural validation of scenario documents.
//!
//! Validation runs in three steps, in order: required top-level fields,
//! presence of the start node, and resolution of every choice target. The
//! first failing step rejects the whole document; a graph is never
//! partially adopted.

use std::fmt;

use branchwise_core::error::DomainError;

use super::graph::{START_NODE_ID, ScenarioGraph};

/// Top-level fields every scenario document must carry.
const REQUIRED_FIELDS: [&str; 3] = ["id", "metadata", "nodes"];

/// A single structural defect found in a scenario document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphViolation {
    /// The document is not a JSON object.
    NotAnObject,
    /// A required top-level field is absent.
    MissingField(&'static str),
    /// The document has the right fields but the wrong shapes.
    Malformed(String),
    /// There is no node with id `start`.
    MissingStartNode,
    /// A choice points at a node that does not exist.
    DanglingChoice {
        node_id: String,
        choice_id: String,
        target: String,
    },
}

impl fmt::Display for GraphViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("document is not an object"),
            Self::MissingField(field) => write!(f, "missing required field '{field}'"),
            Self::Malformed(detail) => write!(f, "malformed scenario: {detail}"),
            Self::MissingStartNode => write!(f, "missing '{START_NODE_ID}' node"),
            Self::DanglingChoice {
                node_id,
                choice_id,
                target,
            } => write!(
                f,
                "node '{node_id}' choice '{choice_id}' targets missing node '{target}'"
            ),
        }
    }
}

fn invalid(scenario_id: &str, violations: &[GraphViolation]) -> DomainError {
    DomainError::InvalidGraph {
        scenario_id: scenario_id.to_owned(),
        violations: violations.iter().map(ToString::to_string).collect(),
    }
}

/// Checks that the raw document is an object carrying every required field.
///
/// # Errors
///
/// Returns every missing field, or `NotAnObject`.
pub fn check_required_fields(raw: &serde_json::Value) -> Result<(), Vec<GraphViolation>> {
    let Some(object) = raw.as_object() else {
        return Err(vec![GraphViolation::NotAnObject]);
    };

    let missing: Vec<GraphViolation> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| object.get(*field).is_none_or(serde_json::Value::is_null))
        .map(GraphViolation::MissingField)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Checks the start node and every choice target of a decoded graph.
///
/// # Errors
///
/// Returns `MissingStartNode` alone if the start node is absent, otherwise
/// every dangling choice in node-id order.
pub fn check_graph(graph: &ScenarioGraph) -> Result<(), Vec<GraphViolation>> {
    if !graph.contains_node(START_NODE_ID) {
        return Err(vec![GraphViolation::MissingStartNode]);
    }

    let dangling: Vec<GraphViolation> = graph
        .nodes
        .iter()
        .flat_map(|(node_id, node)| {
            node.choices
                .iter()
                .filter_map(move |choice| {
                    let target = choice.next_node.as_ref()?;
                    (!graph.contains_node(target)).then(|| GraphViolation::DanglingChoice {
                        node_id: node_id.clone(),
                        choice_id: choice.id.clone(),
                        target: target.clone(),
                    })
                })
        })
        .collect();

    if dangling.is_empty() {
        Ok(())
    } else {
        Err(dangling)
    }
}

/// Parses and validates a scenario document.
///
/// `scenario_id` is the identifier the document was requested under and is
/// only used in error reports.
///
/// # Errors
///
/// Returns `DomainError::ContentUnavailable` if `text` is not JSON, and
/// `DomainError::InvalidGraph` if any validation step fails.
pub fn parse_scenario(scenario_id: &str, text: &str) -> Result<ScenarioGraph, DomainError> {
    let raw: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        DomainError::ContentUnavailable(format!("{scenario_id}: not valid JSON: {e}"))
    })?;

    check_required_fields(&raw).map_err(|violations| invalid(scenario_id, &violations))?;

    let graph: ScenarioGraph = serde_json::from_value(raw).map_err(|e| {
        invalid(scenario_id, &[GraphViolation::Malformed(e.to_string())])
    })?;

    check_graph(&graph).map_err(|violations| invalid(scenario_id, &violations))?;

    Ok(graph)
}
