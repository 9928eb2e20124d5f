//! The scenario graph: nodes, choices and their gating requirements.
//!
//! A `ScenarioGraph` is immutable once loaded and is shared behind an `Arc`
//! by every session navigating it.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Id of the node every traversal begins at.
pub const START_NODE_ID: &str = "start";

/// One complete branching narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioGraph {
    /// Unique scenario identifier.
    pub id: String,
    /// Descriptive metadata; no behavioral effect.
    pub metadata: ScenarioMetadata,
    /// Cast of characters, consumed only by presentation.
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    /// Every node, keyed by node id.
    pub nodes: BTreeMap<String, Node>,
}

impl ScenarioGraph {
    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Returns `true` if a node with this id exists.
    #[must_use]
    pub fn contains_node(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Display title, falling back to the scenario id.
    #[must_use]
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(&self.id)
    }
}

/// Descriptive scenario metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub estimated_time: Option<String>,
}

/// A character appearing in the scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Reference to a portrait asset.
    #[serde(default)]
    pub portrait: Option<String>,
}

/// Node type tag.
///
/// `Resolution` is the terminal marker. Unrecognised tags are kept verbatim
/// and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Scene,
    Resolution,
    Other(String),
}

impl NodeKind {
    /// Returns `true` for the terminal marker.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolution)
    }

    /// The tag as written in content files.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scene => "scene",
            Self::Resolution => "resolution",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "scene" => Self::Scene,
            "resolution" => Self::Resolution,
            _ => Self::Other(tag),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One narrative beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Presentation payload, opaque to navigation.
    #[serde(default)]
    pub content: NodeContent,
    /// Outgoing choices in authoring order. Empty marks a dead end.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Retrospective feedback on the choice that led here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Node {
    /// Returns `true` if this node carries the terminal marker.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Returns `true` if the node has no outgoing choices.
    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        self.choices.is_empty()
    }

    /// Finds a choice by id. The first match wins if ids repeat.
    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// Presentation content of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub speaker: Option<String>,
}

/// A labelled edge to another node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Unique within the owning node's choice list.
    pub id: String,
    pub text: String,
    pub strategy: Strategy,
    /// Target node id, checked at load time when present. A choice without
    /// a target is never offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
}

impl Choice {
    /// Returns `true` if the choice leads somewhere and its gating predicate
    /// passes given the set of choice ids already made. A targeted choice
    /// without requirements is always available.
    #[must_use]
    pub fn is_available(&self, made: &HashSet<&str>) -> bool {
        self.next_node.is_some()
            && self
                .requirements
                .as_ref()
                .is_none_or(|requirements| requirements.is_satisfied_by(made))
    }
}

/// Gating predicate on a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    /// Every one of these must already have been chosen.
    #[serde(default)]
    pub previous_choices: Vec<String>,
    /// None of these may have been chosen.
    #[serde(default)]
    pub forbidden_choices: Vec<String>,
}

impl Requirements {
    /// Evaluates the predicate against the choice ids made so far.
    #[must_use]
    pub fn is_satisfied_by(&self, made: &HashSet<&str>) -> bool {
        self.previous_choices
            .iter()
            .all(|id| made.contains(id.as_str()))
            && !self
                .forbidden_choices
                .iter()
                .any(|id| made.contains(id.as_str()))
    }
}

/// Conflict-handling strategy a choice exemplifies. Used for statistics and
/// feedback only, never for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strategy {
    Collaborating,
    Compromising,
    Competing,
    Accommodating,
    Avoiding,
    ActiveListening,
    Other(String),
}

impl Strategy {
    /// The tag as written in content files.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Collaborating => "collaborating",
            Self::Compromising => "compromising",
            Self::Competing => "competing",
            Self::Accommodating => "accommodating",
            Self::Avoiding => "avoiding",
            Self::ActiveListening => "active_listening",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Strategy {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "collaborating" => Self::Collaborating,
            "compromising" => Self::Compromising,
            "competing" => Self::Competing,
            "accommodating" => Self::Accommodating,
            "avoiding" => Self::Avoiding,
            "active_listening" => Self::ActiveListening,
            _ => Self::Other(tag),
        }
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback shown on arrival at a node, describing the choice that led here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub effectiveness: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub skills_used: Vec<String>,
}
