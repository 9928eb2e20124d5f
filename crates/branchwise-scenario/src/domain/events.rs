//! Domain events emitted by a traversal session.

use branchwise_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::graph::Strategy;

/// Event type for `ChoiceMade`.
pub const CHOICE_MADE_EVENT_TYPE: &str = "scenario.choice_made";
/// Event type for `WentBack`.
pub const WENT_BACK_EVENT_TYPE: &str = "scenario.went_back";
/// Event type for `Restarted`.
pub const RESTARTED_EVENT_TYPE: &str = "scenario.restarted";
/// Event type for `ScenarioCompleted`.
pub const SCENARIO_COMPLETED_EVENT_TYPE: &str = "scenario.completed";

/// Emitted when a choice is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMade {
    pub scenario_id: String,
    /// The node the choice was made from.
    pub node_id: String,
    pub choice_id: String,
    pub strategy: Strategy,
}

/// Emitted when the last choice is undone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WentBack {
    pub scenario_id: String,
    /// The node that was left.
    pub from_node_id: String,
    /// The node that is current again.
    pub to_node_id: String,
}

/// Emitted when the session returns to the start node with empty history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restarted {
    pub scenario_id: String,
}

/// Emitted when a choice lands on a terminal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCompleted {
    pub scenario_id: String,
    /// The terminal node reached.
    pub node_id: String,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioEventKind {
    ChoiceMade(ChoiceMade),
    WentBack(WentBack),
    Restarted(Restarted),
    ScenarioCompleted(ScenarioCompleted),
}

/// Domain event envelope for scenario navigation.
#[derive(Debug, Clone)]
pub struct ScenarioEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ScenarioEventKind,
}

impl ScenarioEventKind {
    /// The event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ChoiceMade(_) => CHOICE_MADE_EVENT_TYPE,
            Self::WentBack(_) => WENT_BACK_EVENT_TYPE,
            Self::Restarted(_) => RESTARTED_EVENT_TYPE,
            Self::ScenarioCompleted(_) => SCENARIO_COMPLETED_EVENT_TYPE,
        }
    }
}

impl DomainEvent for ScenarioEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ScenarioEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
