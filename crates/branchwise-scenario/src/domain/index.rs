//! The scenario catalogue.

use serde::{Deserialize, Serialize};

/// Scenario id offered when the catalogue cannot be fetched.
pub const FALLBACK_SCENARIO_ID: &str = "workplace-conflict";

/// Lists the scenarios available to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioIndex {
    #[serde(default)]
    pub scenarios: Vec<ScenarioSummary>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ScenarioIndex {
    /// The minimal built-in catalogue.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            scenarios: vec![ScenarioSummary {
                id: FALLBACK_SCENARIO_ID.to_owned(),
                title: "Workplace Conflict".to_owned(),
                category: Some("workplace".to_owned()),
                difficulty: Some("beginner".to_owned()),
                unlocked: true,
                file: format!("{FALLBACK_SCENARIO_ID}.json"),
            }],
            categories: Vec::new(),
        }
    }

    /// Looks up a scenario by id.
    #[must_use]
    pub fn find(&self, scenario_id: &str) -> Option<&ScenarioSummary> {
        self.scenarios.iter().find(|s| s.id == scenario_id)
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default = "unlocked_by_default")]
    pub unlocked: bool,
    /// Document path relative to the content root.
    pub file: String,
}

fn unlocked_by_default() -> bool {
    true
}

/// A grouping of scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
