//! The persisted progress document.
//!
//! The navigator owns only `user_progress`; completion and statistics are
//! folded in by the statistics publisher, and preferences belong to the
//! presentation layer. Unknown preference keys survive a round trip.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::graph::Strategy;
use super::traversal::TraversalSnapshot;

/// View mode used when none has been chosen.
pub const DEFAULT_VIEW_MODE: &str = "visual-novel";

/// Everything persisted for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDocument {
    /// Where the user left off, if anywhere.
    #[serde(default)]
    pub user_progress: Option<TraversalSnapshot>,
    /// Scenario ids completed at least once, in completion order.
    #[serde(default)]
    pub completed_scenarios: Vec<String>,
    #[serde(default)]
    pub user_preferences: UserPreferences,
    #[serde(default)]
    pub statistics: Statistics,
}

impl ProgressDocument {
    /// Counts one choice made with `strategy`.
    pub fn record_choice(&mut self, strategy: &Strategy) {
        self.statistics.total_choices_made += 1;
        *self
            .statistics
            .strategies_used
            .entry(strategy.as_str().to_owned())
            .or_insert(0) += 1;
    }

    /// Marks a scenario completed. Returns `false` if it already was.
    pub fn mark_completed(&mut self, scenario_id: &str) -> bool {
        if self.is_completed(scenario_id) {
            return false;
        }
        self.completed_scenarios.push(scenario_id.to_owned());
        self.statistics.scenarios_completed += 1;
        true
    }

    /// Returns `true` if the scenario has been completed before.
    #[must_use]
    pub fn is_completed(&self, scenario_id: &str) -> bool {
        self.completed_scenarios.iter().any(|id| id == scenario_id)
    }
}

/// Presentation preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default = "default_view_mode")]
    pub view_mode: String,
    /// Any other preference keys, kept verbatim.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

fn default_view_mode() -> String {
    DEFAULT_VIEW_MODE.to_owned()
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            view_mode: default_view_mode(),
            other: serde_json::Map::new(),
        }
    }
}

/// Aggregate usage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_choices_made: u64,
    #[serde(default)]
    pub scenarios_completed: u64,
    /// Strategy tag to number of times chosen.
    #[serde(default)]
    pub strategies_used: BTreeMap<String, u64>,
}
