//! Result tables emitted by a simulation run.
//!
//! Rows are write-once at simulation time and read-only afterwards; the
//! downstream cost-effectiveness layer consumes them as-is.

use serde::Serialize;

use crate::error::ModelError;

/// One state-occupancy probability observation.
#[derive(Debug, Clone, Serialize)]
pub struct StateProbRow {
    /// Treatment strategy name.
    pub strategy: String,
    /// Population group name.
    pub group: String,
    /// Parameter-sample index.
    pub sample: usize,
    /// Health-state name.
    pub state: String,
    /// Simulation cycle (0 is the initial distribution).
    pub cycle: usize,
    /// Model time at the cycle (cycle x cycle length).
    pub time: f64,
    /// Occupancy probability.
    pub prob: f64,
}

/// One aggregate outcome observation.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRow {
    /// Treatment strategy name.
    pub strategy: String,
    /// Population group name.
    pub group: String,
    /// Parameter-sample index.
    pub sample: usize,
    /// Outcome category: `"qalys"` or a cost-category name.
    pub category: String,
    /// Discounted total for the category.
    pub value: f64,
}

/// Everything one simulation run produces.
#[derive(Debug, Serialize)]
pub struct SimulationResults {
    /// State-occupancy trajectories in long form.
    pub stateprobs: Vec<StateProbRow>,
    /// One row per (strategy, group, sample, category).
    pub outcomes: Vec<OutcomeRow>,
}

impl SimulationResults {
    /// Serializes the results to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serialization`] on failure.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Serialization {
            reason: e.to_string(),
        })
    }
}
