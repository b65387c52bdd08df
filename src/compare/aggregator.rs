// Goal execution table: GoalKey -> per-cohort durations
//
// Reports rank goals by how much slower they got after the signal build.

use crate::compare::samples::{Cohort, GoalDurations};
use crate::model::GoalKey;
use std::collections::BTreeMap;

/// One row of a comparison report
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDifference {
    pub key: GoalKey,
    /// Mean duration before the signal build (ms)
    pub before_mean: f64,
    /// Mean duration from the signal build on (ms)
    pub after_mean: f64,
    /// `after_mean - before_mean` (ms)
    pub difference: f64,
    pub before_samples: usize,
    pub after_samples: usize,
}

/// Collects goal durations for both cohorts
#[derive(Debug, Default)]
pub struct GoalExecutionTable {
    executions: BTreeMap<GoalKey, GoalDurations>,
}

impl GoalExecutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation, creating the goal's entry on first use
    pub fn add_duration(&mut self, key: GoalKey, duration: u64, cohort: Cohort) {
        self.executions
            .entry(key)
            .or_default()
            .add_duration(duration, cohort);
    }

    pub fn get(&self, key: &GoalKey) -> Option<&GoalDurations> {
        self.executions.get(key)
    }

    pub fn mean(&self, key: &GoalKey, cohort: Cohort) -> Option<f64> {
        self.executions.get(key)?.mean(cohort)
    }

    pub fn difference(&self, key: &GoalKey) -> Option<f64> {
        self.executions.get(key)?.difference()
    }

    pub fn len(&self) -> usize {
        self.executions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    /// Goals whose mean grew by more than `threshold_ms`, smallest growth first
    ///
    /// Goals missing observations in either cohort have no difference and are
    /// never reported. Equal differences keep `GoalKey` order.
    pub fn report(&self, threshold_ms: u64) -> Vec<GoalDifference> {
        let threshold = threshold_ms as f64;
        let mut rows: Vec<GoalDifference> = self
            .executions
            .iter()
            .filter_map(|(key, durations)| {
                let before_mean = durations.mean(Cohort::BeforeSignal)?;
                let after_mean = durations.mean(Cohort::AfterSignal)?;
                let difference = after_mean - before_mean;
                (difference > threshold).then(|| GoalDifference {
                    key: key.clone(),
                    before_mean,
                    after_mean,
                    difference,
                    before_samples: durations.sample_count(Cohort::BeforeSignal),
                    after_samples: durations.sample_count(Cohort::AfterSignal),
                })
            })
            .collect();

        // Stable sort: ties stay in key order
        rows.sort_by(|a, b| a.difference.total_cmp(&b.difference));
        rows
    }
}
