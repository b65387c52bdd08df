//! Text and JSON rendering of a finished comparison

use crate::api::BuildApi;
use crate::compare::{BuildFailure, Cohort, GoalDifference, GoalExecutionComparison};
use serde::Serialize;

/// One reported goal in JSON output
#[derive(Debug, Clone, Serialize)]
pub struct JsonGoalDifference {
    /// Display form: `goal (execution id) @ project`
    pub goal: String,
    pub goal_name: String,
    pub execution_id: String,
    pub project_name: String,
    pub before_mean_ms: f64,
    pub after_mean_ms: f64,
    pub difference_ms: f64,
    pub before_samples: usize,
    pub after_samples: usize,
}

impl From<&GoalDifference> for JsonGoalDifference {
    fn from(row: &GoalDifference) -> Self {
        Self {
            goal: row.key.to_string(),
            goal_name: row.key.goal_name.clone(),
            execution_id: row.key.execution_id.clone(),
            project_name: row.key.project_name.clone(),
            before_mean_ms: row.before_mean,
            after_mean_ms: row.after_mean,
            difference_ms: row.difference,
            before_samples: row.before_samples,
            after_samples: row.after_samples,
        }
    }
}

/// Result of a comparison run, ready to print
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub signal_build: String,
    pub builds_before: usize,
    pub builds_after: usize,
    pub threshold_ms: u64,
    pub differences: Vec<GoalDifference>,
    pub failures: Vec<BuildFailure>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    signal_build: &'a str,
    builds_before: usize,
    builds_after: usize,
    threshold_ms: u64,
    differences: Vec<JsonGoalDifference>,
    failures: &'a [BuildFailure],
}

impl ComparisonReport {
    pub fn from_comparison<A: BuildApi>(
        comparison: &GoalExecutionComparison<A>,
        threshold_ms: u64,
    ) -> Self {
        Self {
            signal_build: comparison.config().signal_build.clone(),
            builds_before: comparison.build_count(Cohort::BeforeSignal),
            builds_after: comparison.build_count(Cohort::AfterSignal),
            threshold_ms,
            differences: comparison.table().report(threshold_ms),
            failures: comparison.failures().to_vec(),
        }
    }

    /// `Found <n> builds before <signal> and <m> after...`
    pub fn summary_line(&self) -> String {
        format!(
            "Found {} builds before {} and {} after...",
            self.builds_before, self.signal_build, self.builds_after
        )
    }

    /// `<goal>: <before>ms, <after>ms => <difference>ms`
    pub fn format_difference(row: &GoalDifference) -> String {
        format!(
            "{}: {:.2}ms, {:.2}ms => {:.2}ms",
            row.key, row.before_mean, row.after_mean, row.difference
        )
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.summary_line());
        out.push('\n');
        for row in &self.differences {
            out.push_str(&Self::format_difference(row));
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            signal_build: &self.signal_build,
            builds_before: self.builds_before,
            builds_after: self.builds_after,
            threshold_ms: self.threshold_ms,
            differences: self.differences.iter().map(JsonGoalDifference::from).collect(),
            failures: &self.failures,
        };
        serde_json::to_string_pretty(&report)
    }
}
