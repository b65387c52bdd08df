// Goal execution time comparison across a signal build
//
// Builds are split into two cohorts: those listed before the signal build and
// those from the signal build on. For every goal executed without being
// cacheable, the mean duration of each cohort is computed and goals are ranked
// by how much slower they became.
//
// Only a mean-difference ranking is produced; no hypothesis testing.

mod aggregator;
mod classifier;
mod config;
mod samples;

pub use aggregator::{GoalDifference, GoalExecutionTable};
pub use classifier::{BuildFailure, BuildOutcome, FetchStage, GoalExecutionComparison};
pub use config::{CompareConfig, DEFAULT_MAX_BUILDS_PER_COHORT};
pub use samples::{Cohort, GoalDurations};
