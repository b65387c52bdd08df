// Per-goal duration samples, split by cohort
//
// Means are cached and recomputed lazily: every append marks the cohort's
// cached mean dirty, and the next read recomputes it.

use std::cell::Cell;
use std::fmt;

/// The two temporal groups a build can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cohort {
    /// Builds observed before the signal build
    BeforeSignal,
    /// The signal build and everything after it
    AfterSignal,
}

impl Cohort {
    pub const ALL: [Cohort; 2] = [Cohort::BeforeSignal, Cohort::AfterSignal];

    pub(crate) fn index(self) -> usize {
        match self {
            Cohort::BeforeSignal => 0,
            Cohort::AfterSignal => 1,
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cohort::BeforeSignal => write!(f, "before-signal"),
            Cohort::AfterSignal => write!(f, "after-signal"),
        }
    }
}

/// Durations of one cohort with a memoized mean
#[derive(Debug, Clone, Default)]
struct CohortSamples {
    durations: Vec<u64>,
    mean: Cell<Option<f64>>,
    dirty: Cell<bool>,
}

impl CohortSamples {
    fn push(&mut self, duration: u64) {
        self.durations.push(duration);
        self.dirty.set(true);
    }

    fn mean(&self) -> Option<f64> {
        if self.dirty.get() {
            self.mean.set(arithmetic_mean(&self.durations));
            self.dirty.set(false);
        }
        self.mean.get()
    }
}

/// Arithmetic mean, undefined for an empty slice
fn arithmetic_mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    Some(sum / values.len() as f64)
}

/// Duration observations of one goal, kept separately per cohort
#[derive(Debug, Clone, Default)]
pub struct GoalDurations {
    cohorts: [CohortSamples; 2],
}

impl GoalDurations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a duration (milliseconds) for `cohort`
    pub fn add_duration(&mut self, duration: u64, cohort: Cohort) {
        self.cohorts[cohort.index()].push(duration);
    }

    /// Mean duration of `cohort`, `None` if it has no observations
    pub fn mean(&self, cohort: Cohort) -> Option<f64> {
        self.cohorts[cohort.index()].mean()
    }

    /// `mean(after) - mean(before)`, `None` if either side is empty
    pub fn difference(&self) -> Option<f64> {
        Some(self.mean(Cohort::AfterSignal)? - self.mean(Cohort::BeforeSignal)?)
    }

    pub fn durations(&self, cohort: Cohort) -> &[u64] {
        &self.cohorts[cohort.index()].durations
    }

    pub fn sample_count(&self, cohort: Cohort) -> usize {
        self.durations(cohort).len()
    }
}
