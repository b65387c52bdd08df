// Build classification: assigns each build to a cohort and feeds its
// non-cacheable goal executions into the goal table.
//
// Each cohort accepts at most `max_builds_per_cohort` builds; once a cohort is
// full, further builds in it are skipped without any API call. The signal
// check runs before the cap check so the cohort switch is never missed.

use crate::api::BuildApi;
use crate::compare::aggregator::GoalExecutionTable;
use crate::compare::config::CompareConfig;
use crate::compare::samples::Cohort;
use crate::error::ApiError;
use crate::model::{AvoidanceOutcome, Build, BuildCachePerformance};
use crate::problem::{ApiProblem, ProblemKind};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Which per-build call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Attributes,
    CachePerformance,
}

/// A build skipped because one of its API calls failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildFailure {
    pub build_id: String,
    pub stage: FetchStage,
    /// HTTP status, if the server answered
    pub status: Option<u16>,
    pub message: String,
    /// Raw error body, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Structured problem parsed from the body, if it was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ApiProblem>,
}

impl BuildFailure {
    fn new(build_id: &str, stage: FetchStage, error: &ApiError) -> Self {
        Self {
            build_id: build_id.to_string(),
            stage,
            status: error.status_code(),
            message: error.to_string(),
            body: error.body().map(str::to_string),
            problem: ApiProblem::from_error(error),
        }
    }

    /// The build was deleted on the server
    pub fn is_build_deleted(&self) -> bool {
        matches!(
            self.problem.as_ref().map(ApiProblem::kind),
            Some(ProblemKind::BuildDeleted)
        )
    }
}

/// Why a build fetched for classification did not contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Goal executions were added to the table
    Accepted,
    /// The current cohort is already full; no API call was made
    CohortFull,
    /// Top-level project did not match the filter
    ProjectMismatch,
    /// Build did not request every required goal
    GoalsMismatch,
    /// An API call failed; see `failures()`
    Failed,
}

/// Classifies builds into cohorts and aggregates their goal durations
pub struct GoalExecutionComparison<A: BuildApi> {
    api: A,
    config: CompareConfig,
    current: Cohort,
    build_counts: [usize; 2],
    table: GoalExecutionTable,
    failures: Vec<BuildFailure>,
}

impl<A: BuildApi> GoalExecutionComparison<A> {
    pub fn new(api: A, config: CompareConfig) -> Self {
        Self {
            api,
            config,
            current: Cohort::BeforeSignal,
            build_counts: [0; 2],
            table: GoalExecutionTable::new(),
            failures: Vec::new(),
        }
    }

    /// Classify one build; API failures are recorded, never returned
    pub fn process(&mut self, build: &Build) -> BuildOutcome {
        if build.id == self.config.signal_build && self.current != Cohort::AfterSignal {
            info!(build_id = %build.id, "Reached signal build, switching to after-signal cohort");
            self.current = Cohort::AfterSignal;
        }

        let cohort = self.current;
        if self.build_counts[cohort.index()] >= self.config.max_builds_per_cohort {
            debug!(build_id = %build.id, %cohort, "Cohort full, skipping build");
            return BuildOutcome::CohortFull;
        }

        match self.process_build(build, cohort) {
            Ok(outcome) => outcome,
            Err(failure) => {
                report_failure(&failure);
                self.failures.push(failure);
                BuildOutcome::Failed
            }
        }
    }

    fn process_build(&mut self, build: &Build, cohort: Cohort) -> Result<BuildOutcome, BuildFailure> {
        info!(build_id = %build.id, "Retrieving details for build");
        let attributes = self
            .api
            .build_attributes(&build.id)
            .map_err(|e| BuildFailure::new(&build.id, FetchStage::Attributes, &e))?;

        if let Some(project) = &self.config.project_name {
            if *project != attributes.top_level_project_name {
                debug!(
                    build_id = %build.id,
                    project = %attributes.top_level_project_name,
                    "Project does not match filter"
                );
                return Ok(BuildOutcome::ProjectMismatch);
            }
        }

        let requested = &attributes.requested_goals;
        if !self
            .config
            .requested_goals
            .iter()
            .all(|goal| requested.contains(goal))
        {
            debug!(build_id = %build.id, ?requested, "Build is missing required goals");
            return Ok(BuildOutcome::GoalsMismatch);
        }

        let performance = self
            .api
            .build_cache_performance(&build.id)
            .map_err(|e| BuildFailure::new(&build.id, FetchStage::CachePerformance, &e))?;

        self.build_counts[cohort.index()] += 1;
        let goals = self.add_build(&performance, cohort);
        debug!(build_id = %build.id, %cohort, goals, "Build accepted");
        Ok(BuildOutcome::Accepted)
    }

    /// Add every executed, non-cacheable goal of a build to `cohort`
    ///
    /// Returns the number of goal executions added.
    pub fn add_build(&mut self, performance: &BuildCachePerformance, cohort: Cohort) -> usize {
        let mut added = 0;
        for goal in &performance.goal_execution {
            let outcome = goal.avoidance_outcome;
            if outcome == AvoidanceOutcome::ExecutedNotCacheable {
                self.table.add_duration(goal.key(), goal.duration, cohort);
                added += 1;
                continue;
            }

            let group = if outcome.is_avoided() {
                "avoided"
            } else if outcome.is_executed() {
                "executed"
            } else {
                "unknown"
            };
            trace!(goal = %goal.key(), ?outcome, group, "Goal not compared");
        }
        added
    }

    pub fn current_cohort(&self) -> Cohort {
        self.current
    }

    /// Builds that contributed to `cohort`
    pub fn build_count(&self, cohort: Cohort) -> usize {
        self.build_counts[cohort.index()]
    }

    pub fn table(&self) -> &GoalExecutionTable {
        &self.table
    }

    pub fn failures(&self) -> &[BuildFailure] {
        &self.failures
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }
}

fn report_failure(failure: &BuildFailure) {
    warn!(
        build_id = %failure.build_id,
        stage = ?failure.stage,
        status = ?failure.status,
        body = failure.body.as_deref().unwrap_or(""),
        "API error: {}",
        failure.message
    );

    if let Some(problem) = &failure.problem {
        match problem.kind() {
            ProblemKind::BuildDeleted if problem.detail.is_empty() => {
                warn!(build_id = %failure.build_id, "Build was deleted");
            }
            ProblemKind::BuildDeleted => {
                warn!(build_id = %failure.build_id, "Build was deleted: {}", problem.detail);
            }
            ProblemKind::Other(problem_type) => {
                warn!(build_id = %failure.build_id, %problem_type, "{}", problem.detail);
            }
        }
    }
}
