// Configuration for a goal execution comparison run

use crate::error::ConfigError;
use crate::model::MAVEN_BUILD_TOOL;
use std::collections::BTreeSet;

/// Builds accepted per cohort unless configured otherwise
pub const DEFAULT_MAX_BUILDS_PER_COHORT: usize = 20;

/// Filters and limits applied while classifying builds
///
/// # Example
/// ```
/// use goal_compare::compare::CompareConfig;
///
/// let config = CompareConfig::new("signal-build")
///     .with_project_name("my-app")
///     .with_requested_goals(["clean", "install"]);
/// assert_eq!(config.max_builds_per_cohort, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    /// Build Scan ID whose arrival starts the "after" cohort
    pub signal_build: String,

    /// Only builds whose top-level project has this name take part
    ///
    /// `None` accepts every project.
    pub project_name: Option<String>,

    /// Goals every accepted build must have requested
    ///
    /// Empty means no goal filter.
    pub requested_goals: BTreeSet<String>,

    /// Upper bound on builds contributing to each cohort
    pub max_builds_per_cohort: usize,

    /// Build tool kind handed to the classifier by the pager
    pub build_tool: String,
}

impl CompareConfig {
    pub fn new(signal_build: impl Into<String>) -> Self {
        Self {
            signal_build: signal_build.into(),
            project_name: None,
            requested_goals: BTreeSet::new(),
            max_builds_per_cohort: DEFAULT_MAX_BUILDS_PER_COHORT,
            build_tool: MAVEN_BUILD_TOOL.to_string(),
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_requested_goals<I, S>(mut self, goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested_goals = goals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_builds_per_cohort(mut self, max: usize) -> Self {
        self.max_builds_per_cohort = max;
        self
    }

    /// Parse a comma-separated goal list, trimming whitespace
    ///
    /// Empty input means "no goal filter". Empty entries between commas are
    /// rejected rather than silently turned into a goal named "".
    pub fn parse_goal_list(list: &str) -> Result<BTreeSet<String>, ConfigError> {
        if list.trim().is_empty() {
            return Ok(BTreeSet::new());
        }
        list.split(',')
            .map(str::trim)
            .map(|goal| {
                if goal.is_empty() {
                    Err(ConfigError::EmptyRequestedGoal)
                } else {
                    Ok(goal.to_string())
                }
            })
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signal_build.trim().is_empty() {
            return Err(ConfigError::EmptySignalBuild);
        }

        if matches!(&self.project_name, Some(name) if name.trim().is_empty()) {
            return Err(ConfigError::EmptyProjectName);
        }

        if self.requested_goals.iter().any(|g| g.trim().is_empty()) {
            return Err(ConfigError::EmptyRequestedGoal);
        }

        if self.max_builds_per_cohort == 0 {
            return Err(ConfigError::ZeroCohortCap);
        }

        Ok(())
    }
}
