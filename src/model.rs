//! Gradle Enterprise API models consumed by the comparison
//!
//! Only the fields the comparison reads are modelled; everything else the
//! server sends is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Build tool type tag for Maven builds
pub const MAVEN_BUILD_TOOL: &str = "maven";

/// A single entry of the `/api/builds` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Build Scan ID (opaque, assigned by the server)
    pub id: String,
    /// When the build became available on the server (epoch millis)
    #[serde(default)]
    pub available_at: u64,
    /// Build tool kind, e.g. "maven" or "gradle"
    pub build_tool_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool_version: Option<String>,
}

impl Build {
    pub fn new(id: impl Into<String>, build_tool_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            available_at: 0,
            build_tool_type: build_tool_type.into(),
            build_tool_version: None,
        }
    }
}

/// Maven attributes of one build (`/api/builds/{id}/maven-attributes`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAttributes {
    #[serde(default)]
    pub top_level_project_name: String,
    #[serde(default)]
    pub requested_goals: Vec<String>,
}

/// Build cache performance of one Maven build
/// (`/api/builds/{id}/maven-build-cache-performance`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCachePerformance {
    /// Goal executions in the order the server reports them
    #[serde(default)]
    pub goal_execution: Vec<GoalExecution>,
}

/// Why a goal was or wasn't served from the build cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvoidanceOutcome {
    AvoidedUpToDate,
    AvoidedFromLocalCache,
    AvoidedFromRemoteCache,
    ExecutedCacheable,
    ExecutedNotCacheable,
    ExecutedUnknownCacheability,
    /// Any outcome this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl AvoidanceOutcome {
    /// Result was reused instead of running the goal
    pub fn is_avoided(self) -> bool {
        matches!(
            self,
            Self::AvoidedUpToDate | Self::AvoidedFromLocalCache | Self::AvoidedFromRemoteCache
        )
    }

    /// Goal actually ran
    pub fn is_executed(self) -> bool {
        matches!(
            self,
            Self::ExecutedCacheable | Self::ExecutedNotCacheable | Self::ExecutedUnknownCacheability
        )
    }
}

/// One goal execution inside a build's cache performance report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalExecution {
    pub goal_name: String,
    pub goal_execution_id: String,
    pub goal_project_name: String,
    /// Wall-clock duration in milliseconds
    pub duration: u64,
    pub avoidance_outcome: AvoidanceOutcome,
}

impl GoalExecution {
    /// Key correlating this goal across builds
    pub fn key(&self) -> GoalKey {
        GoalKey {
            goal_name: self.goal_name.clone(),
            execution_id: self.goal_execution_id.clone(),
            project_name: self.goal_project_name.clone(),
        }
    }
}

/// Identity of a logical goal execution: goal name, execution id and project
///
/// Ordering is lexicographic over (goal, execution id, project) and gives the
/// stable tie-break order for reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalKey {
    pub goal_name: String,
    pub execution_id: String,
    pub project_name: String,
}

impl GoalKey {
    pub fn new(
        goal_name: impl Into<String>,
        execution_id: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            goal_name: goal_name.into(),
            execution_id: execution_id.into(),
            project_name: project_name.into(),
        }
    }
}

impl fmt::Display for GoalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) @ {}",
            self.goal_name, self.execution_id, self.project_name
        )
    }
}
