//! Structured API problems (RFC 7807 `application/problem+json`)
//!
//! The Gradle Enterprise API describes many failures with a problem document.
//! Parsing one out of a failed call is best effort: anything that is not a
//! well-formed problem simply yields `None`.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Problem type reported when the requested Build Scan was deleted
pub const BUILD_DELETED_PROBLEM: &str = "urn:gradle:enterprise:api:problems:build-deleted";

/// A problem document returned in the body of a failed API call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Empty when the server sent no detail
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Problem types callers act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    /// The referenced build was deleted upstream
    BuildDeleted,
    Other(String),
}

impl ApiProblem {
    /// Classify the body of a failed call, if it carries a problem document
    pub fn from_error(error: &ApiError) -> Option<Self> {
        error.body().and_then(Self::parse)
    }

    /// Parse a problem document; never fails, only returns `None`
    pub fn parse(body: &str) -> Option<Self> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        serde_json::from_str(body).ok()
    }

    pub fn kind(&self) -> ProblemKind {
        if self.problem_type == BUILD_DELETED_PROBLEM {
            ProblemKind::BuildDeleted
        } else {
            ProblemKind::Other(self.problem_type.clone())
        }
    }
}
