//! Error types for API calls and run configuration

use thiserror::Error;

/// A failed call to the Gradle Enterprise API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    #[error("API returned status {code}")]
    Status { code: u16, body: String },

    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 2xx response whose body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server URL that cannot serve as a base for API paths
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status code, if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => None,
        }
    }

    /// Raw response body, if the server answered with an error status
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Invalid run configuration, detected before any API call is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signal build id must not be empty")]
    EmptySignalBuild,

    #[error("first build id must not be empty")]
    EmptyFirstBuild,

    #[error("project name filter must not be empty when set")]
    EmptyProjectName,

    #[error("requested goals must not contain empty entries")]
    EmptyRequestedGoal,

    #[error("max builds per cohort must be at least 1")]
    ZeroCohortCap,

    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("server URL must not be empty")]
    EmptyServerUrl,

    #[error("server URL must start with http:// or https://, got {0}")]
    InvalidServerUrl(String),

    #[error("access key must not be empty")]
    EmptyAccessKey,
}
