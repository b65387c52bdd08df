//! Gradle Enterprise API access
//!
//! `BuildApi` is the seam the comparison consumes; `HttpBuildApi` implements
//! it over the REST API with a blocking reqwest client and bearer-token auth.

use crate::error::{ApiError, ConfigError};
use crate::model::{Build, BuildAttributes, BuildCachePerformance};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Default number of builds requested per listing page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Calls the comparison makes against the build data service
pub trait BuildApi {
    /// Builds that became available after `since_build`, oldest first
    fn list_builds(&self, since_build: &str) -> Result<Vec<Build>, ApiError>;

    /// Maven attributes (project name, requested goals) of one build
    fn build_attributes(&self, build_id: &str) -> Result<BuildAttributes, ApiError>;

    /// Maven build cache performance (goal executions) of one build
    fn build_cache_performance(&self, build_id: &str) -> Result<BuildCachePerformance, ApiError>;
}

impl<T: BuildApi + ?Sized> BuildApi for &T {
    fn list_builds(&self, since_build: &str) -> Result<Vec<Build>, ApiError> {
        (**self).list_builds(since_build)
    }

    fn build_attributes(&self, build_id: &str) -> Result<BuildAttributes, ApiError> {
        (**self).build_attributes(build_id)
    }

    fn build_cache_performance(&self, build_id: &str) -> Result<BuildCachePerformance, ApiError> {
        (**self).build_cache_performance(build_id)
    }
}

/// Connection settings for `HttpBuildApi`
#[derive(Clone)]
pub struct HttpApiConfig {
    pub server_url: String,
    pub access_key: String,
    pub page_size: usize,
    pub timeout: Duration,
}

impl HttpApiConfig {
    pub fn new(server_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            access_key: access_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Server URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyServerUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidServerUrl(url.to_string()));
        }
        if self.access_key.trim().is_empty() {
            return Err(ConfigError::EmptyAccessKey);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}

impl fmt::Debug for HttpApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApiConfig")
            .field("server_url", &self.server_url)
            .field("access_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Blocking REST client for the Gradle Enterprise API
pub struct HttpBuildApi {
    client: Client,
    base_url: Url,
    access_key: String,
    page_size: usize,
}

impl HttpBuildApi {
    /// Build a client from already validated settings
    pub fn new(config: HttpApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let base_url = Url::parse(config.base_url())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url(), e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url().to_string()));
        }

        Ok(Self {
            client,
            base_url,
            access_key: config.access_key.trim().to_string(),
            page_size: config.page_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T, ApiError> {
        tracing::trace!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_key)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body is left empty
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl BuildApi for HttpBuildApi {
    fn list_builds(&self, since_build: &str) -> Result<Vec<Build>, ApiError> {
        self.get(
            self.endpoint(&["api", "builds"]),
            &[
                ("sinceBuild", since_build.to_string()),
                ("maxBuilds", self.page_size.to_string()),
            ],
        )
    }

    fn build_attributes(&self, build_id: &str) -> Result<BuildAttributes, ApiError> {
        self.get(
            self.endpoint(&["api", "builds", build_id, "maven-attributes"]),
            &[],
        )
    }

    fn build_cache_performance(&self, build_id: &str) -> Result<BuildCachePerformance, ApiError> {
        self.get(
            self.endpoint(&["api", "builds", build_id, "maven-build-cache-performance"]),
            &[],
        )
    }
}
