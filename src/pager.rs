//! Paginated walk over the build listing
//!
//! The listing is resumed after the last build of every page, whatever its
//! build tool, so progress does not depend on the build tool filter. The walk
//! ends at the first empty page. Listing failures abort the walk.

use crate::api::BuildApi;
use crate::error::ApiError;
use crate::model::{Build, MAVEN_BUILD_TOOL};
use tracing::debug;

/// Walks `/api/builds` page by page and hands matching builds to a callback
pub struct BuildsProcessor<A: BuildApi> {
    api: A,
    build_tool: String,
}

impl<A: BuildApi> BuildsProcessor<A> {
    /// Processor for Maven builds
    pub fn new(api: A) -> Self {
        Self::for_build_tool(api, MAVEN_BUILD_TOOL)
    }

    pub fn for_build_tool(api: A, build_tool: impl Into<String>) -> Self {
        Self {
            api,
            build_tool: build_tool.into(),
        }
    }

    pub fn build_tool(&self) -> &str {
        &self.build_tool
    }

    /// Visit every build after `first_build_id`, in listing order
    ///
    /// Returns the number of builds handed to `on_build`.
    pub fn process<F>(&self, first_build_id: &str, mut on_build: F) -> Result<usize, ApiError>
    where
        F: FnMut(&Build),
    {
        let mut cursor = first_build_id.to_string();
        let mut pages = 0usize;
        let mut visited = 0usize;

        loop {
            let builds = self.api.list_builds(&cursor)?;
            pages += 1;

            let Some(last) = builds.last() else {
                debug!(pages, visited, "Reached end of build listing");
                return Ok(visited);
            };
            debug!(page = pages, size = builds.len(), since = %cursor, "Fetched build page");

            for build in builds.iter().filter(|b| b.build_tool_type == self.build_tool) {
                on_build(build);
                visited += 1;
            }

            cursor = last.id.clone();
        }
    }
}
