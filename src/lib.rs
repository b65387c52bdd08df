//! goal-compare - Maven goal execution time comparison via the Gradle Enterprise API
//!
//! This library walks the build listing of a Gradle Enterprise server, splits
//! Maven builds into the builds before and after a signal build, and ranks
//! non-cacheable goals by how much slower they became.

pub mod api;
pub mod cli;
pub mod compare;
pub mod error;
pub mod model;
pub mod pager;
pub mod problem;
pub mod report;
