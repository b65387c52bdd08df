//! CLI argument parsing for goal-compare

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the comparison report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "goal-compare")]
#[command(version)]
#[command(
    about = "Compare Maven goal execution times before and after a signal build using the Gradle Enterprise API",
    long_about = None
)]
pub struct Cli {
    /// The address of the Gradle Enterprise server
    #[arg(long = "server-url", value_name = "URL")]
    pub server_url: String,

    /// The path to the file containing the access key
    #[arg(long = "access-key-file", value_name = "PATH")]
    pub access_key_file: PathBuf,

    /// The name of the top-level project to compare builds of (all projects if omitted)
    #[arg(long = "project-name", value_name = "NAME")]
    pub project_name: Option<String>,

    /// Comma-separated list of goals every compared build must have requested
    #[arg(long = "requested-goals", value_name = "GOALS", default_value = "")]
    pub requested_goals: String,

    /// Minimum amount of time (in ms) for a difference to be shown
    #[arg(long = "threshold", value_name = "MS", default_value = "0")]
    pub threshold: u64,

    /// The build scan to start after when listing builds
    #[arg(long = "first-scan-id", value_name = "ID")]
    pub first_scan_id: String,

    /// The build scan from which on builds count as "after"
    #[arg(long = "second-scan-id", value_name = "ID")]
    pub second_scan_id: String,

    /// Maximum number of builds compared on each side of the signal build
    #[arg(long = "max-builds-per-cohort", value_name = "N", default_value = "20")]
    pub max_builds_per_cohort: usize,

    /// Number of builds requested per listing page
    #[arg(long = "page-size", value_name = "N", default_value = "100")]
    pub page_size: usize,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout-secs", value_name = "SECS", default_value = "60")]
    pub timeout_secs: u64,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable trace-level logging on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
