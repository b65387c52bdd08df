use anyhow::{Context, Result};
use clap::Parser;
use goal_compare::{
    api::{HttpApiConfig, HttpBuildApi},
    cli::{Cli, OutputFormat},
    compare::{CompareConfig, GoalExecutionComparison},
    pager::BuildsProcessor,
    report::ComparisonReport,
};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; progress and API errors go to stderr
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,goal_compare=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the access key, trimming surrounding whitespace
fn read_access_key(path: &Path) -> Result<String> {
    let key = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read access key file {}", path.display()))?;
    Ok(key.trim().to_string())
}

/// Map CLI arguments onto validated run and connection settings
fn build_configs(args: &Cli) -> Result<(CompareConfig, HttpApiConfig)> {
    if args.first_scan_id.trim().is_empty() {
        return Err(goal_compare::error::ConfigError::EmptyFirstBuild.into());
    }

    let mut compare = CompareConfig::new(args.second_scan_id.trim())
        .with_max_builds_per_cohort(args.max_builds_per_cohort);
    compare.project_name = args.project_name.clone();
    compare.requested_goals = CompareConfig::parse_goal_list(&args.requested_goals)?;
    compare.validate().context("Invalid comparison settings")?;

    let mut http = HttpApiConfig::new(&args.server_url, read_access_key(&args.access_key_file)?);
    http.page_size = args.page_size;
    http.timeout = Duration::from_secs(args.timeout_secs);
    http.validate().context("Invalid server settings")?;

    Ok((compare, http))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let (compare_config, http_config) = build_configs(&args)?;
    let threshold = args.threshold;

    let api = HttpBuildApi::new(http_config).context("Failed to create API client")?;
    let pager = BuildsProcessor::for_build_tool(&api, compare_config.build_tool.clone());
    let mut comparison = GoalExecutionComparison::new(&api, compare_config);

    eprintln!("Processing builds ...");
    let visited = pager
        .process(args.first_scan_id.trim(), |build| {
            comparison.process(build);
        })
        .with_context(|| format!("Failed to list builds after {}", args.first_scan_id))?;
    tracing::info!(
        visited,
        build_tool = pager.build_tool(),
        "Finished walking build listing"
    );

    let report = ComparisonReport::from_comparison(&comparison, threshold);
    match args.format {
        OutputFormat::Text => {
            print!("{}", report.to_text());
            if !report.failures.is_empty() {
                eprintln!(
                    "Skipped {} builds because of API errors",
                    report.failures.len()
                );
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
