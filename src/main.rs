//! `project-risk` — score project risk from metric snapshots and track health trends.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Read metric snapshots ([`metrics::loader`]).
//! 4. Feed each snapshot to the project tracker ([`tracking`]), oldest first.
//! 5. Score the latest snapshot ([`scoring`]), check it for anomalies and derive
//!    recommendations and alert actions ([`models::RiskAssessment`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` when the latest risk level reaches `policy.fail_on`.

mod cli;
mod config;
mod logging;
mod metrics;
mod models;
mod report;
mod scoring;
mod tracking;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::{Cli, ReportFormat};
use config::load_config;
use metrics::loader::load_snapshots;
use metrics::UnknownMetricPolicy;
use report::RunReport;
use scoring::scorer::RiskScorer;
use tracking::tracker::ProjectTracker;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if cli.strict {
        config.policy.unknown_metrics = UnknownMetricPolicy::Reject;
    }

    let project_id = cli.project_id();
    let mut tracker = ProjectTracker::new(config.trend);

    for path in &cli.snapshots {
        let records = load_snapshots(path, config.policy.unknown_metrics)?;

        if !cli.quiet && matches!(cli.report, ReportFormat::Terminal) {
            eprintln!(
                "  {} {} {} snapshots",
                "→".cyan(),
                path.display(),
                records.len()
            );
        }

        for record in records {
            tracker.update_status(&project_id, record);
        }
    }

    let Some(status) = tracker.get_status(&project_id) else {
        eprintln!("No metric snapshots found for {}", project_id);
        std::process::exit(1);
    };

    let risk = RiskScorer::new().calculate_project_risk(&status.metrics);
    let anomalies = tracker.detect_anomalies(&project_id);
    let history = tracker.history(&project_id);

    let shown_history = if cli.verbose || history.len() > 1 {
        Some(history)
    } else {
        None
    };
    let report = RunReport::new(&project_id, &risk, status, shown_history, &anomalies);

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&report, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if config.fails(risk.level) {
        tracing::info!(
            project_id = %project_id,
            level = %risk.level,
            fail_on = %config.policy.fail_on,
            "risk level at or above failure threshold"
        );
        std::process::exit(1);
    }

    Ok(())
}
