use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{RiskLevel, Severity, StatusUpdate, Trend};
use crate::report::RunReport;
use crate::scoring::weights::category_weight;

/// Render a colored terminal report.
pub fn render(report: &RunReport<'_>, verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        println!("{}", summary_line(report));
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "project-risk".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Project: {}\n", report.project_id);

    let risk = report.risk;
    let status = report.status;

    let level = risk.level.to_string();
    let trend = status.trend.to_string();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!("{}", box_row("SUMMARY", &"SUMMARY".bold().to_string()));
    println!(
        "{}",
        box_row(
            &format!("Risk score     : {:.2} ({})", risk.score, level),
            &format!("Risk score     : {:.2} ({})", risk.score, level_label(risk.level)),
        )
    );
    println!(
        "{}",
        box_row(
            &format!("Health score   : {:.2} ({})", status.health_score, trend),
            &format!(
                "Health score   : {:.2} ({})",
                status.health_score,
                trend_label(status.trend)
            ),
        )
    );
    let snapshots = format!(
        "Snapshots      : {}",
        report.history.map(|h| h.len()).unwrap_or(1)
    );
    println!("{}", box_row(&snapshots, &snapshots));
    let anomalies = format!("Anomalies      : {}", report.anomalies.len());
    println!("{}", box_row(&anomalies, &anomalies));
    println!(" └────────────────────────────────────────────────────┘\n");

    println!(" {} Risk factors:\n", "[RISK]".bold());
    println!("{}", factor_table(report));
    println!();

    if !report.anomalies.is_empty() {
        println!(" {} Anomalies in the latest snapshot:\n", "[ANOMALY]".red().bold());
        println!("{}", anomaly_table(report));
        println!();
    }

    println!(" {} Recommendations:\n", "[ADVICE]".bold());
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }
    println!();

    if let Some(alert) = &report.alert {
        let mut channels = Vec::new();
        if alert.channels.email {
            channels.push("email");
        }
        if alert.channels.sms {
            channels.push("sms");
        }
        println!(
            " {} {} risk alert via {}",
            "[ALERT]".red().bold(),
            level_label(risk.level),
            channels.join(", ")
        );
        for (category, score) in risk.top_factors(3) {
            println!("  - {}: {:.2}", category, score);
        }
        for action in &alert.actions {
            println!("  * {}", action);
        }
        println!();
    }

    if verbose {
        if status.metrics.is_empty() {
            println!(" {} Latest snapshot has no recognized metrics\n", "[METRICS]".cyan().bold());
        } else {
            println!(" {} Latest snapshot:\n", "[METRICS]".cyan().bold());
            println!("{}", metrics_table(status));
            println!();
        }

        if let Some(history) = report.history {
            println!(" {} Status history:\n", "[HISTORY]".cyan().bold());
            println!("{}", history_table(history));
            println!();
        }
    }

    Ok(())
}

pub fn summary_line(report: &RunReport<'_>) -> String {
    format!(
        "{}  Risk: {:.2} {}  Health: {:.2} {}  Anomalies: {}",
        report.project_id,
        report.risk.score,
        level_label(report.risk.level),
        report.status.health_score,
        trend_label(report.status.trend),
        report.anomalies.len(),
    )
}

const BOX_WIDTH: usize = 48;

/// One line of the summary box. Padding is measured on `plain` so that
/// color escapes in `styled` do not push the right border out.
fn box_row(plain: &str, styled: &str) -> String {
    let pad = BOX_WIDTH.saturating_sub(plain.chars().count());
    format!(" │  {}{} │", styled, " ".repeat(pad))
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn factor_table(report: &RunReport<'_>) -> Table {
    let mut table = new_table(&["Category", "Weight", "Score", "Contribution"]);

    for (category, score) in report.risk.top_factors(usize::MAX) {
        let weight = category_weight(category);
        table.add_row(vec![
            Cell::new(category.to_string()),
            Cell::new(format!("{:.2}", weight)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", score))
                .fg(factor_color(score))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", score * weight)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn anomaly_table(report: &RunReport<'_>) -> Table {
    let mut table = new_table(&["Type", "Severity", "Message"]);

    for anomaly in report.anomalies {
        let color = match anomaly.severity {
            Severity::High => Color::Red,
            Severity::Medium => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(anomaly.kind.to_string()),
            Cell::new(anomaly.severity.to_string())
                .fg(color)
                .set_alignment(CellAlignment::Center),
            Cell::new(&anomaly.message),
        ]);
    }

    table
}

fn metrics_table(status: &StatusUpdate) -> Table {
    let mut table = new_table(&["Metric", "Value"]);

    for (metric, value) in status.metrics.iter() {
        table.add_row(vec![
            Cell::new(metric.to_string()),
            Cell::new(format!("{:.3}", value)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn history_table(history: &[StatusUpdate]) -> Table {
    let mut table = new_table(&["#", "Timestamp", "Health", "Trend"]);

    for (i, update) in history.iter().enumerate() {
        let trend_color = match update.trend {
            Trend::Improving => Color::Green,
            Trend::Deteriorating => Color::Red,
            Trend::Stable => Color::Yellow,
            Trend::Neutral => Color::DarkGrey,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(update.timestamp.to_rfc3339()),
            Cell::new(format!("{:.2}", update.health_score)).set_alignment(CellAlignment::Right),
            Cell::new(update.trend.to_string()).fg(trend_color),
        ]);
    }

    table
}

fn factor_color(score: f64) -> Color {
    if score >= 0.6 {
        Color::Red
    } else if score >= 0.4 {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn level_label(level: RiskLevel) -> ColoredString {
    let label = level.to_string();
    match level {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red(),
        RiskLevel::Critical => label.red().bold(),
    }
}

fn trend_label(trend: Trend) -> ColoredString {
    let label = trend.to_string();
    match trend {
        Trend::Improving => label.green(),
        Trend::Deteriorating => label.red(),
        Trend::Stable => label.yellow(),
        Trend::Neutral => label.dimmed(),
    }
}
