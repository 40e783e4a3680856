use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "project-risk",
    about = "Score project risk from metric snapshots and track health trends",
    version
)]
pub struct Cli {
    /// Metric snapshot files (JSON or TOML), oldest first
    #[arg(required = true, value_name = "SNAPSHOT")]
    pub snapshots: Vec<PathBuf>,

    /// Project id [default: file stem of the first snapshot]
    #[arg(long, value_name = "ID")]
    pub project: Option<String>,

    /// Config file [default: ./.project-risk/config.toml, fallback ~/.config/project-risk/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Reject metric names outside the known vocabulary
    #[arg(long)]
    pub strict: bool,

    /// Show the full status history
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Explicit `--project`, else the first snapshot's file stem.
    pub fn project_id(&self) -> String {
        if let Some(id) = &self.project {
            return id.clone();
        }
        self.snapshots
            .first()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("project")
            .to_string()
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
