use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::metrics::UnknownMetricPolicy;
use crate::models::RiskLevel;
use crate::tracking::trend::TrendWindow;

/// Root configuration structure, deserialized from `.project-risk/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exit-code and input policy.
    pub policy: PolicyConfig,
    /// Trend window used by the project tracker.
    pub trend: TrendWindow,
}

/// Defines how a run is judged and how strictly input is read.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// The CLI exits with code 1 when the latest risk level is at or above this.
    /// Defaults to `high`.
    pub fail_on: RiskLevel,
    /// Handling of metric names outside the known vocabulary. Defaults to `ignore`.
    pub unknown_metrics: UnknownMetricPolicy,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            fail_on: RiskLevel::High,
            unknown_metrics: UnknownMetricPolicy::Ignore,
        }
    }
}

impl Config {
    /// Whether a run whose latest assessment is `level` should fail.
    pub fn fails(&self, level: RiskLevel) -> bool {
        level >= self.policy.fail_on
    }

    fn validate(self) -> Result<Self> {
        ensure!(
            self.trend.window >= 2,
            "trend.window must be at least 2 (got {})",
            self.trend.window
        );
        ensure!(
            self.trend.slope_threshold.is_finite() && self.trend.slope_threshold > 0.0,
            "trend.slope_threshold must be a positive number (got {})",
            self.trend.slope_threshold
        );
        Ok(self)
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    config.validate()
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_path>/.project-risk/config.toml`
/// 3. `~/.config/project-risk/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = base_path.join(".project-risk").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("project-risk")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}
