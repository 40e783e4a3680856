//! Recognized metric names and the record type both scorers read from.
//!
//! - [`Metric`] — every metric name the crate understands.
//! - [`MetricsRecord`] — a validated snapshot; missing metrics read as `0.0`.
//! - [`loader`] — reads snapshot files (JSON or TOML) into records.

pub mod loader;

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A metric name recognized by [`crate::scoring`] or [`crate::tracking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    // Risk scoring
    BudgetVariance,
    PaymentDelays,
    ScheduleDelay,
    MissedMilestones,
    AttritionRate,
    SkillGaps,
    DefectRate,
    TechDebt,
    // Health tracking (budget_variance is shared)
    ScheduleVariance,
    ResourceChanges,
    QualityMetrics,
    StakeholderSatisfaction,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::BudgetVariance,
        Metric::PaymentDelays,
        Metric::ScheduleDelay,
        Metric::MissedMilestones,
        Metric::AttritionRate,
        Metric::SkillGaps,
        Metric::DefectRate,
        Metric::TechDebt,
        Metric::ScheduleVariance,
        Metric::ResourceChanges,
        Metric::QualityMetrics,
        Metric::StakeholderSatisfaction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::BudgetVariance => "budget_variance",
            Metric::PaymentDelays => "payment_delays",
            Metric::ScheduleDelay => "schedule_delay",
            Metric::MissedMilestones => "missed_milestones",
            Metric::AttritionRate => "attrition_rate",
            Metric::SkillGaps => "skill_gaps",
            Metric::DefectRate => "defect_rate",
            Metric::TechDebt => "tech_debt",
            Metric::ScheduleVariance => "schedule_variance",
            Metric::ResourceChanges => "resource_changes",
            Metric::QualityMetrics => "quality_metrics",
            Metric::StakeholderSatisfaction => "stakeholder_satisfaction",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MetricsError::UnknownMetric(s.to_string()))
    }
}

/// Errors raised while turning raw name/value pairs into a [`MetricsRecord`].
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),

    #[error("metric `{metric}` has non-finite value {value}")]
    NonFinite { metric: Metric, value: f64 },
}

/// What to do with metric names outside the [`Metric`] vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownMetricPolicy {
    /// Drop the entry and log a warning.
    #[default]
    Ignore,
    /// Fail with [`MetricsError::UnknownMetric`].
    Reject,
}

/// One snapshot of project metrics.
///
/// Deserializing goes through [`MetricsRecord::from_raw`] with
/// [`UnknownMetricPolicy::Reject`], so unknown names and non-finite values
/// are errors there too.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricsRecord {
    values: BTreeMap<Metric, f64>,
}

impl MetricsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an untyped map, applying `policy` to unrecognized names.
    pub fn from_raw(
        raw: HashMap<String, f64>,
        policy: UnknownMetricPolicy,
    ) -> Result<Self, MetricsError> {
        let mut record = MetricsRecord::new();

        // Sorted so that `Reject` reports the same key on every run.
        let mut entries: Vec<(String, f64)> = raw.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, value) in entries {
            match name.parse::<Metric>() {
                Ok(metric) => record.try_set(metric, value)?,
                Err(err) => match policy {
                    UnknownMetricPolicy::Reject => return Err(err),
                    UnknownMetricPolicy::Ignore => {
                        tracing::warn!(metric = %name, "ignoring unknown metric");
                    }
                },
            }
        }

        Ok(record)
    }

    #[cfg(test)]
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn try_set(&mut self, metric: Metric, value: f64) -> Result<(), MetricsError> {
        if !value.is_finite() {
            return Err(MetricsError::NonFinite { metric, value });
        }
        self.values.insert(metric, value);
        Ok(())
    }

    /// Stored value, or `0.0` when the metric was not supplied.
    pub fn get(&self, metric: Metric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }
}

impl<'de> Deserialize<'de> for MetricsRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, f64>::deserialize(deserializer)?;
        MetricsRecord::from_raw(raw, UnknownMetricPolicy::Reject).map_err(serde::de::Error::custom)
    }
}
