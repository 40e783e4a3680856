use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsRecord;

/// Risk level derived from a composite risk score. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Financial,
    Schedule,
    Resources,
    Technical,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Financial,
        RiskCategory::Schedule,
        RiskCategory::Resources,
        RiskCategory::Technical,
    ];
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Financial => write!(f, "financial"),
            RiskCategory::Schedule => write!(f, "schedule"),
            RiskCategory::Resources => write!(f, "resources"),
            RiskCategory::Technical => write!(f, "technical"),
        }
    }
}

/// Per-category sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub financial: f64,
    pub schedule: f64,
    pub resources: f64,
    pub technical: f64,
}

impl RiskFactors {
    pub fn get(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Financial => self.financial,
            RiskCategory::Schedule => self.schedule,
            RiskCategory::Resources => self.resources,
            RiskCategory::Technical => self.technical,
        }
    }

    pub fn set(&mut self, category: RiskCategory, value: f64) {
        match category {
            RiskCategory::Financial => self.financial = value,
            RiskCategory::Schedule => self.schedule = value,
            RiskCategory::Resources => self.resources = value,
            RiskCategory::Technical => self.technical = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, f64)> + '_ {
        RiskCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub factors: RiskFactors,
    pub timestamp: DateTime<Utc>,
}

impl RiskAssessment {
    /// The `n` highest-scoring categories, most severe first. Ties keep category order.
    pub fn top_factors(&self, n: usize) -> Vec<(RiskCategory, f64)> {
        let mut factors: Vec<(RiskCategory, f64)> = self.factors.iter().collect();
        factors.sort_by(|a, b| b.1.total_cmp(&a.1));
        factors.truncate(n);
        factors
    }

    /// Mitigation recommendations for a risk report. Never empty.
    pub fn recommendations(&self) -> Vec<String> {
        let mut recommendations = Vec::new();

        if self.level >= RiskLevel::High {
            recommendations.push("Immediate executive review required");
        }
        if self.factors.financial > 0.5 {
            recommendations.push("Review project budget and payment terms");
        }
        if self.factors.schedule > 0.4 {
            recommendations.push("Re-evaluate project timeline and milestones");
        }
        if self.factors.resources > 0.3 {
            recommendations.push("Assess team composition and resource allocation");
        }
        if recommendations.is_empty() {
            recommendations.push("Continue current risk mitigation strategies");
        }

        recommendations.into_iter().map(str::to_string).collect()
    }

    /// Immediate action items attached to an alert. May be empty.
    pub fn actions(&self) -> Vec<String> {
        let mut actions = Vec::new();

        match self.level {
            RiskLevel::Critical => {
                actions.push("Escalate to senior leadership immediately");
                actions.push("Convene emergency risk mitigation meeting");
            }
            RiskLevel::High => actions.push("Schedule risk review meeting within 24 hours"),
            RiskLevel::Medium | RiskLevel::Low => {}
        }
        if self.factors.schedule > 0.6 {
            actions.push("Identify critical path tasks for acceleration");
        }
        if self.factors.financial > 0.7 {
            actions.push("Freeze non-essential project expenditures");
        }

        actions.into_iter().map(str::to_string).collect()
    }

    /// Channels an alert for this assessment would go out on; `None` below `medium`.
    pub fn alert_channels(&self) -> Option<AlertChannels> {
        match self.level {
            RiskLevel::Critical => Some(AlertChannels {
                email: true,
                sms: true,
            }),
            RiskLevel::High | RiskLevel::Medium => Some(AlertChannels {
                email: true,
                sms: false,
            }),
            RiskLevel::Low => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertChannels {
    pub email: bool,
    pub sms: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Deteriorating,
    Stable,
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Deteriorating => write!(f, "deteriorating"),
            Trend::Stable => write!(f, "stable"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// One entry in a project's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub timestamp: DateTime<Utc>,
    pub metrics: MetricsRecord,
    pub health_score: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Schedule,
    Resources,
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyKind::Schedule => write!(f, "schedule"),
            AnomalyKind::Resources => write!(f, "resources"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub message: String,
}
