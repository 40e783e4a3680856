use crate::metrics::Metric;
use crate::models::{RiskCategory, RiskLevel};

/// One weighted input to a category sub-score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTerm {
    pub metric: Metric,
    pub weight: f64,
    /// Use `|value|` instead of the signed value (variances can be negative).
    pub magnitude: bool,
}

const fn term(metric: Metric, weight: f64) -> MetricTerm {
    MetricTerm {
        metric,
        weight,
        magnitude: false,
    }
}

const fn abs_term(metric: Metric, weight: f64) -> MetricTerm {
    MetricTerm {
        metric,
        weight,
        magnitude: true,
    }
}

/// Contribution of each category to the composite risk score. Sums to 1.0.
pub const CATEGORY_WEIGHTS: [(RiskCategory, f64); 4] = [
    (RiskCategory::Financial, 0.4),
    (RiskCategory::Schedule, 0.3),
    (RiskCategory::Resources, 0.2),
    (RiskCategory::Technical, 0.1),
];

/// Lower bound of each level, checked from most to least severe. Anything below is `Low`.
pub const LEVEL_THRESHOLDS: [(RiskLevel, f64); 3] = [
    (RiskLevel::Critical, 0.8),
    (RiskLevel::High, 0.6),
    (RiskLevel::Medium, 0.4),
];

pub fn category_weight(category: RiskCategory) -> f64 {
    CATEGORY_WEIGHTS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, w)| *w)
        .unwrap_or(0.0)
}

/// Metrics feeding a category sub-score.
pub fn category_terms(category: RiskCategory) -> [MetricTerm; 2] {
    match category {
        RiskCategory::Financial => [
            abs_term(Metric::BudgetVariance, 0.5),
            term(Metric::PaymentDelays, 0.5),
        ],
        RiskCategory::Schedule => [
            term(Metric::ScheduleDelay, 0.7),
            term(Metric::MissedMilestones, 0.3),
        ],
        RiskCategory::Resources => [
            term(Metric::AttritionRate, 0.6),
            term(Metric::SkillGaps, 0.4),
        ],
        RiskCategory::Technical => [
            term(Metric::DefectRate, 0.5),
            term(Metric::TechDebt, 0.5),
        ],
    }
}

/// Map a composite score to its level; first threshold met wins.
pub fn level_for(score: f64) -> RiskLevel {
    LEVEL_THRESHOLDS
        .iter()
        .find(|(_, min)| score >= *min)
        .map(|(level, _)| *level)
        .unwrap_or(RiskLevel::Low)
}
