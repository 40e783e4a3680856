use chrono::Utc;

use crate::metrics::MetricsRecord;
use crate::models::{RiskAssessment, RiskCategory, RiskFactors};
use crate::scoring::weights::{category_terms, level_for, CATEGORY_WEIGHTS};

/// Computes a [`RiskAssessment`] from a metrics snapshot.
///
/// Stateless apart from the fixed tables in [`crate::scoring::weights`]; the
/// only non-deterministic field of the result is its timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn weights(&self) -> &'static [(RiskCategory, f64)] {
        &CATEGORY_WEIGHTS
    }

    /// Weighted sub-score for one category, clamped to `[0, 1]`.
    pub fn category_score(&self, category: RiskCategory, metrics: &MetricsRecord) -> f64 {
        let raw: f64 = category_terms(category)
            .iter()
            .map(|t| {
                let value = metrics.get(t.metric);
                let value = if t.magnitude { value.abs() } else { value };
                value * t.weight
            })
            .sum();
        raw.clamp(0.0, 1.0)
    }

    pub fn calculate_project_risk(&self, metrics: &MetricsRecord) -> RiskAssessment {
        let mut factors = RiskFactors::default();
        let mut total = 0.0;

        for (category, weight) in self.weights() {
            let score = self.category_score(*category, metrics);
            factors.set(*category, score);
            total += score * weight;
        }

        // Level is read from the unrounded total; only the reported score is rounded.
        let level = level_for(total);
        let score = round2(total);

        tracing::debug!(score, level = %level, "calculated project risk");

        RiskAssessment {
            score,
            level,
            factors,
            timestamp: Utc::now(),
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;
    use crate::models::RiskLevel;

    fn typical_project() -> MetricsRecord {
        MetricsRecord::new()
            .with(Metric::BudgetVariance, 0.15)
            .with(Metric::PaymentDelays, 1.0)
            .with(Metric::ScheduleDelay, 0.2)
            .with(Metric::MissedMilestones, 0.0)
            .with(Metric::AttritionRate, 0.1)
            .with(Metric::SkillGaps, 0.05)
            .with(Metric::DefectRate, 0.08)
            .with(Metric::TechDebt, 0.1)
    }

    #[test]
    fn test_risk_calculation() {
        let result = RiskScorer::new().calculate_project_risk(&typical_project());

        // financial 0.575, schedule 0.14, resources 0.08, technical 0.09
        assert!((result.factors.financial - 0.575).abs() < 1e-9);
        assert!((result.factors.schedule - 0.14).abs() < 1e-9);
        assert!((result.factors.resources - 0.08).abs() < 1e-9);
        assert!((result.factors.technical - 0.09).abs() < 1e-9);
        // 0.23 + 0.042 + 0.016 + 0.009 = 0.297
        assert_eq!(result.score, 0.3);
        assert_eq!(result.level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let result = RiskScorer::new().calculate_project_risk(&MetricsRecord::new());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.level, RiskLevel::Low);
        assert_eq!(result.factors, RiskFactors::default());
    }

    #[test]
    fn test_factors_clamped_to_unit_interval() {
        let metrics = MetricsRecord::new()
            .with(Metric::PaymentDelays, 5.0)
            .with(Metric::MissedMilestones, 12.0)
            .with(Metric::AttritionRate, -3.0)
            .with(Metric::TechDebt, 40.0);
        let result = RiskScorer::new().calculate_project_risk(&metrics);

        for (_, value) in result.factors.iter() {
            assert!((0.0..=1.0).contains(&value));
        }
        assert_eq!(result.factors.financial, 1.0);
        assert_eq!(result.factors.resources, 0.0);
        assert!((0.0..=1.0).contains(&result.score));
    }

    #[test]
    fn test_negative_budget_variance_counts_as_risk() {
        let scorer = RiskScorer::new();
        let over = MetricsRecord::new().with(Metric::BudgetVariance, 0.4);
        let under = MetricsRecord::new().with(Metric::BudgetVariance, -0.4);
        assert_eq!(
            scorer.category_score(RiskCategory::Financial, &over),
            scorer.category_score(RiskCategory::Financial, &under)
        );
    }

    #[test]
    fn test_every_category_saturated_is_critical() {
        let metrics = MetricsRecord::new()
            .with(Metric::PaymentDelays, 2.0)
            .with(Metric::ScheduleDelay, 2.0)
            .with(Metric::AttritionRate, 2.0)
            .with(Metric::DefectRate, 2.0);
        let result = RiskScorer::new().calculate_project_risk(&metrics);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.level, RiskLevel::Critical);
    }

    #[test]
    fn test_financial_and_schedule_saturated_reach_high() {
        // 0.4 + 0.3 = 0.7
        let metrics = MetricsRecord::new()
            .with(Metric::PaymentDelays, 3.0)
            .with(Metric::MissedMilestones, 4.0);
        let result = RiskScorer::new().calculate_project_risk(&metrics);
        assert_eq!(result.score, 0.7);
        assert_eq!(result.level, RiskLevel::High);
    }

    #[test]
    fn test_level_uses_unrounded_total() {
        // 0.4 + 0.3 + 0.49 * 0.2 = 0.798, reported as 0.8 but still below critical
        let metrics = MetricsRecord::new()
            .with(Metric::PaymentDelays, 2.0)
            .with(Metric::ScheduleDelay, 2.0)
            .with(Metric::SkillGaps, 1.225);
        let result = RiskScorer::new().calculate_project_risk(&metrics);
        assert_eq!(result.score, 0.8);
        assert_eq!(result.level, RiskLevel::High);
    }

    #[test]
    fn test_identical_input_gives_identical_verdict() {
        let scorer = RiskScorer::new();
        let a = scorer.calculate_project_risk(&typical_project());
        let b = scorer.calculate_project_risk(&typical_project());
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.factors, b.factors);
    }

    #[test]
    fn test_timestamp_serializes_as_rfc3339() {
        let result = RiskScorer::new().calculate_project_risk(&typical_project());
        let json = serde_json::to_value(&result).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.297), 0.3);
        assert_eq!(round2(0.554), 0.55);
        assert_eq!(round2(0.0), 0.0);
    }
}
