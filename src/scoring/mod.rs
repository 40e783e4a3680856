//! Weighted project risk scoring.
//!
//! - [`weights`] — fixed category weights, sub-metric weights and level thresholds.
//! - [`scorer`] — [`RiskScorer`](scorer::RiskScorer), which maps a
//!   [`MetricsRecord`](crate::metrics::MetricsRecord) to a
//!   [`RiskAssessment`](crate::models::RiskAssessment).

pub mod scorer;
pub mod weights;
