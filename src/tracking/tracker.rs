use chrono::Utc;

use crate::metrics::{Metric, MetricsRecord};
use crate::models::{AnomalyFlag, AnomalyKind, Severity, StatusUpdate};
use crate::scoring::scorer::round2;
use crate::tracking::store::{InMemoryStore, ProjectStore};
use crate::tracking::trend::TrendWindow;

/// Contribution of each metric to the health score. Sums to 1.0.
pub const HEALTH_WEIGHTS: [(Metric, f64); 5] = [
    (Metric::ScheduleVariance, 0.30),
    (Metric::BudgetVariance, 0.25),
    (Metric::ResourceChanges, 0.20),
    (Metric::QualityMetrics, 0.15),
    (Metric::StakeholderSatisfaction, 0.10),
];

const SCHEDULE_VARIANCE_LIMIT: f64 = 0.2;
const RESOURCE_CHANGES_LIMIT: f64 = 0.3;

/// Health score in `[0, 1]`, higher is better, rounded to two decimals.
///
/// Variance metrics are inverted (`1 - min(|v|, 1)`) so that a smaller
/// deviation contributes more health; other metrics are used as given.
pub fn health_score(metrics: &MetricsRecord) -> f64 {
    let score: f64 = HEALTH_WEIGHTS
        .iter()
        .map(|(metric, weight)| {
            let value = metrics.get(*metric);
            let value = match metric {
                Metric::ScheduleVariance | Metric::BudgetVariance => 1.0 - value.abs().min(1.0),
                _ => value,
            };
            value * weight
        })
        .sum();
    round2(score.clamp(0.0, 1.0))
}

/// Keeps a history of health scores per project and derives trends and anomalies from it.
pub struct ProjectTracker<S: ProjectStore = InMemoryStore> {
    store: S,
    trend: TrendWindow,
}

impl ProjectTracker<InMemoryStore> {
    pub fn new(trend: TrendWindow) -> Self {
        Self::with_store(InMemoryStore::new(), trend)
    }
}

impl<S: ProjectStore> ProjectTracker<S> {
    pub fn with_store(store: S, trend: TrendWindow) -> Self {
        Self { store, trend }
    }

    /// Score `metrics`, append the result to the project's history and return it.
    pub fn update_status(&mut self, project_id: &str, metrics: MetricsRecord) -> StatusUpdate {
        let state = self.store.get_or_create(project_id);

        let health = health_score(&metrics);
        let trend = self.trend.classify(&state.health_scores(), health);

        let update = StatusUpdate {
            timestamp: Utc::now(),
            metrics,
            health_score: health,
            trend,
        };
        state.history.push(update.clone());

        tracing::debug!(
            project_id,
            metrics = update.metrics.len(),
            health_score = health,
            trend = %trend,
            history = state.history.len(),
            "updated project status"
        );

        update
    }

    /// Most recent update for `project_id`, or `None` if it has never been updated.
    pub fn get_status(&self, project_id: &str) -> Option<&StatusUpdate> {
        self.store.get(project_id).and_then(|s| s.current_status())
    }

    pub fn history(&self, project_id: &str) -> &[StatusUpdate] {
        self.store
            .get(project_id)
            .map(|s| s.history.as_slice())
            .unwrap_or(&[])
    }

    pub fn project_ids(&self) -> Vec<String> {
        self.store.project_ids()
    }

    /// Threshold checks on the raw metrics of the current status.
    pub fn detect_anomalies(&self, project_id: &str) -> Vec<AnomalyFlag> {
        let mut anomalies = Vec::new();
        let Some(status) = self.get_status(project_id) else {
            return anomalies;
        };

        if status.metrics.get(Metric::ScheduleVariance) > SCHEDULE_VARIANCE_LIMIT {
            anomalies.push(AnomalyFlag {
                kind: AnomalyKind::Schedule,
                severity: Severity::High,
                message: "Significant schedule variance detected".to_string(),
            });
        }

        if status.metrics.get(Metric::ResourceChanges) > RESOURCE_CHANGES_LIMIT {
            anomalies.push(AnomalyFlag {
                kind: AnomalyKind::Resources,
                severity: Severity::Medium,
                message: "High resource turnover detected".to_string(),
            });
        }

        for anomaly in &anomalies {
            tracing::info!(
                project_id,
                kind = %anomaly.kind,
                severity = %anomaly.severity,
                "anomaly detected"
            );
        }

        anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;

    fn quality(q: f64) -> MetricsRecord {
        // With every other metric absent: health = 0.55 + 0.15 * q
        MetricsRecord::new().with(Metric::QualityMetrics, q)
    }

    #[test]
    fn test_health_weights_sum_to_one() {
        let total: f64 = HEALTH_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_health_score_of_empty_record() {
        // Zero variance counts as fully healthy for the two variance metrics.
        assert_eq!(health_score(&MetricsRecord::new()), 0.55);
    }

    #[test]
    fn test_health_score_inverts_variance() {
        let on_track = MetricsRecord::new().with(Metric::ScheduleVariance, 0.0);
        let behind = MetricsRecord::new().with(Metric::ScheduleVariance, 0.5);
        let way_behind = MetricsRecord::new().with(Metric::ScheduleVariance, -3.0);
        assert_eq!(health_score(&on_track), 0.55);
        assert_eq!(health_score(&behind), 0.4);
        assert_eq!(health_score(&way_behind), 0.25);
    }

    #[test]
    fn test_health_score_is_clamped() {
        let metrics = MetricsRecord::new()
            .with(Metric::QualityMetrics, 10.0)
            .with(Metric::StakeholderSatisfaction, 10.0);
        assert_eq!(health_score(&metrics), 1.0);
    }

    #[test]
    fn test_first_update_is_neutral() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        let update = tracker.update_status(
            "project-001",
            MetricsRecord::new().with(Metric::ScheduleVariance, 0.9),
        );
        assert_eq!(update.trend, Trend::Neutral);
        assert_eq!(tracker.history("project-001").len(), 1);
    }

    #[test]
    fn test_second_update_is_still_neutral() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status("p", quality(0.0));
        assert_eq!(tracker.update_status("p", quality(1.0)).trend, Trend::Neutral);
    }

    #[test]
    fn test_rising_health_is_improving() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        let mut last = None;
        // health 0.55, 0.60, 0.65, 0.70
        for q in [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0] {
            last = Some(tracker.update_status("p", quality(q)));
        }
        let scores: Vec<f64> = tracker.history("p").iter().map(|u| u.health_score).collect();
        assert_eq!(scores, vec![0.55, 0.6, 0.65, 0.7]);
        assert_eq!(last.unwrap().trend, Trend::Improving);
    }

    #[test]
    fn test_falling_health_is_deteriorating() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        let mut last = None;
        for q in [1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0] {
            last = Some(tracker.update_status("p", quality(q)));
        }
        assert_eq!(last.unwrap().trend, Trend::Deteriorating);
    }

    #[test]
    fn test_constant_health_is_stable() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        let mut last = None;
        for _ in 0..4 {
            last = Some(tracker.update_status("p", quality(0.5)));
        }
        assert_eq!(last.unwrap().trend, Trend::Stable);
    }

    #[test]
    fn test_get_status_returns_latest() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status("p", quality(0.0));
        tracker.update_status("p", quality(1.0));
        assert_eq!(tracker.get_status("p").unwrap().health_score, 0.7);
    }

    #[test]
    fn test_unknown_project_has_no_status() {
        let tracker = ProjectTracker::new(TrendWindow::default());
        assert!(tracker.get_status("nope").is_none());
        assert!(tracker.history("nope").is_empty());
        assert!(tracker.detect_anomalies("nope").is_empty());
    }

    #[test]
    fn test_projects_are_isolated() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status("a", quality(0.0));
        tracker.update_status("a", quality(0.0));
        let b = tracker.update_status("b", quality(1.0));
        assert_eq!(b.trend, Trend::Neutral);
        assert_eq!(tracker.project_ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_schedule_anomaly() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status("p", MetricsRecord::new().with(Metric::ScheduleVariance, 0.25));
        let anomalies = tracker.detect_anomalies("p");
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::Schedule);
        assert_eq!(anomalies[0].severity, Severity::High);
    }

    #[test]
    fn test_resource_anomaly() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status("p", MetricsRecord::new().with(Metric::ResourceChanges, 0.35));
        let anomalies = tracker.detect_anomalies("p");
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::Resources);
        assert_eq!(anomalies[0].severity, Severity::Medium);
    }

    #[test]
    fn test_no_anomaly_below_thresholds() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status(
            "p",
            MetricsRecord::new()
                .with(Metric::ScheduleVariance, 0.2)
                .with(Metric::ResourceChanges, 0.3),
        );
        assert!(tracker.detect_anomalies("p").is_empty());
    }

    #[test]
    fn test_anomalies_only_look_at_current_status() {
        let mut tracker = ProjectTracker::new(TrendWindow::default());
        tracker.update_status("p", MetricsRecord::new().with(Metric::ScheduleVariance, 0.9));
        tracker.update_status("p", MetricsRecord::new());
        assert!(tracker.detect_anomalies("p").is_empty());
    }

    #[test]
    fn test_custom_store_is_used() {
        #[derive(Default)]
        struct CountingStore {
            inner: InMemoryStore,
            creates: usize,
        }

        impl ProjectStore for CountingStore {
            fn get(&self, id: &str) -> Option<&crate::tracking::store::ProjectState> {
                self.inner.get(id)
            }
            fn get_or_create(&mut self, id: &str) -> &mut crate::tracking::store::ProjectState {
                self.creates += 1;
                self.inner.get_or_create(id)
            }
            fn project_ids(&self) -> Vec<String> {
                self.inner.project_ids()
            }
        }

        let mut tracker = ProjectTracker::with_store(CountingStore::default(), TrendWindow::default());
        tracker.update_status("p", quality(0.0));
        tracker.update_status("p", quality(0.0));
        assert_eq!(tracker.store.creates, 2);
    }
}
