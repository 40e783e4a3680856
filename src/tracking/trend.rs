use serde::Deserialize;

use crate::models::Trend;

/// Slack applied at the slope threshold so that evenly spaced scores
/// (e.g. +0.05 per update) land on the threshold despite rounding.
const SLOPE_EPSILON: f64 = 1e-9;

/// Ordinary least-squares slope of `values` against their index positions `0..n`.
///
/// Returns `None` when the index variance is zero, i.e. fewer than two points.
pub fn least_squares_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        covariance += dx * (y - mean_y);
        variance += dx * dx;
    }

    if variance == 0.0 {
        return None;
    }
    Some(covariance / variance)
}

/// How much history feeds a trend and how steep a slope must be to count.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendWindow {
    /// Points regressed over, including the newest score.
    pub window: usize,
    /// Stored updates required before a trend is reported at all.
    pub min_history: usize,
    pub slope_threshold: f64,
}

impl Default for TrendWindow {
    fn default() -> Self {
        TrendWindow {
            window: 4,
            min_history: 2,
            slope_threshold: 0.05,
        }
    }
}

impl TrendWindow {
    /// Classify the trend of `current` given the previously stored scores (oldest first).
    pub fn classify(&self, history: &[f64], current: f64) -> Trend {
        if history.len() < self.min_history {
            return Trend::Neutral;
        }

        let keep = self.window.saturating_sub(1);
        let start = history.len().saturating_sub(keep);
        let mut points = history[start..].to_vec();
        points.push(current);

        match least_squares_slope(&points) {
            Some(slope) => self.classify_slope(slope),
            None => Trend::Neutral,
        }
    }

    pub fn classify_slope(&self, slope: f64) -> Trend {
        if slope >= self.slope_threshold - SLOPE_EPSILON {
            Trend::Improving
        } else if slope <= -self.slope_threshold + SLOPE_EPSILON {
            Trend::Deteriorating
        } else {
            Trend::Stable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_sequence(scores: &[f64]) -> Trend {
        let (current, history) = scores.split_last().unwrap();
        TrendWindow::default().classify(history, *current)
    }

    #[test]
    fn test_slope_of_line() {
        let slope = least_squares_slope(&[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_slope_needs_two_points() {
        assert_eq!(least_squares_slope(&[]), None);
        assert_eq!(least_squares_slope(&[0.4]), None);
        assert!(least_squares_slope(&[0.4, 0.5]).is_some());
    }

    #[test]
    fn test_rising_sequence_is_improving() {
        assert_eq!(classify_sequence(&[0.5, 0.55, 0.6, 0.65]), Trend::Improving);
    }

    #[test]
    fn test_falling_sequence_is_deteriorating() {
        assert_eq!(classify_sequence(&[0.65, 0.6, 0.55, 0.5]), Trend::Deteriorating);
    }

    #[test]
    fn test_constant_sequence_is_stable() {
        assert_eq!(classify_sequence(&[0.5, 0.5, 0.5, 0.5]), Trend::Stable);
    }

    #[test]
    fn test_short_history_is_neutral() {
        let window = TrendWindow::default();
        assert_eq!(window.classify(&[], 0.9), Trend::Neutral);
        assert_eq!(window.classify(&[0.1], 0.9), Trend::Neutral);
        assert_eq!(window.classify(&[0.1, 0.5], 0.9), Trend::Improving);
    }

    #[test]
    fn test_only_recent_scores_are_regressed() {
        // Older collapse is outside the 4-point window.
        let history = [0.9, 0.1, 0.5, 0.5, 0.5];
        assert_eq!(TrendWindow::default().classify(&history, 0.5), Trend::Stable);
    }

    #[test]
    fn test_wider_window_sees_more_history() {
        let window = TrendWindow {
            window: 6,
            ..TrendWindow::default()
        };
        let history = [0.9, 0.8, 0.5, 0.5, 0.5];
        assert_eq!(window.classify(&history, 0.5), Trend::Deteriorating);
    }

    #[test]
    fn test_small_slope_is_stable() {
        let window = TrendWindow::default();
        assert_eq!(window.classify_slope(0.049), Trend::Stable);
        assert_eq!(window.classify_slope(-0.049), Trend::Stable);
        assert_eq!(window.classify_slope(0.051), Trend::Improving);
        assert_eq!(window.classify_slope(-0.051), Trend::Deteriorating);
    }
}
