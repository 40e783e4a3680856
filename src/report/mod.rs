//! Output for a scoring run.
//!
//! - [`terminal`] — colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//! - JSON output is the serialized [`RunReport`].

pub mod terminal;

use serde::Serialize;

use crate::models::{AlertChannels, AnomalyFlag, RiskAssessment, StatusUpdate};

/// Everything a run produces for one project.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub project_id: &'a str,
    pub risk: &'a RiskAssessment,
    pub status: &'a StatusUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<&'a [StatusUpdate]>,
    pub anomalies: &'a [AnomalyFlag],
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertSummary>,
}

/// What an alert for the latest assessment would carry.
#[derive(Debug, Serialize)]
pub struct AlertSummary {
    pub channels: AlertChannels,
    pub actions: Vec<String>,
}

impl<'a> RunReport<'a> {
    pub fn new(
        project_id: &'a str,
        risk: &'a RiskAssessment,
        status: &'a StatusUpdate,
        history: Option<&'a [StatusUpdate]>,
        anomalies: &'a [AnomalyFlag],
    ) -> Self {
        let alert = risk.alert_channels().map(|channels| AlertSummary {
            channels,
            actions: risk.actions(),
        });

        RunReport {
            project_id,
            risk,
            status,
            history,
            anomalies,
            recommendations: risk.recommendations(),
            alert,
        }
    }
}
