//! Per-project health history and trend detection.
//!
//! - [`store`] — the [`ProjectStore`](store::ProjectStore) seam and its in-memory implementation.
//! - [`trend`] — least-squares slope over a short window and trend classification.
//! - [`tracker`] — [`ProjectTracker`](tracker::ProjectTracker): health scoring, history, anomalies.

pub mod store;
pub mod tracker;
pub mod trend;
