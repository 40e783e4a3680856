use std::collections::HashMap;

use crate::models::StatusUpdate;

/// Everything recorded for a single project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    /// Oldest first.
    pub history: Vec<StatusUpdate>,
}

impl ProjectState {
    pub fn current_status(&self) -> Option<&StatusUpdate> {
        self.history.last()
    }

    /// Health scores of all stored updates, oldest first.
    pub fn health_scores(&self) -> Vec<f64> {
        self.history.iter().map(|u| u.health_score).collect()
    }
}

/// Storage for project state, keyed by an opaque project id.
///
/// Implementations are not required to be thread-safe; callers sharing a
/// store across threads must serialize updates to the same project.
pub trait ProjectStore {
    fn get(&self, project_id: &str) -> Option<&ProjectState>;

    /// Fetch the state for `project_id`, creating an empty one on first use.
    fn get_or_create(&mut self, project_id: &str) -> &mut ProjectState;

    fn project_ids(&self) -> Vec<String>;
}

/// Process-lifetime store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: HashMap<String, ProjectState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for InMemoryStore {
    fn get(&self, project_id: &str) -> Option<&ProjectState> {
        self.projects.get(project_id)
    }

    fn get_or_create(&mut self, project_id: &str) -> &mut ProjectState {
        if !self.projects.contains_key(project_id) {
            tracing::debug!(project_id, "tracking new project");
        }
        self.projects.entry(project_id.to_string()).or_default()
    }

    fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.projects.keys().cloned().collect();
        ids.sort();
        ids
    }
}
