use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Composite progress breakdown, all values in `[0, 100]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressScore {
    pub client_id: String,
    pub composite_score: f64,
    pub goal_progress: f64,
    pub weekly_progress: f64,
    pub activity_progress: f64,
    pub active_goals: usize,
    pub events_considered: usize,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressFailure {
    pub client_id: String,
    pub error: String,
}

/// Outcome of a batch recalculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchProgressResult {
    pub updated: usize,
    pub failed: Vec<ProgressFailure>,
}
