use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::config::{ScoringConfig, MAX_WINDOW_DAYS};
use crate::models::{EventData, Goal, GoalStatus, ProgressEvent, ProgressScore};

pub const GOAL_WEIGHT: f64 = 0.5;
pub const WEEKLY_WEIGHT: f64 = 0.3;
pub const ACTIVITY_WEIGHT: f64 = 0.2;

/// Pure composite-score computation over a client's goals and events.
///
/// Sub-scores:
/// - goal: mean signed progress of active goals (each capped at 100, the
///   mean clamped to `[0, 100]`), `0` when there are none
/// - weekly: distinct UTC days with a qualifying event in the weekly window,
///   relative to the weekly target
/// - activity: qualifying events in the activity window, relative to the
///   activity target
///
/// Superseded events and unclassified markers never qualify.
#[derive(Debug, Clone)]
pub struct ProgressScorer {
    config: ScoringConfig,
}

impl ProgressScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn compute(
        &self,
        client_id: &str,
        goals: &[Goal],
        events: &[ProgressEvent],
        now: DateTime<Utc>,
    ) -> ProgressScore {
        let active_goals: Vec<&Goal> = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .collect();
        let qualifying: Vec<&ProgressEvent> = events.iter().filter(|e| qualifies(e)).collect();

        let goal_progress = goal_progress(&active_goals);
        let weekly_progress = self.weekly_progress(&qualifying, now);
        let activity_progress = self.activity_progress(&qualifying, now);

        let composite_score = (GOAL_WEIGHT * goal_progress
            + WEEKLY_WEIGHT * weekly_progress
            + ACTIVITY_WEIGHT * activity_progress)
            .clamp(0.0, 100.0);

        ProgressScore {
            client_id: client_id.to_string(),
            composite_score,
            goal_progress,
            weekly_progress,
            activity_progress,
            active_goals: active_goals.len(),
            events_considered: qualifying.len(),
            computed_at: now,
        }
    }

    fn weekly_progress(&self, events: &[&ProgressEvent], now: DateTime<Utc>) -> f64 {
        let days = self.config.weekly_window_days.clamp(1, MAX_WINDOW_DAYS);
        let start = now - Duration::days(days);
        let active_days: HashSet<_> = events
            .iter()
            .filter(|e| e.created_at > start && e.created_at <= now)
            .map(|e| e.created_at.date_naive())
            .collect();
        ratio_percent(active_days.len(), self.config.weekly_target_days)
    }

    fn activity_progress(&self, events: &[&ProgressEvent], now: DateTime<Utc>) -> f64 {
        let days = self.config.activity_window_days.clamp(1, MAX_WINDOW_DAYS);
        let start = now - Duration::days(days);
        let count = events
            .iter()
            .filter(|e| e.created_at > start && e.created_at <= now)
            .count();
        ratio_percent(count, self.config.activity_target_events)
    }
}

fn qualifies(event: &ProgressEvent) -> bool {
    !event.superseded && !matches!(event.data, EventData::Unclassified(_))
}

fn goal_progress(active_goals: &[&Goal]) -> f64 {
    if active_goals.is_empty() {
        return 0.0;
    }
    let total: f64 = active_goals.iter().map(|g| g.progress_percent()).sum();
    (total / active_goals.len() as f64).clamp(0.0, 100.0)
}

fn ratio_percent(count: usize, target: u32) -> f64 {
    if target == 0 {
        return if count > 0 { 100.0 } else { 0.0 };
    }
    100.0 * (count as f64 / target as f64).min(1.0)
}
