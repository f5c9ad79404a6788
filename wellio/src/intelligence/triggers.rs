use chrono::{DateTime, Duration, Utc};

use crate::config::MAX_WINDOW_DAYS;

use crate::models::{EngagementTrigger, EventData, ProgressEvent, Severity, TriggerType};

const WORKOUT_GROUP_SIZE: usize = 5;
/// Number of latest workouts the missed-workout rule compares.
pub const WORKOUT_HISTORY: usize = WORKOUT_GROUP_SIZE * 2;
/// Recent workout rate below this fraction of the older rate counts as a drop.
const WORKOUT_RATE_DROP: f64 = 0.5;

/// Rule-based engagement checks over a client's recent events.
///
/// Each rule fires at most once per call. Deduplication against triggers
/// that are already open happens in the engagement service.
#[derive(Debug, Clone)]
pub struct TriggerEvaluator {
    inactivity_days: i64,
}

impl TriggerEvaluator {
    pub fn new(inactivity_days: i64) -> Self {
        Self {
            inactivity_days: inactivity_days.clamp(1, MAX_WINDOW_DAYS),
        }
    }

    pub fn detect(
        &self,
        client_id: &str,
        events: &[ProgressEvent],
        now: DateTime<Utc>,
    ) -> Vec<EngagementTrigger> {
        // Superseded events, unclassified markers and timestamps ahead of
        // `now` say nothing about what the client actually did.
        let active: Vec<&ProgressEvent> = events
            .iter()
            .filter(|e| {
                !e.superseded
                    && !matches!(e.data, EventData::Unclassified(_))
                    && e.created_at <= now
            })
            .collect();
        if active.is_empty() {
            return Vec::new();
        }

        let mut triggers = Vec::new();

        if let Some(trigger) = self.check_inactivity(client_id, &active, now) {
            triggers.push(trigger);
        }

        if let Some(trigger) = check_missed_workouts(client_id, &active, now) {
            triggers.push(trigger);
        }

        triggers
    }

    fn check_inactivity(
        &self,
        client_id: &str,
        events: &[&ProgressEvent],
        now: DateTime<Utc>,
    ) -> Option<EngagementTrigger> {
        let latest = events.iter().map(|e| e.created_at).max()?;
        let cutoff = now - Duration::days(self.inactivity_days);
        if latest > cutoff {
            return None;
        }

        let idle_days = (now - latest).num_days();
        Some(EngagementTrigger::new(
            client_id.to_string(),
            TriggerType::Inactivity,
            Severity::High,
            format!(
                "No activity logged in the last {} days (last event {} days ago)",
                self.inactivity_days, idle_days
            ),
            "Reach out with a check-in message".to_string(),
            now,
        ))
    }
}

/// Compare the pace of the latest five workouts against the five before.
fn check_missed_workouts(
    client_id: &str,
    events: &[&ProgressEvent],
    now: DateTime<Utc>,
) -> Option<EngagementTrigger> {
    let mut workouts: Vec<DateTime<Utc>> = events
        .iter()
        .filter(|e| e.is_exercise())
        .map(|e| e.created_at)
        .collect();
    if workouts.len() < WORKOUT_HISTORY {
        return None;
    }
    workouts.sort_unstable_by(|a, b| b.cmp(a));

    let recent_oldest = workouts[WORKOUT_GROUP_SIZE - 1];
    let older_oldest = workouts[WORKOUT_HISTORY - 1];

    // Both groups hold the same number of workouts, so the rates compare
    // inversely to the time each group spans.
    let recent_span = (now - recent_oldest).num_seconds() as f64;
    let older_span = (recent_oldest - older_oldest).num_seconds() as f64;
    if older_span <= 0.0 || recent_span <= 0.0 {
        return None;
    }

    let recent_rate = WORKOUT_GROUP_SIZE as f64 / recent_span;
    let older_rate = WORKOUT_GROUP_SIZE as f64 / older_span;
    if recent_rate >= WORKOUT_RATE_DROP * older_rate {
        return None;
    }

    let recent_days = (recent_span / 86_400.0).ceil() as i64;
    let older_days = (older_span / 86_400.0).ceil() as i64;
    Some(EngagementTrigger::new(
        client_id.to_string(),
        TriggerType::MissedWorkout,
        Severity::Medium,
        format!(
            "Workout frequency dropped: last {WORKOUT_GROUP_SIZE} workouts took {recent_days} days, \
             the {WORKOUT_GROUP_SIZE} before took {older_days} days"
        ),
        "Review the training plan with the client".to_string(),
        now,
    ))
}
