use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::config::{ScoringConfig, MAX_WINDOW_DAYS};
use crate::db::{DatabaseBackend, EventQuery};
use crate::error::{Result, WellioError};
use crate::intelligence::ProgressScorer;
use crate::models::{BatchProgressResult, ProgressFailure, ProgressScore};

/// Computes and persists client progress scores.
#[derive(Clone)]
pub struct ProgressService {
    db: Arc<dyn DatabaseBackend>,
    scorer: ProgressScorer,
    lookback_days: i64,
}

impl ProgressService {
    pub fn new(db: Arc<dyn DatabaseBackend>, config: ScoringConfig) -> Self {
        let lookback_days = config
            .weekly_window_days
            .max(config.activity_window_days)
            .clamp(1, MAX_WINDOW_DAYS);
        Self {
            db,
            scorer: ProgressScorer::new(config),
            lookback_days,
        }
    }

    /// Compute the current score without writing it.
    pub async fn compute(&self, client_id: &str) -> Result<ProgressScore> {
        if self.db.get_client(client_id).await?.is_none() {
            return Err(WellioError::NotFound(format!("Client {client_id} not found")));
        }

        let now = Utc::now();
        let goals = self.db.list_goals(client_id, None).await?;
        let events = self
            .db
            .list_events(
                client_id,
                &EventQuery {
                    since: Some(now - Duration::days(self.lookback_days)),
                    ..Default::default()
                },
            )
            .await?;

        Ok(self.scorer.compute(client_id, &goals, &events, now))
    }

    /// Compute and store the composite score on the client record.
    pub async fn update_one(&self, client_id: &str) -> Result<ProgressScore> {
        let score = self.compute(client_id).await?;
        self.db
            .update_progress_score(client_id, score.composite_score, score.computed_at)
            .await?;

        debug!(
            client_id = %client_id,
            composite = score.composite_score,
            "Progress score updated"
        );
        Ok(score)
    }

    /// Recalculate every active client, optionally scoped to one coach.
    /// A failing client is recorded and the batch continues.
    pub async fn update_all(&self, coach_id: Option<&str>) -> Result<BatchProgressResult> {
        let clients = self.db.list_clients(coach_id, false).await?;
        let mut result = BatchProgressResult::default();

        for client in clients {
            match self.update_one(&client.id).await {
                Ok(_) => result.updated += 1,
                Err(e) => {
                    warn!(client_id = %client.id, error = %e, "Progress recalculation failed");
                    result.failed.push(ProgressFailure {
                        client_id: client.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            updated = result.updated,
            failed = result.failed.len(),
            "Batch progress recalculation complete"
        );
        Ok(result)
    }

    /// Fire-and-forget recalculation after new events arrive.
    pub fn spawn_update(&self, client_id: &str) {
        let service = self.clone();
        let client_id = client_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = service.update_one(&client_id).await {
                error!(client_id = %client_id, error = %e, "Background progress update failed");
            }
        });
    }
}

/// Periodically refreshes every client's stored progress score.
#[derive(Clone)]
pub struct ProgressRefreshManager {
    progress: ProgressService,
    interval_secs: u64,
}

impl ProgressRefreshManager {
    pub fn new(progress: ProgressService, interval_secs: u64) -> Self {
        Self {
            progress,
            interval_secs,
        }
    }

    pub async fn run_once(&self) -> Result<BatchProgressResult> {
        info!("Starting progress refresh");
        self.progress.update_all(None).await
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, EventData, EventSource, Goal, MoodData, ProgressEvent};
    use crate::services::test_support::test_backend;

    #[tokio::test]
    async fn test_compute_unknown_client() {
        let (db, _dir) = test_backend().await;
        let service = ProgressService::new(db, ScoringConfig::default());

        let result = service.compute("ghost").await;
        assert!(matches!(result, Err(WellioError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_no_goals_no_events_scores_zero() {
        let (db, _dir) = test_backend().await;
        db.create_client(&Client::new("c1".into(), "coach".into(), "Dana".into()))
            .await
            .unwrap();
        let service = ProgressService::new(db.clone(), ScoringConfig::default());

        let score = service.update_one("c1").await.unwrap();
        assert_eq!(score.composite_score, 0.0);
        assert_eq!(score.goal_progress, 0.0);

        let stored = db.get_client("c1").await.unwrap().unwrap();
        assert_eq!(stored.progress_score, Some(0.0));
    }

    #[tokio::test]
    async fn test_update_one_persists_composite() {
        let (db, _dir) = test_backend().await;
        db.create_client(&Client::new("c1".into(), "coach".into(), "Dana".into()))
            .await
            .unwrap();
        let mut goal = Goal::new("g1".into(), "c1".into(), "weight".into(), 90.0, 80.0);
        goal.current_value = 85.0;
        db.create_goal(&goal).await.unwrap();
        db.create_events(&[ProgressEvent::new(
            "c1".into(),
            EventData::Mood(MoodData {
                score: Some(7.0),
                ..Default::default()
            }),
            EventSource::Explicit,
            Utc::now(),
        )])
        .await
        .unwrap();

        let service = ProgressService::new(db.clone(), ScoringConfig::default());
        let score = service.update_one("c1").await.unwrap();

        assert_eq!(score.goal_progress, 50.0);
        assert!(score.weekly_progress > 0.0);
        assert!(score.composite_score > 25.0);
        let stored = db.get_client("c1").await.unwrap().unwrap();
        assert_eq!(stored.progress_score, Some(score.composite_score));
    }

    #[tokio::test]
    async fn test_refresh_manager_covers_all_active_clients() {
        let (db, _dir) = test_backend().await;
        for id in ["c1", "c2"] {
            db.create_client(&Client::new(id.into(), "coach".into(), id.into()))
                .await
                .unwrap();
        }
        db.archive_client("c2", Utc::now()).await.unwrap();

        let manager =
            ProgressRefreshManager::new(ProgressService::new(db, ScoringConfig::default()), 60);
        let result = manager.run_once().await.unwrap();

        assert_eq!(result.updated, 1);
        assert!(result.failed.is_empty());
        assert_eq!(manager.interval_secs(), 60);
    }
}
