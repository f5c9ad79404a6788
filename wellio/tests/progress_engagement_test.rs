mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;

use wellio::config::{EngagementConfig, ScoringConfig};
use wellio::db::{
    ClientStore, DatabaseBackend, EventQuery, EventStore, GoalStore, SmartLogStore, TriggerStore,
};
use wellio::error::{Result, WellioError};
use wellio::models::{
    Client, EngagementTrigger, Goal, GoalStatus, ProgressEvent, SmartLog, TriggerType,
};
use wellio::services::{EngagementMonitor, EngagementService, ProgressRefreshManager, ProgressService};

use common::{seed_client, test_db, workout_at};

/// Delegates to a real backend but fails every goal lookup for one client.
struct BrokenGoalsBackend {
    inner: Arc<dyn DatabaseBackend>,
    broken_client: String,
}

#[async_trait]
impl ClientStore for BrokenGoalsBackend {
    async fn create_client(&self, client: &Client) -> Result<()> {
        self.inner.create_client(client).await
    }
    async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        self.inner.get_client(id).await
    }
    async fn list_clients(
        &self,
        coach_id: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Client>> {
        self.inner.list_clients(coach_id, include_archived).await
    }
    async fn update_client_profile(&self, client: &Client) -> Result<bool> {
        self.inner.update_client_profile(client).await
    }
    async fn archive_client(&self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        self.inner.archive_client(id, at).await
    }
    async fn update_progress_score(&self, id: &str, score: f64, at: DateTime<Utc>) -> Result<bool> {
        self.inner.update_progress_score(id, score, at).await
    }
}

#[async_trait]
impl GoalStore for BrokenGoalsBackend {
    async fn create_goal(&self, goal: &Goal) -> Result<()> {
        self.inner.create_goal(goal).await
    }
    async fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        self.inner.get_goal(id).await
    }
    async fn list_goals(&self, client_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        if client_id == self.broken_client {
            return Err(WellioError::Internal("goal table unavailable".to_string()));
        }
        self.inner.list_goals(client_id, status).await
    }
    async fn update_goal(&self, goal: &Goal) -> Result<bool> {
        self.inner.update_goal(goal).await
    }
}

#[async_trait]
impl EventStore for BrokenGoalsBackend {
    async fn create_events(&self, events: &[ProgressEvent]) -> Result<()> {
        self.inner.create_events(events).await
    }
    async fn get_event(&self, id: &str) -> Result<Option<ProgressEvent>> {
        self.inner.get_event(id).await
    }
    async fn list_events(&self, client_id: &str, query: &EventQuery) -> Result<Vec<ProgressEvent>> {
        self.inner.list_events(client_id, query).await
    }
    async fn list_events_by_smart_log(
        &self,
        smart_log_id: &str,
        include_superseded: bool,
    ) -> Result<Vec<ProgressEvent>> {
        self.inner
            .list_events_by_smart_log(smart_log_id, include_superseded)
            .await
    }
    async fn update_event_correction(&self, event: &ProgressEvent) -> Result<bool> {
        self.inner.update_event_correction(event).await
    }
}

#[async_trait]
impl SmartLogStore for BrokenGoalsBackend {
    async fn create_smart_log(&self, log: &SmartLog) -> Result<()> {
        self.inner.create_smart_log(log).await
    }
    async fn get_smart_log(&self, id: &str) -> Result<Option<SmartLog>> {
        self.inner.get_smart_log(id).await
    }
    async fn list_smart_logs(&self, client_id: &str, limit: u32) -> Result<Vec<SmartLog>> {
        self.inner.list_smart_logs(client_id, limit).await
    }
    async fn mark_smart_log_empty(&self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        self.inner.mark_smart_log_empty(id, at).await
    }
    async fn record_smart_log_failure(
        &self,
        id: &str,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.inner.record_smart_log_failure(id, error, at).await
    }
    async fn record_smart_log_result(
        &self,
        id: &str,
        events: &[ProgressEvent],
        at: DateTime<Utc>,
    ) -> Result<SmartLog> {
        self.inner.record_smart_log_result(id, events, at).await
    }
}

#[async_trait]
impl TriggerStore for BrokenGoalsBackend {
    async fn create_trigger(&self, trigger: &EngagementTrigger) -> Result<()> {
        self.inner.create_trigger(trigger).await
    }
    async fn get_trigger(&self, id: &str) -> Result<Option<EngagementTrigger>> {
        self.inner.get_trigger(id).await
    }
    async fn list_triggers(
        &self,
        client_id: &str,
        include_resolved: bool,
    ) -> Result<Vec<EngagementTrigger>> {
        self.inner.list_triggers(client_id, include_resolved).await
    }
    async fn resolve_trigger(&self, id: &str, resolved_by: &str, at: DateTime<Utc>) -> Result<bool> {
        self.inner.resolve_trigger(id, resolved_by, at).await
    }
}

#[async_trait]
impl DatabaseBackend for BrokenGoalsBackend {
    async fn sync(&self) -> Result<()> {
        self.inner.sync().await
    }
}

#[tokio::test]
async fn test_batch_update_continues_past_failing_client() {
    let (inner, _dir) = test_db().await;
    seed_client(&inner, "a", "coach-1").await;
    seed_client(&inner, "b", "coach-1").await;
    seed_client(&inner, "c", "coach-1").await;

    let db: Arc<dyn DatabaseBackend> = Arc::new(BrokenGoalsBackend {
        inner: inner.clone(),
        broken_client: "b".to_string(),
    });
    let progress = ProgressService::new(db, ScoringConfig::default());

    let result = progress.update_all(None).await.unwrap();

    assert_eq!(result.updated, 2);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].client_id, "b");
    assert!(inner.get_client("a").await.unwrap().unwrap().progress_score.is_some());
    assert!(inner.get_client("b").await.unwrap().unwrap().progress_score.is_none());
    assert!(inner.get_client("c").await.unwrap().unwrap().progress_score.is_some());
}

#[tokio::test]
async fn test_batch_update_scoped_to_coach_and_skips_archived() {
    let (db, _dir) = test_db().await;
    seed_client(&db, "a", "coach-1").await;
    seed_client(&db, "b", "coach-2").await;
    seed_client(&db, "gone", "coach-1").await;
    db.archive_client("gone", Utc::now()).await.unwrap();

    let progress = ProgressService::new(db.clone(), ScoringConfig::default());
    let result = progress.update_all(Some("coach-1")).await.unwrap();

    assert_eq!(result.updated, 1);
    assert!(result.failed.is_empty());
    assert!(db.get_client("b").await.unwrap().unwrap().progress_score.is_none());
    assert!(db.get_client("gone").await.unwrap().unwrap().progress_score.is_none());
}

#[tokio::test]
async fn test_score_stays_in_range_with_heavy_activity() {
    let (db, _dir) = test_db().await;
    seed_client(&db, "a", "coach-1").await;
    let mut goal = Goal::new("g1".into(), "a".into(), "steps".into(), 1000.0, 10000.0);
    goal.current_value = 25000.0;
    db.create_goal(&goal).await.unwrap();

    let now = Utc::now();
    let events: Vec<ProgressEvent> = (0..60)
        .map(|i| workout_at("a", now - Duration::hours(i * 6)))
        .collect();
    db.create_events(&events).await.unwrap();

    let manager =
        ProgressRefreshManager::new(ProgressService::new(db.clone(), ScoringConfig::default()), 60);
    let result = manager.run_once().await.unwrap();
    assert_eq!(result.updated, 1);

    let score = db.get_client("a").await.unwrap().unwrap().progress_score.unwrap();
    assert!((0.0..=100.0).contains(&score), "score out of range: {score}");
    assert!((score - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_monitor_opens_each_trigger_once() {
    let (db, _dir) = test_db().await;
    seed_client(&db, "idle", "coach-1").await;
    seed_client(&db, "busy", "coach-1").await;
    seed_client(&db, "new", "coach-1").await;

    let now = Utc::now();
    db.create_events(&[workout_at("idle", now - Duration::days(10))])
        .await
        .unwrap();
    db.create_events(&[workout_at("busy", now - Duration::hours(2))])
        .await
        .unwrap();

    let engagement = EngagementService::new(db.clone(), &EngagementConfig::default());
    let monitor = EngagementMonitor::new(db.clone(), engagement.clone(), 3600);

    assert_eq!(monitor.run_once().await.unwrap(), 1);
    assert_eq!(monitor.run_once().await.unwrap(), 0);

    let open = engagement.list("idle", false).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].trigger_type, TriggerType::Inactivity);
    assert!(engagement.list("busy", false).await.unwrap().is_empty());
    assert!(engagement.list("new", false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_is_idempotent_and_requires_coach() {
    let (db, _dir) = test_db().await;
    seed_client(&db, "idle", "coach-1").await;
    db.create_events(&[workout_at("idle", Utc::now() - Duration::days(5))])
        .await
        .unwrap();

    let engagement = EngagementService::new(db.clone(), &EngagementConfig::default());
    let opened = engagement.evaluate("idle").await.unwrap();
    let trigger_id = opened[0].id.clone();

    assert!(matches!(
        engagement.resolve(&trigger_id, "  ").await,
        Err(WellioError::Validation(_))
    ));

    let first = engagement.resolve(&trigger_id, "coach-1").await.unwrap();
    let second = engagement.resolve(&trigger_id, "coach-2").await.unwrap();
    assert_eq!(first.resolved_at, second.resolved_at);
    assert_eq!(second.resolved_by.as_deref(), Some("coach-1"));
}
