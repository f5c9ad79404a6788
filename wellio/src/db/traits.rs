use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    Client, EngagementTrigger, EventType, Goal, GoalStatus, ProgressEvent, SmartLog,
};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Filter for listing a client's events. The default returns every active
/// (non-superseded) event, newest first.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub since: Option<DateTime<Utc>>,
    pub event_type: Option<EventType>,
    pub include_superseded: bool,
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn create_client(&self, client: &Client) -> Result<()>;
    async fn get_client(&self, id: &str) -> Result<Option<Client>>;
    async fn list_clients(&self, coach_id: Option<&str>, include_archived: bool)
        -> Result<Vec<Client>>;
    async fn update_client_profile(&self, client: &Client) -> Result<bool>;
    async fn archive_client(&self, id: &str, at: DateTime<Utc>) -> Result<bool>;
    async fn update_progress_score(&self, id: &str, score: f64, at: DateTime<Utc>)
        -> Result<bool>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn create_goal(&self, goal: &Goal) -> Result<()>;
    async fn get_goal(&self, id: &str) -> Result<Option<Goal>>;
    async fn list_goals(&self, client_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>>;
    async fn update_goal(&self, goal: &Goal) -> Result<bool>;
}

/// Progress events. Writers never delete; reprocessing supersedes.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_events(&self, events: &[ProgressEvent]) -> Result<()>;
    async fn get_event(&self, id: &str) -> Result<Option<ProgressEvent>>;
    async fn list_events(&self, client_id: &str, query: &EventQuery)
        -> Result<Vec<ProgressEvent>>;
    async fn list_events_by_smart_log(
        &self,
        smart_log_id: &str,
        include_superseded: bool,
    ) -> Result<Vec<ProgressEvent>>;
    async fn update_event_correction(&self, event: &ProgressEvent) -> Result<bool>;
}

#[async_trait]
pub trait SmartLogStore: Send + Sync {
    async fn create_smart_log(&self, log: &SmartLog) -> Result<()>;
    async fn get_smart_log(&self, id: &str) -> Result<Option<SmartLog>>;
    async fn list_smart_logs(&self, client_id: &str, limit: u32) -> Result<Vec<SmartLog>>;
    async fn mark_smart_log_empty(&self, id: &str, at: DateTime<Utc>) -> Result<bool>;
    async fn record_smart_log_failure(
        &self,
        id: &str,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Atomically supersede the log's previous events, store the new ones and
    /// mark the log processed.
    async fn record_smart_log_result(
        &self,
        id: &str,
        events: &[ProgressEvent],
        at: DateTime<Utc>,
    ) -> Result<SmartLog>;
}

#[async_trait]
pub trait TriggerStore: Send + Sync {
    async fn create_trigger(&self, trigger: &EngagementTrigger) -> Result<()>;
    async fn get_trigger(&self, id: &str) -> Result<Option<EngagementTrigger>>;
    async fn list_triggers(
        &self,
        client_id: &str,
        include_resolved: bool,
    ) -> Result<Vec<EngagementTrigger>>;
    async fn resolve_trigger(
        &self,
        id: &str,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete database backend that combines all store traits plus lifecycle
/// operations.
#[async_trait]
pub trait DatabaseBackend: ClientStore + GoalStore + EventStore + SmartLogStore + TriggerStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
