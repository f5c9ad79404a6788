use crate::db::connection::Database;
use crate::db::repository::{
    ClientRepository, EventRepository, GoalRepository, SmartLogRepository, TriggerRepository,
};
use crate::db::traits::{
    ClientStore, DatabaseBackend, EventQuery, EventStore, GoalStore, SmartLogStore, TriggerStore,
};
use crate::error::Result;
use crate::models::{
    Client, EngagementTrigger, Goal, GoalStatus, ProgressEvent, SmartLog,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientStore for LibSqlBackend {
    async fn create_client(&self, client: &Client) -> Result<()> {
        let conn = self.db.connect()?;
        ClientRepository::create(&conn, client).await
    }
    async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let conn = self.db.connect()?;
        ClientRepository::get_by_id(&conn, id).await
    }
    async fn list_clients(
        &self,
        coach_id: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Client>> {
        let conn = self.db.connect()?;
        ClientRepository::list(&conn, coach_id, include_archived).await
    }
    async fn update_client_profile(&self, client: &Client) -> Result<bool> {
        let conn = self.db.connect()?;
        ClientRepository::update_profile(&conn, client).await
    }
    async fn archive_client(&self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let conn = self.db.connect()?;
        ClientRepository::archive(&conn, id, at).await
    }
    async fn update_progress_score(
        &self,
        id: &str,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.db.connect()?;
        ClientRepository::update_progress_score(&conn, id, score, at).await
    }
}

#[async_trait]
impl GoalStore for LibSqlBackend {
    async fn create_goal(&self, goal: &Goal) -> Result<()> {
        let conn = self.db.connect()?;
        GoalRepository::create(&conn, goal).await
    }
    async fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        let conn = self.db.connect()?;
        GoalRepository::get_by_id(&conn, id).await
    }
    async fn list_goals(&self, client_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let conn = self.db.connect()?;
        GoalRepository::list_by_client(&conn, client_id, status).await
    }
    async fn update_goal(&self, goal: &Goal) -> Result<bool> {
        let conn = self.db.connect()?;
        GoalRepository::update(&conn, goal).await
    }
}

#[async_trait]
impl EventStore for LibSqlBackend {
    async fn create_events(&self, events: &[ProgressEvent]) -> Result<()> {
        let conn = self.db.connect()?;
        EventRepository::create_batch(&conn, events).await
    }
    async fn get_event(&self, id: &str) -> Result<Option<ProgressEvent>> {
        let conn = self.db.connect()?;
        EventRepository::get_by_id(&conn, id).await
    }
    async fn list_events(
        &self,
        client_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<ProgressEvent>> {
        let conn = self.db.connect()?;
        EventRepository::list_by_client(&conn, client_id, query).await
    }
    async fn list_events_by_smart_log(
        &self,
        smart_log_id: &str,
        include_superseded: bool,
    ) -> Result<Vec<ProgressEvent>> {
        let conn = self.db.connect()?;
        EventRepository::list_by_smart_log(&conn, smart_log_id, include_superseded).await
    }
    async fn update_event_correction(&self, event: &ProgressEvent) -> Result<bool> {
        let conn = self.db.connect()?;
        EventRepository::update_correction(&conn, event).await
    }
}

#[async_trait]
impl SmartLogStore for LibSqlBackend {
    async fn create_smart_log(&self, log: &SmartLog) -> Result<()> {
        let conn = self.db.connect()?;
        SmartLogRepository::create(&conn, log).await
    }
    async fn get_smart_log(&self, id: &str) -> Result<Option<SmartLog>> {
        let conn = self.db.connect()?;
        SmartLogRepository::get_by_id(&conn, id).await
    }
    async fn list_smart_logs(&self, client_id: &str, limit: u32) -> Result<Vec<SmartLog>> {
        let conn = self.db.connect()?;
        SmartLogRepository::list_by_client(&conn, client_id, limit).await
    }
    async fn mark_smart_log_empty(&self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let conn = self.db.connect()?;
        SmartLogRepository::mark_empty(&conn, id, at).await
    }
    async fn record_smart_log_failure(
        &self,
        id: &str,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.db.connect()?;
        SmartLogRepository::record_failure(&conn, id, error, at).await
    }
    async fn record_smart_log_result(
        &self,
        id: &str,
        events: &[ProgressEvent],
        at: DateTime<Utc>,
    ) -> Result<SmartLog> {
        let conn = self.db.connect()?;
        SmartLogRepository::record_result(&conn, id, events, at).await
    }
}

#[async_trait]
impl TriggerStore for LibSqlBackend {
    async fn create_trigger(&self, trigger: &EngagementTrigger) -> Result<()> {
        let conn = self.db.connect()?;
        TriggerRepository::create(&conn, trigger).await
    }
    async fn get_trigger(&self, id: &str) -> Result<Option<EngagementTrigger>> {
        let conn = self.db.connect()?;
        TriggerRepository::get_by_id(&conn, id).await
    }
    async fn list_triggers(
        &self,
        client_id: &str,
        include_resolved: bool,
    ) -> Result<Vec<EngagementTrigger>> {
        let conn = self.db.connect()?;
        TriggerRepository::list_by_client(&conn, client_id, include_resolved).await
    }
    async fn resolve_trigger(
        &self,
        id: &str,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.db.connect()?;
        TriggerRepository::resolve(&conn, id, resolved_by, at).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
