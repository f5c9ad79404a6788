use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::config::EngagementConfig;
use crate::db::{DatabaseBackend, EventQuery};
use crate::error::{Result, WellioError};
use crate::intelligence::{TriggerEvaluator, WORKOUT_HISTORY};
use crate::models::{EngagementTrigger, EventType, TriggerType};

/// Runs the engagement rules for clients and keeps at most one open
/// trigger per type and client.
#[derive(Clone)]
pub struct EngagementService {
    db: Arc<dyn DatabaseBackend>,
    evaluator: TriggerEvaluator,
    history_limit: u32,
}

impl EngagementService {
    pub fn new(db: Arc<dyn DatabaseBackend>, config: &EngagementConfig) -> Self {
        Self {
            db,
            evaluator: TriggerEvaluator::new(config.inactivity_days),
            history_limit: config.history_limit.max(1),
        }
    }

    /// Evaluate one client and persist new triggers. Returns only the
    /// triggers opened by this call.
    pub async fn evaluate(&self, client_id: &str) -> Result<Vec<EngagementTrigger>> {
        if self.db.get_client(client_id).await?.is_none() {
            return Err(WellioError::NotFound(format!("Client {client_id} not found")));
        }

        let mut events = self
            .db
            .list_events(
                client_id,
                &EventQuery {
                    limit: Some(self.history_limit),
                    ..Default::default()
                },
            )
            .await?;

        // Frequent device syncs can push workouts out of the recent window;
        // the missed-workout rule always needs the latest ones.
        let workouts = self
            .db
            .list_events(
                client_id,
                &EventQuery {
                    event_type: Some(EventType::Exercise),
                    limit: Some(WORKOUT_HISTORY as u32),
                    ..Default::default()
                },
            )
            .await?;
        let seen: HashSet<String> = events.iter().map(|e| e.id.clone()).collect();
        events.extend(workouts.into_iter().filter(|w| !seen.contains(&w.id)));

        let detected = self.evaluator.detect(client_id, &events, Utc::now());
        if detected.is_empty() {
            return Ok(detected);
        }

        let open: HashSet<TriggerType> = self
            .db
            .list_triggers(client_id, false)
            .await?
            .into_iter()
            .map(|t| t.trigger_type)
            .collect();

        let mut opened = Vec::new();
        for trigger in detected {
            if open.contains(&trigger.trigger_type) {
                debug!(
                    client_id = %client_id,
                    trigger_type = %trigger.trigger_type,
                    "Trigger already open, skipping"
                );
                continue;
            }
            self.db.create_trigger(&trigger).await?;
            info!(
                client_id = %client_id,
                trigger_type = %trigger.trigger_type,
                severity = %trigger.severity,
                "Engagement trigger opened"
            );
            opened.push(trigger);
        }

        Ok(opened)
    }

    pub async fn list(
        &self,
        client_id: &str,
        include_resolved: bool,
    ) -> Result<Vec<EngagementTrigger>> {
        if self.db.get_client(client_id).await?.is_none() {
            return Err(WellioError::NotFound(format!("Client {client_id} not found")));
        }
        self.db.list_triggers(client_id, include_resolved).await
    }

    /// Resolve a trigger on behalf of a coach. Resolving twice keeps the
    /// first resolution.
    pub async fn resolve(&self, trigger_id: &str, resolved_by: &str) -> Result<EngagementTrigger> {
        let resolved_by = resolved_by.trim();
        if resolved_by.is_empty() {
            return Err(WellioError::Validation("resolvedBy is required".to_string()));
        }

        if self
            .db
            .resolve_trigger(trigger_id, resolved_by, Utc::now())
            .await?
        {
            info!(trigger_id = %trigger_id, resolved_by, "Engagement trigger resolved");
        }

        self.db
            .get_trigger(trigger_id)
            .await?
            .ok_or_else(|| WellioError::NotFound(format!("Trigger {trigger_id} not found")))
    }
}

/// Periodically evaluates every active client.
#[derive(Clone)]
pub struct EngagementMonitor {
    db: Arc<dyn DatabaseBackend>,
    engagement: EngagementService,
    interval_secs: u64,
}

impl EngagementMonitor {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        engagement: EngagementService,
        interval_secs: u64,
    ) -> Self {
        Self {
            db,
            engagement,
            interval_secs,
        }
    }

    /// One pass over all active clients. Returns the number of triggers
    /// opened; a failing client is logged and skipped.
    pub async fn run_once(&self) -> Result<usize> {
        let clients = self.db.list_clients(None, false).await?;
        let mut opened = 0usize;
        let mut errors = 0usize;

        for client in &clients {
            match self.engagement.evaluate(&client.id).await {
                Ok(triggers) => opened += triggers.len(),
                Err(e) => {
                    error!(client_id = %client.id, error = %e, "Engagement evaluation failed");
                    errors += 1;
                }
            }
        }

        info!(
            clients = clients.len(),
            opened, errors, "Engagement evaluation pass complete"
        );
        Ok(opened)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}
