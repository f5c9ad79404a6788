use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::db::{DatabaseBackend, EventQuery};
use crate::error::{Result, WellioError};
use crate::models::{Client, EventData, ProgressEvent};
use crate::normalization::{EventNormalizer, ExplicitLog, RawInput};
use crate::services::ProgressService;

/// Ingests explicit and device-sync input and serves the event stream.
#[derive(Clone)]
pub struct EventService {
    db: Arc<dyn DatabaseBackend>,
    normalizer: EventNormalizer,
    progress: ProgressService,
}

impl EventService {
    pub fn new(db: Arc<dyn DatabaseBackend>, progress: ProgressService) -> Self {
        Self {
            db,
            normalizer: EventNormalizer::new(),
            progress,
        }
    }

    pub async fn record_explicit(
        &self,
        client_id: &str,
        log: ExplicitLog,
    ) -> Result<ProgressEvent> {
        let client = self.active_client(client_id).await?;

        let mut events =
            self.normalizer
                .normalize(&client.id, &RawInput::Explicit(log), Utc::now());
        let event = events
            .pop()
            .ok_or_else(|| WellioError::Internal("Explicit log produced no event".to_string()))?;

        self.db.create_events(std::slice::from_ref(&event)).await?;
        self.progress.spawn_update(&client.id);

        debug!(client_id = %client.id, event_id = %event.id, "Explicit log recorded");
        Ok(event)
    }

    /// Ingest a wearables webhook. The payload's `user.reference_id` names
    /// the Wellio client.
    pub async fn ingest_device_sync(
        &self,
        provider: &str,
        payload: Value,
    ) -> Result<Vec<ProgressEvent>> {
        let reference_id = payload
            .pointer("/user/reference_id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                WellioError::Validation("Webhook payload has no user.reference_id".to_string())
            })?
            .to_string();

        let client = self.active_client(&reference_id).await?;
        let input = RawInput::DeviceSync {
            provider: provider.to_string(),
            payload,
        };
        let events = self.normalizer.normalize(&client.id, &input, Utc::now());

        if events.is_empty() {
            info!(client_id = %client.id, provider, "Device sync produced no events");
            return Ok(events);
        }

        self.db.create_events(&events).await?;
        self.progress.spawn_update(&client.id);

        info!(
            client_id = %client.id,
            provider,
            count = events.len(),
            "Device sync ingested"
        );
        Ok(events)
    }

    pub async fn list(&self, client_id: &str, query: &EventQuery) -> Result<Vec<ProgressEvent>> {
        self.require_client(client_id).await?;
        self.db.list_events(client_id, query).await
    }

    /// Apply a coach correction. The event keeps its id and source; the
    /// type defaults to the current one.
    pub async fn correct(
        &self,
        event_id: &str,
        event_type: Option<&str>,
        data: Value,
    ) -> Result<ProgressEvent> {
        let mut event = self
            .db
            .get_event(event_id)
            .await?
            .ok_or_else(|| WellioError::NotFound(format!("Event {event_id} not found")))?;

        if event.superseded {
            return Err(WellioError::Validation(format!(
                "Event {event_id} was superseded by a reprocess"
            )));
        }

        let event_type = event_type
            .map(str::to_string)
            .unwrap_or_else(|| event.event_type().to_string());
        event.data = EventData::from_parts(&event_type, data).map_err(WellioError::Validation)?;
        event.needs_review = false;
        event.corrected_at = Some(Utc::now());

        self.db.update_event_correction(&event).await?;
        self.progress.spawn_update(&event.client_id);

        info!(event_id = %event.id, event_type = %event.event_type(), "Event corrected");
        Ok(event)
    }

    async fn require_client(&self, client_id: &str) -> Result<Client> {
        self.db
            .get_client(client_id)
            .await?
            .ok_or_else(|| WellioError::NotFound(format!("Client {client_id} not found")))
    }

    async fn active_client(&self, client_id: &str) -> Result<Client> {
        let client = self.require_client(client_id).await?;
        if client.is_archived() {
            return Err(WellioError::Validation(format!(
                "Client {client_id} is archived"
            )));
        }
        Ok(client)
    }
}
