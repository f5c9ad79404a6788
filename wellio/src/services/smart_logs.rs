use std::sync::Arc;

use chrono::Utc;
use nanoid::nanoid;
use tracing::{debug, error, info, warn};

use crate::db::DatabaseBackend;
use crate::error::{Result, WellioError};
use crate::intelligence::{Classification, SmartLogProcessor};
use crate::models::{AuthorType, SmartLog};
use crate::services::ProgressService;

/// Input for a new smart log.
#[derive(Debug, Clone, Default)]
pub struct NewSmartLog {
    pub author_type: AuthorType,
    pub raw_text: Option<String>,
    pub media_urls: Vec<String>,
}

/// Owns the smart-log lifecycle: persist, classify in the background,
/// record the outcome and refresh the client's progress.
#[derive(Clone)]
pub struct SmartLogService {
    db: Arc<dyn DatabaseBackend>,
    processor: SmartLogProcessor,
    progress: ProgressService,
}

impl SmartLogService {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        processor: SmartLogProcessor,
        progress: ProgressService,
    ) -> Self {
        Self {
            db,
            processor,
            progress,
        }
    }

    /// Store a smart log and start processing it without waiting.
    pub async fn create(&self, client_id: &str, input: NewSmartLog) -> Result<SmartLog> {
        let client = self
            .db
            .get_client(client_id)
            .await?
            .ok_or_else(|| WellioError::NotFound(format!("Client {client_id} not found")))?;
        if client.is_archived() {
            return Err(WellioError::Validation(format!(
                "Client {client_id} is archived"
            )));
        }

        let mut log = SmartLog::new(nanoid!(), client.id, input.author_type);
        log.raw_text = input.raw_text;
        log.media_urls = input.media_urls;
        self.db.create_smart_log(&log).await?;

        debug!(smart_log_id = %log.id, client_id = %log.client_id, "Smart log created");
        self.spawn_process(&log.id);
        Ok(log)
    }

    /// Run classification for one smart log and record the outcome. Failures
    /// are written to the log and returned; nothing retries automatically.
    pub async fn process(&self, smart_log_id: &str) -> Result<SmartLog> {
        let log = self.get(smart_log_id).await?;
        let now = Utc::now();

        match self.processor.classify(&log, now).await {
            Ok(Classification::Empty) => {
                self.db.mark_smart_log_empty(&log.id, now).await?;
                info!(smart_log_id = %log.id, "Smart log has no content, left unprocessed");
                self.get(&log.id).await
            }
            Ok(Classification::Classified { events, confidence }) => {
                let updated = self
                    .db
                    .record_smart_log_result(&log.id, &events, now)
                    .await?;
                info!(
                    smart_log_id = %log.id,
                    events = events.len(),
                    confidence,
                    "Smart log processed"
                );

                if let Err(e) = self.progress.update_one(&log.client_id).await {
                    warn!(client_id = %log.client_id, error = %e, "Progress update after smart log failed");
                }
                Ok(updated)
            }
            Err(e) => {
                if e.is_external() {
                    warn!(smart_log_id = %log.id, error = %e, "Smart log classification failed");
                } else {
                    error!(smart_log_id = %log.id, error = %e, "Smart log processing error");
                }
                self.db
                    .record_smart_log_failure(&log.id, &e.to_string(), now)
                    .await?;
                Err(e)
            }
        }
    }

    /// Coach-triggered reprocess. Earlier events are superseded, not duplicated.
    pub async fn reprocess(&self, smart_log_id: &str) -> Result<SmartLog> {
        let log = self.get(smart_log_id).await?;
        info!(smart_log_id = %log.id, attempts = log.attempts, "Smart log reprocess requested");
        self.spawn_process(&log.id);
        Ok(log)
    }

    pub async fn get(&self, smart_log_id: &str) -> Result<SmartLog> {
        self.db
            .get_smart_log(smart_log_id)
            .await?
            .ok_or_else(|| WellioError::NotFound(format!("Smart log {smart_log_id} not found")))
    }

    pub async fn list(&self, client_id: &str, limit: u32) -> Result<Vec<SmartLog>> {
        if self.db.get_client(client_id).await?.is_none() {
            return Err(WellioError::NotFound(format!("Client {client_id} not found")));
        }
        self.db.list_smart_logs(client_id, limit).await
    }

    fn spawn_process(&self, smart_log_id: &str) {
        let service = self.clone();
        let smart_log_id = smart_log_id.to_string();
        tokio::spawn(async move {
            // Outcome is already recorded on the log.
            let _ = service.process(&smart_log_id).await;
        });
    }
}
