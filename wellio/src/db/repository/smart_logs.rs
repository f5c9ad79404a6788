use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use super::{parse_db_time, parse_optional_time, to_db_time, EventRepository};
use crate::error::{Result, WellioError};
use crate::models::{ProgressEvent, SmartLog, SmartLogStatus};

const SMART_LOG_COLUMNS: &str = "id, client_id, author_type, raw_text, media_urls, status, \
    processed_at, last_error, attempts, resulting_event_ids, created_at, updated_at";

pub struct SmartLogRepository;

impl SmartLogRepository {
    pub async fn create(conn: &Connection, log: &SmartLog) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO smart_logs (
                id, client_id, author_type, raw_text, media_urls, status, processed_at,
                last_error, attempts, resulting_event_ids, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                log.id.clone(),
                log.client_id.clone(),
                log.author_type.to_string(),
                log.raw_text.clone(),
                serde_json::to_string(&log.media_urls)?,
                log.status.to_string(),
                log.processed_at.as_ref().map(to_db_time),
                log.last_error.clone(),
                i64::from(log.attempts),
                serde_json::to_string(&log.resulting_event_ids)?,
                to_db_time(&log.created_at),
                to_db_time(&log.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<SmartLog>> {
        let sql = format!("SELECT {SMART_LOG_COLUMNS} FROM smart_logs WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_smart_log(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_by_client(
        conn: &Connection,
        client_id: &str,
        limit: u32,
    ) -> Result<Vec<SmartLog>> {
        let sql = format!(
            "SELECT {SMART_LOG_COLUMNS} FROM smart_logs WHERE client_id = ?1 \
             ORDER BY created_at DESC LIMIT ?2"
        );
        let mut rows = conn
            .query(&sql, params![client_id, i64::from(limit)])
            .await?;

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(Self::row_to_smart_log(&row)?);
        }
        Ok(logs)
    }

    pub async fn mark_empty(conn: &Connection, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let affected = conn
            .execute(
                "UPDATE smart_logs SET status = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, SmartLogStatus::Empty.to_string(), to_db_time(&at)],
            )
            .await?;

        Ok(affected > 0)
    }

    /// Record a failed attempt. `processed_at` is cleared so a failed log never
    /// looks processed; events from an earlier successful run stay active.
    pub async fn record_failure(
        conn: &Connection,
        id: &str,
        error: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = conn
            .execute(
                r#"
                UPDATE smart_logs SET
                    status = ?2,
                    processed_at = NULL,
                    last_error = ?3,
                    attempts = attempts + 1,
                    updated_at = ?4
                WHERE id = ?1
                "#,
                params![
                    id,
                    SmartLogStatus::Failed.to_string(),
                    error,
                    to_db_time(&at)
                ],
            )
            .await?;

        Ok(affected > 0)
    }

    /// Apply a successful classification in one transaction: earlier events of
    /// the log are superseded, the new ones inserted and their ids appended.
    pub async fn record_result(
        conn: &Connection,
        id: &str,
        events: &[ProgressEvent],
        at: DateTime<Utc>,
    ) -> Result<SmartLog> {
        let tx = conn.transaction().await?;

        let mut log = Self::get_by_id(&tx, id)
            .await?
            .ok_or_else(|| WellioError::NotFound(format!("Smart log {id} not found")))?;

        let superseded = EventRepository::supersede_by_smart_log(&tx, id).await?;
        for event in events {
            EventRepository::create(&tx, event).await?;
        }

        log.resulting_event_ids
            .extend(events.iter().map(|e| e.id.clone()));
        log.status = SmartLogStatus::Processed;
        log.processed_at = Some(at);
        log.last_error = None;
        log.attempts += 1;
        log.updated_at = at;

        tx.execute(
            r#"
            UPDATE smart_logs SET
                status = ?2,
                processed_at = ?3,
                last_error = NULL,
                attempts = ?4,
                resulting_event_ids = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                log.status.to_string(),
                to_db_time(&at),
                i64::from(log.attempts),
                serde_json::to_string(&log.resulting_event_ids)?,
                to_db_time(&at),
            ],
        )
        .await?;

        tx.commit().await?;

        tracing::debug!(
            smart_log_id = %id,
            inserted = events.len(),
            superseded,
            "Smart log result recorded"
        );

        Ok(log)
    }

    fn row_to_smart_log(row: &libsql::Row) -> Result<SmartLog> {
        Ok(SmartLog {
            id: row.get(0)?,
            client_id: row.get(1)?,
            author_type: row.get::<String>(2)?.parse().unwrap_or_default(),
            raw_text: row.get(3)?,
            media_urls: serde_json::from_str(&row.get::<String>(4)?).unwrap_or_default(),
            status: row.get::<String>(5)?.parse().unwrap_or_default(),
            processed_at: parse_optional_time(row.get(6)?),
            last_error: row.get(7)?,
            attempts: u32::try_from(row.get::<i64>(8)?).unwrap_or(0),
            resulting_event_ids: serde_json::from_str(&row.get::<String>(9)?).unwrap_or_default(),
            created_at: parse_db_time(&row.get::<String>(10)?),
            updated_at: parse_db_time(&row.get::<String>(11)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{setup_test_db, ClientRepository};
    use crate::models::{AuthorType, Client, EventData, EventSource, MoodData};

    async fn seeded() -> Connection {
        let conn = setup_test_db().await;
        let client = Client::new("c1".into(), "coach".into(), "Dana".into());
        ClientRepository::create(&conn, &client).await.unwrap();

        let mut log = SmartLog::new("log-1".into(), "c1".into(), AuthorType::Client);
        log.raw_text = Some("feeling great".into());
        SmartLogRepository::create(&conn, &log).await.unwrap();
        conn
    }

    fn mood_event() -> ProgressEvent {
        let mut event = ProgressEvent::new(
            "c1".into(),
            EventData::Mood(MoodData {
                label: Some("great".into()),
                ..Default::default()
            }),
            EventSource::SmartLog,
            Utc::now(),
        );
        event.smart_log_id = Some("log-1".into());
        event
    }

    #[tokio::test]
    async fn test_record_result_then_reprocess_supersedes() {
        let conn = seeded().await;

        let first = vec![mood_event(), mood_event()];
        let log = SmartLogRepository::record_result(&conn, "log-1", &first, Utc::now())
            .await
            .unwrap();
        assert_eq!(log.status, SmartLogStatus::Processed);
        assert_eq!(log.resulting_event_ids.len(), 2);
        assert_eq!(log.attempts, 1);

        let second = vec![mood_event(), mood_event()];
        let log = SmartLogRepository::record_result(&conn, "log-1", &second, Utc::now())
            .await
            .unwrap();
        assert_eq!(log.resulting_event_ids.len(), 4);

        let active = EventRepository::list_by_smart_log(&conn, "log-1", false)
            .await
            .unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|e| second.iter().any(|s| s.id == e.id)));

        let stored = SmartLogRepository::get_by_id(&conn, "log-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.resulting_event_ids, log.resulting_event_ids);
        assert!(stored.processed_at.is_some());
    }

    #[tokio::test]
    async fn test_record_failure_keeps_processed_at_unset() {
        let conn = seeded().await;
        SmartLogRepository::record_failure(&conn, "log-1", "oracle timed out", Utc::now())
            .await
            .unwrap();

        let stored = SmartLogRepository::get_by_id(&conn, "log-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, SmartLogStatus::Failed);
        assert_eq!(stored.last_error.as_deref(), Some("oracle timed out"));
        assert_eq!(stored.attempts, 1);
        assert!(stored.processed_at.is_none());
    }

    #[tokio::test]
    async fn test_record_result_for_missing_log() {
        let conn = seeded().await;
        let result = SmartLogRepository::record_result(&conn, "nope", &[], Utc::now()).await;
        assert!(matches!(result, Err(WellioError::NotFound(_))));
    }
}
