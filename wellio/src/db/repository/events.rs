use libsql::{params, Connection};

use super::{parse_db_time, parse_optional_time, to_db_time};
use crate::db::traits::EventQuery;
use crate::error::Result;
use crate::models::{EventData, ProgressEvent};

const EVENT_COLUMNS: &str = "id, client_id, event_type, data, source, confidence, needs_review, \
    smart_log_id, superseded, corrected_at, created_at";

pub struct EventRepository;

impl EventRepository {
    pub async fn create(conn: &Connection, event: &ProgressEvent) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO progress_events (
                id, client_id, event_type, data, source, confidence, needs_review,
                smart_log_id, superseded, corrected_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                event.id.clone(),
                event.client_id.clone(),
                event.event_type().to_string(),
                serde_json::to_string(&event.data.payload())?,
                event.source.to_string(),
                event.confidence,
                event.needs_review as i32,
                event.smart_log_id.clone(),
                event.superseded as i32,
                event.corrected_at.as_ref().map(to_db_time),
                to_db_time(&event.created_at),
            ],
        )
        .await?;

        Ok(())
    }

    /// Insert several events atomically.
    pub async fn create_batch(conn: &Connection, events: &[ProgressEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let tx = conn.transaction().await?;
        for event in events {
            Self::create(&tx, event).await?;
        }
        tx.commit().await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<ProgressEvent>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM progress_events WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_event(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Events of one client, newest first.
    pub async fn list_by_client(
        conn: &Connection,
        client_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<ProgressEvent>> {
        let limit = query.limit.map(i64::from).unwrap_or(-1);
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM progress_events \
             WHERE client_id = ?1 \
               AND (?2 = 1 OR superseded = 0) \
               AND (?3 IS NULL OR created_at >= ?3) \
               AND (?4 IS NULL OR event_type = ?4) \
             ORDER BY created_at DESC \
             LIMIT ?5"
        );
        let mut rows = conn
            .query(
                &sql,
                params![
                    client_id,
                    query.include_superseded as i32,
                    query.since.as_ref().map(to_db_time),
                    query.event_type.map(|t| t.to_string()),
                    limit,
                ],
            )
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(Self::row_to_event(&row)?);
        }
        Ok(events)
    }

    pub async fn list_by_smart_log(
        conn: &Connection,
        smart_log_id: &str,
        include_superseded: bool,
    ) -> Result<Vec<ProgressEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM progress_events \
             WHERE smart_log_id = ?1 AND (?2 = 1 OR superseded = 0) \
             ORDER BY created_at ASC"
        );
        let mut rows = conn
            .query(&sql, params![smart_log_id, include_superseded as i32])
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(Self::row_to_event(&row)?);
        }
        Ok(events)
    }

    /// Persist a coach correction: new data, review cleared, correction time set.
    pub async fn update_correction(conn: &Connection, event: &ProgressEvent) -> Result<bool> {
        let affected = conn
            .execute(
                r#"
                UPDATE progress_events SET
                    event_type = ?2,
                    data = ?3,
                    needs_review = ?4,
                    corrected_at = ?5
                WHERE id = ?1
                "#,
                params![
                    event.id.clone(),
                    event.event_type().to_string(),
                    serde_json::to_string(&event.data.payload())?,
                    event.needs_review as i32,
                    event.corrected_at.as_ref().map(to_db_time),
                ],
            )
            .await?;

        Ok(affected > 0)
    }

    pub async fn supersede_by_smart_log(conn: &Connection, smart_log_id: &str) -> Result<u64> {
        let affected = conn
            .execute(
                "UPDATE progress_events SET superseded = 1 \
                 WHERE smart_log_id = ?1 AND superseded = 0",
                params![smart_log_id],
            )
            .await?;

        Ok(affected)
    }

    fn row_to_event(row: &libsql::Row) -> Result<ProgressEvent> {
        let event_type: String = row.get(2)?;
        let raw_data: String = row.get(3)?;
        let data = serde_json::from_str(&raw_data)
            .map_err(|e| e.to_string())
            .and_then(|value| EventData::from_parts(&event_type, value))
            .unwrap_or_else(|e| {
                tracing::warn!(event_type = %event_type, error = %e, "Stored event data unreadable");
                EventData::unclassified(format!("Stored data unreadable: {e}"), Some(raw_data))
            });

        Ok(ProgressEvent {
            id: row.get(0)?,
            client_id: row.get(1)?,
            data,
            source: row.get::<String>(4)?.parse().unwrap_or_default(),
            confidence: row.get(5)?,
            needs_review: row.get::<i32>(6)? != 0,
            smart_log_id: row.get(7)?,
            superseded: row.get::<i32>(8)? != 0,
            corrected_at: parse_optional_time(row.get(9)?),
            created_at: parse_db_time(&row.get::<String>(10)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{setup_test_db, ClientRepository};
    use crate::models::{
        Client, EventSource, EventType, ExerciseData, Intensity, SleepData,
    };
    use chrono::{Duration, Utc};

    async fn seeded() -> Connection {
        let conn = setup_test_db().await;
        let client = Client::new("c1".into(), "coach".into(), "Dana".into());
        ClientRepository::create(&conn, &client).await.unwrap();
        conn
    }

    fn exercise(minutes_ago: i64) -> ProgressEvent {
        ProgressEvent::new(
            "c1".into(),
            EventData::Exercise(ExerciseData {
                activity: Some("swim".into()),
                intensity: Some(Intensity::Moderate),
                ..Default::default()
            }),
            EventSource::Explicit,
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[tokio::test]
    async fn test_round_trip_keeps_typed_data() {
        let conn = seeded().await;
        let event = exercise(5);
        EventRepository::create(&conn, &event).await.unwrap();

        let loaded = EventRepository::get_by_id(&conn, &event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.data, event.data);
        assert_eq!(loaded.source, EventSource::Explicit);
        assert!(!loaded.needs_review);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let conn = seeded().await;
        let mut superseded = exercise(1);
        superseded.superseded = true;
        let sleep = ProgressEvent::new(
            "c1".into(),
            EventData::Sleep(SleepData {
                duration_hours: Some(7.5),
                ..Default::default()
            }),
            EventSource::DeviceSync,
            Utc::now() - Duration::days(10),
        );
        EventRepository::create_batch(&conn, &[exercise(30), exercise(10), superseded, sleep])
            .await
            .unwrap();

        let active = EventRepository::list_by_client(&conn, "c1", &EventQuery::default())
            .await
            .unwrap();
        assert_eq!(active.len(), 3);
        assert!(active[0].created_at >= active[1].created_at);

        let everything = EventRepository::list_by_client(
            &conn,
            "c1",
            &EventQuery {
                include_superseded: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(everything.len(), 4);

        let recent = EventRepository::list_by_client(
            &conn,
            "c1",
            &EventQuery {
                since: Some(Utc::now() - Duration::days(1)),
                event_type: Some(EventType::Exercise),
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(recent.len(), 1);
        assert!(recent[0].is_exercise());
    }

    #[tokio::test]
    async fn test_supersede_by_smart_log() {
        let conn = seeded().await;
        let mut first = exercise(3);
        first.smart_log_id = Some("log-1".into());
        let mut second = exercise(2);
        second.smart_log_id = Some("log-1".into());
        EventRepository::create_batch(&conn, &[first, second, exercise(1)])
            .await
            .unwrap();

        assert_eq!(
            EventRepository::supersede_by_smart_log(&conn, "log-1")
                .await
                .unwrap(),
            2
        );
        assert!(EventRepository::list_by_smart_log(&conn, "log-1", false)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            EventRepository::list_by_smart_log(&conn, "log-1", true)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_unreadable_data_degrades_to_unclassified() {
        let conn = seeded().await;
        conn.execute(
            "INSERT INTO progress_events (id, client_id, event_type, data, source, created_at) \
             VALUES ('e1', 'c1', 'exercise', 'not json', 'explicit', ?1)",
            params![to_db_time(&Utc::now())],
        )
        .await
        .unwrap();

        let loaded = EventRepository::get_by_id(&conn, "e1").await.unwrap().unwrap();
        assert_eq!(loaded.event_type(), EventType::Unclassified);
    }
}
