use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use super::{parse_db_time, parse_optional_time, to_db_time};
use crate::error::Result;
use crate::models::{EngagementTrigger, Severity, TriggerType};

const TRIGGER_COLUMNS: &str = "id, client_id, trigger_type, severity, reason, \
    recommended_action, resolved_at, resolved_by, created_at";

pub struct TriggerRepository;

impl TriggerRepository {
    pub async fn create(conn: &Connection, trigger: &EngagementTrigger) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO engagement_triggers (
                id, client_id, trigger_type, severity, reason, recommended_action,
                resolved_at, resolved_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                trigger.id.clone(),
                trigger.client_id.clone(),
                trigger.trigger_type.to_string(),
                trigger.severity.to_string(),
                trigger.reason.clone(),
                trigger.recommended_action.clone(),
                trigger.resolved_at.as_ref().map(to_db_time),
                trigger.resolved_by.clone(),
                to_db_time(&trigger.created_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<EngagementTrigger>> {
        let sql = format!("SELECT {TRIGGER_COLUMNS} FROM engagement_triggers WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_trigger(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_by_client(
        conn: &Connection,
        client_id: &str,
        include_resolved: bool,
    ) -> Result<Vec<EngagementTrigger>> {
        let sql = format!(
            "SELECT {TRIGGER_COLUMNS} FROM engagement_triggers \
             WHERE client_id = ?1 AND (?2 = 1 OR resolved_at IS NULL) \
             ORDER BY created_at DESC"
        );
        let mut rows = conn
            .query(&sql, params![client_id, include_resolved as i32])
            .await?;

        let mut triggers = Vec::new();
        while let Some(row) = rows.next().await? {
            triggers.push(Self::row_to_trigger(&row)?);
        }
        Ok(triggers)
    }

    /// Resolve an open trigger. Returns `false` if it does not exist or was
    /// already resolved.
    pub async fn resolve(
        conn: &Connection,
        id: &str,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = conn
            .execute(
                "UPDATE engagement_triggers SET resolved_at = ?2, resolved_by = ?3 \
                 WHERE id = ?1 AND resolved_at IS NULL",
                params![id, to_db_time(&at), resolved_by],
            )
            .await?;

        Ok(affected > 0)
    }

    fn row_to_trigger(row: &libsql::Row) -> Result<EngagementTrigger> {
        Ok(EngagementTrigger {
            id: row.get(0)?,
            client_id: row.get(1)?,
            trigger_type: row
                .get::<String>(2)?
                .parse()
                .unwrap_or(TriggerType::Inactivity),
            severity: row.get::<String>(3)?.parse().unwrap_or(Severity::Medium),
            reason: row.get(4)?,
            recommended_action: row.get(5)?,
            resolved_at: parse_optional_time(row.get(6)?),
            resolved_by: row.get(7)?,
            created_at: parse_db_time(&row.get::<String>(8)?),
        })
    }
}
