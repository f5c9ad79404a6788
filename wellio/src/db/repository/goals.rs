use libsql::{params, Connection};

use super::{parse_db_time, parse_optional_time, to_db_time};
use crate::error::Result;
use crate::models::{Goal, GoalStatus};

const GOAL_COLUMNS: &str = "id, client_id, goal_type, baseline_value, target_value, \
    current_value, deadline, status, created_at, updated_at";

pub struct GoalRepository;

impl GoalRepository {
    pub async fn create(conn: &Connection, goal: &Goal) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO goals (
                id, client_id, goal_type, baseline_value, target_value, current_value,
                deadline, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                goal.id.clone(),
                goal.client_id.clone(),
                goal.goal_type.clone(),
                goal.baseline_value,
                goal.target_value,
                goal.current_value,
                goal.deadline.as_ref().map(to_db_time),
                goal.status.to_string(),
                to_db_time(&goal.created_at),
                to_db_time(&goal.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Goal>> {
        let sql = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_goal(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_by_client(
        conn: &Connection,
        client_id: &str,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>> {
        let sql = format!(
            "SELECT {GOAL_COLUMNS} FROM goals \
             WHERE client_id = ?1 AND (?2 IS NULL OR status = ?2) \
             ORDER BY created_at ASC"
        );
        let mut rows = conn
            .query(&sql, params![client_id, status.map(|s| s.to_string())])
            .await?;

        let mut goals = Vec::new();
        while let Some(row) = rows.next().await? {
            goals.push(Self::row_to_goal(&row)?);
        }
        Ok(goals)
    }

    pub async fn update(conn: &Connection, goal: &Goal) -> Result<bool> {
        let affected = conn
            .execute(
                r#"
                UPDATE goals SET
                    goal_type = ?2,
                    baseline_value = ?3,
                    target_value = ?4,
                    current_value = ?5,
                    deadline = ?6,
                    status = ?7,
                    updated_at = ?8
                WHERE id = ?1
                "#,
                params![
                    goal.id.clone(),
                    goal.goal_type.clone(),
                    goal.baseline_value,
                    goal.target_value,
                    goal.current_value,
                    goal.deadline.as_ref().map(to_db_time),
                    goal.status.to_string(),
                    to_db_time(&goal.updated_at),
                ],
            )
            .await?;

        Ok(affected > 0)
    }

    fn row_to_goal(row: &libsql::Row) -> Result<Goal> {
        Ok(Goal {
            id: row.get(0)?,
            client_id: row.get(1)?,
            goal_type: row.get(2)?,
            baseline_value: row.get(3)?,
            target_value: row.get(4)?,
            current_value: row.get(5)?,
            deadline: parse_optional_time(row.get(6)?),
            status: row.get::<String>(7)?.parse().unwrap_or_default(),
            created_at: parse_db_time(&row.get::<String>(8)?),
            updated_at: parse_db_time(&row.get::<String>(9)?),
        })
    }
}
