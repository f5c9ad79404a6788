use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use super::{parse_db_time, parse_optional_time, to_db_time};
use crate::error::Result;
use crate::models::Client;

const CLIENT_COLUMNS: &str = "id, coach_id, name, email, sex, age, weight_kg, height_cm, \
    activity_level, goal_type, goal_description, progress_score, progress_updated_at, \
    archived_at, created_at, updated_at";

pub struct ClientRepository;

impl ClientRepository {
    pub async fn create(conn: &Connection, client: &Client) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO clients (
                id, coach_id, name, email, sex, age, weight_kg, height_cm,
                activity_level, goal_type, goal_description, progress_score,
                progress_updated_at, archived_at, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16
            )
            "#,
            params![
                client.id.clone(),
                client.coach_id.clone(),
                client.name.clone(),
                client.email.clone(),
                client.sex.map(|s| s.to_string()),
                client.age.map(i64::from),
                client.weight_kg,
                client.height_cm,
                client.activity_level.map(|a| a.to_string()),
                client.goal_type.clone(),
                client.goal_description.clone(),
                client.progress_score,
                client.progress_updated_at.as_ref().map(to_db_time),
                client.archived_at.as_ref().map(to_db_time),
                to_db_time(&client.created_at),
                to_db_time(&client.updated_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_client(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list(
        conn: &Connection,
        coach_id: Option<&str>,
        include_archived: bool,
    ) -> Result<Vec<Client>> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE (?1 IS NULL OR coach_id = ?1) AND (?2 = 1 OR archived_at IS NULL) \
             ORDER BY created_at ASC"
        );
        let mut rows = conn
            .query(&sql, params![coach_id, include_archived as i32])
            .await?;

        let mut clients = Vec::new();
        while let Some(row) = rows.next().await? {
            clients.push(Self::row_to_client(&row)?);
        }
        Ok(clients)
    }

    /// Update profile fields. Progress and archive columns have their own
    /// writers.
    pub async fn update_profile(conn: &Connection, client: &Client) -> Result<bool> {
        let affected = conn
            .execute(
                r#"
                UPDATE clients SET
                    name = ?2,
                    email = ?3,
                    sex = ?4,
                    age = ?5,
                    weight_kg = ?6,
                    height_cm = ?7,
                    activity_level = ?8,
                    goal_type = ?9,
                    goal_description = ?10,
                    updated_at = ?11
                WHERE id = ?1
                "#,
                params![
                    client.id.clone(),
                    client.name.clone(),
                    client.email.clone(),
                    client.sex.map(|s| s.to_string()),
                    client.age.map(i64::from),
                    client.weight_kg,
                    client.height_cm,
                    client.activity_level.map(|a| a.to_string()),
                    client.goal_type.clone(),
                    client.goal_description.clone(),
                    to_db_time(&client.updated_at),
                ],
            )
            .await?;

        Ok(affected > 0)
    }

    pub async fn archive(conn: &Connection, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let at = to_db_time(&at);
        let affected = conn
            .execute(
                "UPDATE clients SET archived_at = ?2, updated_at = ?2 \
                 WHERE id = ?1 AND archived_at IS NULL",
                params![id, at],
            )
            .await?;

        Ok(affected > 0)
    }

    pub async fn update_progress_score(
        conn: &Connection,
        id: &str,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = conn
            .execute(
                "UPDATE clients SET progress_score = ?2, progress_updated_at = ?3 WHERE id = ?1",
                params![id, score, to_db_time(&at)],
            )
            .await?;

        Ok(affected > 0)
    }

    fn row_to_client(row: &libsql::Row) -> Result<Client> {
        Ok(Client {
            id: row.get(0)?,
            coach_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            sex: row
                .get::<Option<String>>(4)?
                .and_then(|s| s.parse().ok()),
            age: row
                .get::<Option<i64>>(5)?
                .and_then(|a| u32::try_from(a).ok()),
            weight_kg: row.get(6)?,
            height_cm: row.get(7)?,
            activity_level: row
                .get::<Option<String>>(8)?
                .and_then(|s| s.parse().ok()),
            goal_type: row.get(9)?,
            goal_description: row.get(10)?,
            progress_score: row.get(11)?,
            progress_updated_at: parse_optional_time(row.get(12)?),
            archived_at: parse_optional_time(row.get(13)?),
            created_at: parse_db_time(&row.get::<String>(14)?),
            updated_at: parse_db_time(&row.get::<String>(15)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::setup_test_db;
    use crate::models::{ActivityLevel, Sex};

    fn client(id: &str, coach_id: &str) -> Client {
        let mut c = Client::new(id.to_string(), coach_id.to_string(), format!("Client {id}"));
        c.sex = Some(Sex::Female);
        c.age = Some(34);
        c.activity_level = Some(ActivityLevel::VeryActive);
        c
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let conn = setup_test_db().await;
        ClientRepository::create(&conn, &client("c1", "coach-a"))
            .await
            .unwrap();

        let loaded = ClientRepository::get_by_id(&conn, "c1").await.unwrap().unwrap();
        assert_eq!(loaded.coach_id, "coach-a");
        assert_eq!(loaded.sex, Some(Sex::Female));
        assert_eq!(loaded.age, Some(34));
        assert_eq!(loaded.activity_level, Some(ActivityLevel::VeryActive));
        assert!(loaded.progress_score.is_none());

        assert!(ClientRepository::get_by_id(&conn, "missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_filters_coach_and_archived() {
        let conn = setup_test_db().await;
        for (id, coach) in [("c1", "coach-a"), ("c2", "coach-a"), ("c3", "coach-b")] {
            ClientRepository::create(&conn, &client(id, coach))
                .await
                .unwrap();
        }
        assert!(ClientRepository::archive(&conn, "c2", Utc::now())
            .await
            .unwrap());
        // Archiving twice is a no-op
        assert!(!ClientRepository::archive(&conn, "c2", Utc::now())
            .await
            .unwrap());

        let all_active = ClientRepository::list(&conn, None, false).await.unwrap();
        assert_eq!(all_active.len(), 2);

        let coach_a = ClientRepository::list(&conn, Some("coach-a"), false)
            .await
            .unwrap();
        assert_eq!(coach_a.len(), 1);
        assert_eq!(coach_a[0].id, "c1");

        let coach_a_all = ClientRepository::list(&conn, Some("coach-a"), true)
            .await
            .unwrap();
        assert_eq!(coach_a_all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_progress_score() {
        let conn = setup_test_db().await;
        ClientRepository::create(&conn, &client("c1", "coach-a"))
            .await
            .unwrap();

        let at = Utc::now();
        assert!(ClientRepository::update_progress_score(&conn, "c1", 42.5, at)
            .await
            .unwrap());
        assert!(!ClientRepository::update_progress_score(&conn, "nope", 1.0, at)
            .await
            .unwrap());

        let loaded = ClientRepository::get_by_id(&conn, "c1").await.unwrap().unwrap();
        assert_eq!(loaded.progress_score, Some(42.5));
        assert!(loaded.progress_updated_at.is_some());
    }
}
