use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Clients owned by a coach; archived rather than deleted
        CREATE TABLE IF NOT EXISTS clients (
            id TEXT PRIMARY KEY,
            coach_id TEXT NOT NULL,
            name TEXT NOT NULL,
            email TEXT,
            sex TEXT,
            age INTEGER,
            weight_kg REAL,
            height_cm REAL,
            activity_level TEXT,
            goal_type TEXT,
            goal_description TEXT,
            progress_score REAL,
            progress_updated_at TEXT,
            archived_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_clients_coach_id ON clients(coach_id);

        -- Goals
        CREATE TABLE IF NOT EXISTS goals (
            id TEXT PRIMARY KEY,
            client_id TEXT NOT NULL,
            goal_type TEXT NOT NULL,
            baseline_value REAL NOT NULL DEFAULT 0,
            target_value REAL NOT NULL,
            current_value REAL NOT NULL DEFAULT 0,
            deadline TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (client_id) REFERENCES clients(id)
        );

        CREATE INDEX IF NOT EXISTS idx_goals_client_id ON goals(client_id, status);

        -- Normalized progress events
        CREATE TABLE IF NOT EXISTS progress_events (
            id TEXT PRIMARY KEY,
            client_id TEXT NOT NULL,
            event_type TEXT NOT NULL,
            data TEXT NOT NULL DEFAULT '{}',
            source TEXT NOT NULL,
            confidence REAL NOT NULL DEFAULT 1.0,
            needs_review INTEGER NOT NULL DEFAULT 0,
            smart_log_id TEXT,
            superseded INTEGER NOT NULL DEFAULT 0,
            corrected_at TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (client_id) REFERENCES clients(id)
        );

        CREATE INDEX IF NOT EXISTS idx_progress_events_client_created
            ON progress_events(client_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_progress_events_smart_log
            ON progress_events(smart_log_id);

        -- Smart logs awaiting or done with classification
        CREATE TABLE IF NOT EXISTS smart_logs (
            id TEXT PRIMARY KEY,
            client_id TEXT NOT NULL,
            author_type TEXT NOT NULL DEFAULT 'client',
            raw_text TEXT,
            media_urls TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'pending',
            processed_at TEXT,
            last_error TEXT,
            attempts INTEGER NOT NULL DEFAULT 0,
            resulting_event_ids TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (client_id) REFERENCES clients(id)
        );

        CREATE INDEX IF NOT EXISTS idx_smart_logs_client_id ON smart_logs(client_id, created_at);

        -- Engagement triggers for coach follow-up
        CREATE TABLE IF NOT EXISTS engagement_triggers (
            id TEXT PRIMARY KEY,
            client_id TEXT NOT NULL,
            trigger_type TEXT NOT NULL,
            severity TEXT NOT NULL,
            reason TEXT NOT NULL,
            recommended_action TEXT NOT NULL,
            resolved_at TEXT,
            resolved_by TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (client_id) REFERENCES clients(id)
        );

        CREATE INDEX IF NOT EXISTS idx_engagement_triggers_client_id
            ON engagement_triggers(client_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_engagement_triggers_open
            ON engagement_triggers(client_id, trigger_type) WHERE resolved_at IS NULL;
        "#,
    )
    .await?;

    Ok(())
}
