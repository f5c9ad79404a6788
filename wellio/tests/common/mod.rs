// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use wellio::config::DatabaseConfig;
use wellio::db::{Database, DatabaseBackend, LibSqlBackend};
use wellio::models::{Client, EventData, EventSource, ExerciseData, ProgressEvent};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// File-backed database in a fresh temp dir. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn test_db() -> (Arc<dyn DatabaseBackend>, TempDir) {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(&DatabaseConfig {
        url: dir.path().join("wellio.db").display().to_string(),
        auth_token: None,
        local_path: None,
    })
    .await
    .unwrap();
    (Arc::new(LibSqlBackend::new(db)), dir)
}

pub async fn seed_client(db: &Arc<dyn DatabaseBackend>, id: &str, coach_id: &str) -> Client {
    let client = Client::new(id.to_string(), coach_id.to_string(), format!("Client {id}"));
    db.create_client(&client).await.unwrap();
    client
}

pub fn workout_at(client_id: &str, at: DateTime<Utc>) -> ProgressEvent {
    ProgressEvent::new(
        client_id.to_string(),
        EventData::Exercise(ExerciseData {
            activity: Some("run".to_string()),
            duration_minutes: Some(30.0),
            ..Default::default()
        }),
        EventSource::Explicit,
        at,
    )
}
