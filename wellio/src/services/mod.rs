mod engagement;
mod events;
mod progress;
mod smart_logs;

pub use engagement::{EngagementMonitor, EngagementService};
pub use events::EventService;
pub use progress::{ProgressRefreshManager, ProgressService};
pub use smart_logs::{NewSmartLog, SmartLogService};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::config::DatabaseConfig;
    use crate::db::{Database, DatabaseBackend, LibSqlBackend};

    /// File-backed store; every `connect()` sees the same data.
    pub(crate) async fn test_backend() -> (Arc<dyn DatabaseBackend>, TempDir) {
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
}
