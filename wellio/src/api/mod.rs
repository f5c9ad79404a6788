mod routes;
mod state;
pub mod v1;

pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::AppState;
    use crate::config::{
        Config, DatabaseConfig, EngagementConfig, ProgressConfig, ScoringConfig, ServerConfig,
        SmartLogConfig,
    };
    use crate::db::{Database, DatabaseBackend, LibSqlBackend};
    use crate::intelligence::ClassificationOracle;
    use crate::llm::LlmProvider;

    pub(crate) fn test_config(api_keys: Vec<String>, database_url: String) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                api_keys,
            },
            database: DatabaseConfig {
                url: database_url,
                auth_token: None,
                local_path: None,
            },
            llm: None,
            scoring: ScoringConfig::default(),
            smart_log: SmartLogConfig::default(),
            engagement: EngagementConfig::default(),
            progress: ProgressConfig {
                refresh_interval_secs: 86400,
            },
        }
    }

    /// App state over a temp-file database. Without an oracle the LLM-backed
    /// one is used, which reports itself unavailable.
    pub(crate) async fn test_state(
        api_keys: Vec<String>,
        oracle: Option<Arc<dyn ClassificationOracle>>,
    ) -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(api_keys, dir.path().join("wellio.db").display().to_string());
        let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(
            Database::new(&config.database).await.unwrap(),
        ));
        let llm = LlmProvider::new(None);

        let state = match oracle {
            Some(oracle) => AppState::with_oracle(config, db, llm, oracle),
            None => AppState::new(config, db, llm),
        };
        (state, dir)
    }
}
