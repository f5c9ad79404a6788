use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// SQLite pragmas applied once at startup. Values come from the environment
/// and are normalized to the accepted keywords.
#[derive(Debug, Clone)]
struct Pragmas {
    busy_timeout_ms: u64,
    journal_mode: &'static str,
    synchronous: &'static str,
}

impl Pragmas {
    fn from_env() -> Self {
        let busy_timeout_ms = std::env::var("DATABASE_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5000);
        let journal_mode = std::env::var("DATABASE_JOURNAL_MODE")
            .map(|v| normalize_journal_mode(&v))
            .unwrap_or("WAL");
        let synchronous = std::env::var("DATABASE_SYNCHRONOUS")
            .map(|v| normalize_synchronous(&v))
            .unwrap_or("NORMAL");

        Self {
            busy_timeout_ms,
            journal_mode,
            synchronous,
        }
    }

    fn statements(&self) -> [(&'static str, String); 3] {
        [
            ("busy_timeout", self.busy_timeout_ms.to_string()),
            ("journal_mode", self.journal_mode.to_string()),
            ("synchronous", self.synchronous.to_string()),
        ]
    }
}

/// Shared handle to the Wellio store. Cloning is cheap.
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
    pragmas: Pragmas,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            let token = config.auth_token.clone().unwrap_or_default();
            match config.local_path {
                Some(ref local_path) => {
                    Builder::new_remote_replica(local_path, config.url.clone(), token)
                        .build()
                        .await?
                }
                None => Builder::new_remote(config.url.clone(), token).build().await?,
            }
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        let database = Self {
            db: Arc::new(db),
            pragmas: Pragmas::from_env(),
        };
        database.apply_pragmas().await?;
        schema::init_schema(&database.connect()?).await?;

        tracing::debug!(url = %config.url, "Database ready");
        Ok(database)
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    async fn apply_pragmas(&self) -> Result<()> {
        let conn = self.connect()?;

        for (name, value) in self.pragmas.statements() {
            if let Err(error) = conn.execute_batch(&format!("PRAGMA {name} = {value}")).await {
                tracing::warn!(
                    pragma = name,
                    value = %value,
                    error = %error,
                    "Failed to apply SQLite pragma"
                );
            }
        }

        Ok(())
    }

    /// Pull from the primary when running as an embedded replica.
    pub async fn sync(&self) -> Result<()> {
        if let Ok(sync) = self.db.sync().await {
            tracing::info!("Database synced: {:?}", sync);
        }
        Ok(())
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragma_values_normalized() {
        assert_eq!(normalize_journal_mode(" delete "), "DELETE");
        assert_eq!(normalize_journal_mode("bogus"), "WAL");
        assert_eq!(normalize_synchronous("full"), "FULL");
        assert_eq!(normalize_synchronous(""), "NORMAL");
    }
}
