mod clients;
mod events;
mod goals;
mod smart_logs;
mod triggers;

pub use clients::ClientRepository;
pub use events::EventRepository;
pub use goals::GoalRepository;
pub use smart_logs::SmartLogRepository;
pub use triggers::TriggerRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width UTC timestamps so that text comparison in SQL orders them
/// chronologically.
pub(crate) fn to_db_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_db_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn parse_optional_time(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
pub(crate) async fn setup_test_db() -> libsql::Connection {
    let conn = libsql::Builder::new_local(":memory:")
        .build()
        .await
        .unwrap()
        .connect()
        .unwrap();
    crate::db::schema::init_schema(&conn).await.unwrap();
    conn
}
