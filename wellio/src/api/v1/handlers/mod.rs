pub mod admin;
pub mod clients;
pub mod events;
pub mod goals;
pub(crate) mod health;
pub mod progress;
pub mod smart_logs;
pub mod triggers;
pub mod webhooks;

pub use health::health_check;
