//! v1 API Data Transfer Objects.
//!
//! Wire format of the v1 REST API, kept separate from the domain models in
//! `src/models/`. Conversions from the domain live next to each response.

pub mod admin;
pub mod clients;
pub mod common;
pub mod events;
pub mod goals;
pub mod progress;
pub mod smart_logs;
pub mod triggers;

pub use admin::*;
pub use clients::*;
pub use common::*;
pub use events::*;
pub use goals::*;
pub use progress::*;
pub use smart_logs::*;
pub use triggers::*;
