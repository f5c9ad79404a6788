//! Turns heterogeneous client input into canonical [`ProgressEvent`]s.
//!
//! Normalization never fails: input that cannot be mapped is logged and
//! dropped, so callers always get a (possibly empty) event list.

mod buckets;
mod device;
mod explicit;

pub use buckets::{energy_from_hrv, intensity_from_hr};
pub use explicit::{CheckInLog, ExplicitLog, NutritionLog, WorkoutLog};

use chrono::{DateTime, Utc};

use crate::models::ProgressEvent;

/// Raw input accepted by the normalizer.
#[derive(Debug, Clone)]
pub enum RawInput {
    Explicit(ExplicitLog),
    DeviceSync {
        provider: String,
        payload: serde_json::Value,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(
        &self,
        client_id: &str,
        input: &RawInput,
        now: DateTime<Utc>,
    ) -> Vec<ProgressEvent> {
        match input {
            RawInput::Explicit(log) => vec![explicit::normalize_explicit(client_id, log, now)],
            RawInput::DeviceSync { provider, payload } => {
                device::normalize_device_payload(client_id, provider, payload, now)
            }
        }
    }
}
