use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::buckets::{energy_from_hrv, intensity_from_hr};
use crate::models::{EventData, EventSource, EventType, ProgressEvent};

/// How a source value becomes a canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Number,
    Text,
    SecondsToMinutes,
    SecondsToHours,
}

/// One canonical field and the JSON pointers that may carry it, in
/// priority order. The first non-null source wins.
struct FieldSource {
    field: &'static str,
    pointers: &'static [&'static str],
    conversion: Conversion,
}

struct PayloadMapping {
    event_type: EventType,
    fields: &'static [FieldSource],
}

const EXERCISE_FIELDS: &[FieldSource] = &[
    FieldSource {
        field: "activity",
        pointers: &["/metadata/name", "/metadata/type_name"],
        conversion: Conversion::Text,
    },
    FieldSource {
        field: "durationMinutes",
        pointers: &[
            "/active_durations_data/activity_seconds",
            "/metadata/duration_seconds",
        ],
        conversion: Conversion::SecondsToMinutes,
    },
    FieldSource {
        field: "caloriesBurned",
        pointers: &[
            "/calories_data/total_burned_calories",
            "/calories_data/net_activity_calories",
            "/calories_data/activity_burned_calories",
        ],
        conversion: Conversion::Number,
    },
    FieldSource {
        field: "avgHrBpm",
        pointers: &[
            "/heart_rate_data/summary/avg_hr_bpm",
            "/heart_rate_data/avg_hr_bpm",
            "/avg_hr_bpm",
        ],
        conversion: Conversion::Number,
    },
];

const NUTRITION_FIELDS: &[FieldSource] = &[
    FieldSource {
        field: "calories",
        pointers: &[
            "/summary/macros/calories",
            "/summary/calories",
            "/calories_data/net_intake_calories",
            "/net_intake_calories",
        ],
        conversion: Conversion::Number,
    },
    FieldSource {
        field: "proteinG",
        pointers: &["/summary/macros/protein_g", "/summary/protein_g"],
        conversion: Conversion::Number,
    },
    FieldSource {
        field: "carbsG",
        pointers: &[
            "/summary/macros/carbohydrates_g",
            "/summary/carbohydrates_g",
        ],
        conversion: Conversion::Number,
    },
    FieldSource {
        field: "fatG",
        pointers: &["/summary/macros/fat_g", "/summary/fat_g"],
        conversion: Conversion::Number,
    },
    FieldSource {
        field: "mealType",
        pointers: &["/meals/0/type", "/meals/0/name"],
        conversion: Conversion::Text,
    },
];

const SLEEP_FIELDS: &[FieldSource] = &[
    FieldSource {
        field: "durationHours",
        pointers: &[
            "/sleep_durations_data/asleep/duration_asleep_state_seconds",
            "/sleep_durations_data/asleep_seconds",
        ],
        conversion: Conversion::SecondsToHours,
    },
    FieldSource {
        field: "hrvRmssdMs",
        pointers: &[
            "/heart_rate_data/summary/avg_hrv_rmssd",
            "/heart_rate_data/avg_hrv_rmssd",
            "/hrv_rmssd_ms",
        ],
        conversion: Conversion::Number,
    },
];

const WEIGHT_FIELDS: &[FieldSource] = &[
    FieldSource {
        field: "weightKg",
        pointers: &[
            "/measurements_data/measurements/0/weight_kg",
            "/measurements_data/weight_kg",
            "/weight_kg",
        ],
        conversion: Conversion::Number,
    },
    FieldSource {
        field: "bodyFatPct",
        pointers: &[
            "/measurements_data/measurements/0/bodyfat_percentage",
            "/measurements_data/body_fat_percentage",
            "/bodyfat_percentage",
        ],
        conversion: Conversion::Number,
    },
];

const EXERCISE_MAPPING: PayloadMapping = PayloadMapping {
    event_type: EventType::Exercise,
    fields: EXERCISE_FIELDS,
};

const NUTRITION_MAPPING: PayloadMapping = PayloadMapping {
    event_type: EventType::Nutrition,
    fields: NUTRITION_FIELDS,
};

const SLEEP_MAPPING: PayloadMapping = PayloadMapping {
    event_type: EventType::Sleep,
    fields: SLEEP_FIELDS,
};

const WEIGHT_MAPPING: PayloadMapping = PayloadMapping {
    event_type: EventType::Weight,
    fields: WEIGHT_FIELDS,
};

const TIMESTAMP_POINTERS: &[&str] = &["/metadata/start_time", "/metadata/end_time", "/timestamp"];

/// Aggregator providers that deliver the same summary shapes.
const KNOWN_PROVIDERS: &[&str] = &[
    "terra", "garmin", "fitbit", "oura", "whoop", "polar", "withings", "apple", "google",
    "strava", "myfitnesspal",
];

fn mapping_for(payload_type: &str) -> Option<&'static PayloadMapping> {
    match payload_type.to_lowercase().as_str() {
        "activity" | "daily" => Some(&EXERCISE_MAPPING),
        "nutrition" => Some(&NUTRITION_MAPPING),
        "sleep" => Some(&SLEEP_MAPPING),
        "body" => Some(&WEIGHT_MAPPING),
        _ => None,
    }
}

fn convert(value: &Value, conversion: Conversion) -> Option<Value> {
    match conversion {
        Conversion::Text => value.as_str().map(|s| Value::String(s.to_string())),
        Conversion::Number => value.as_f64().map(Value::from),
        Conversion::SecondsToMinutes => value.as_f64().map(|s| Value::from((s / 60.0).round())),
        Conversion::SecondsToHours => value
            .as_f64()
            .map(|s| Value::from((s / 3600.0 * 100.0).round() / 100.0)),
    }
}

fn resolve(element: &Value, source: &FieldSource) -> Value {
    for pointer in source.pointers {
        match element.pointer(pointer) {
            None | Some(Value::Null) => continue,
            Some(raw) => match convert(raw, source.conversion) {
                Some(converted) => return converted,
                None => {
                    debug!(
                        field = source.field,
                        pointer = *pointer,
                        "Device field has unexpected type, trying next source"
                    );
                }
            },
        }
    }
    Value::Null
}

fn element_timestamp(element: &Value) -> Option<DateTime<Utc>> {
    TIMESTAMP_POINTERS.iter().find_map(|pointer| {
        element
            .pointer(pointer)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// Fill in bucketed fields derived from raw measurements.
fn derive_buckets(event_type: EventType, fields: &mut Map<String, Value>) {
    match event_type {
        EventType::Exercise => {
            if let Some(hr) = fields.get("avgHrBpm").and_then(Value::as_f64) {
                fields.insert(
                    "intensity".to_string(),
                    Value::String(intensity_from_hr(hr).to_string()),
                );
            }
        }
        EventType::Sleep => {
            if let Some(hrv) = fields.get("hrvRmssdMs").and_then(Value::as_f64) {
                fields.insert(
                    "energy".to_string(),
                    Value::String(energy_from_hrv(hrv).to_string()),
                );
            }
        }
        _ => {}
    }
}

fn normalize_element(
    client_id: &str,
    provider: &str,
    mapping: &PayloadMapping,
    index: usize,
    element: &Value,
    now: DateTime<Utc>,
) -> Option<ProgressEvent> {
    if !element.is_object() {
        warn!(provider, index, "Device payload element is not an object, skipping");
        return None;
    }

    let mut fields = Map::new();
    for source in mapping.fields {
        fields.insert(source.field.to_string(), resolve(element, source));
    }

    if fields.values().all(Value::is_null) {
        warn!(
            provider,
            index,
            event_type = %mapping.event_type,
            "Device payload element has no mappable fields, skipping"
        );
        return None;
    }

    derive_buckets(mapping.event_type, &mut fields);

    let data = match EventData::from_parts(&mapping.event_type.to_string(), Value::Object(fields))
    {
        Ok(data) => data,
        Err(e) => {
            warn!(provider, index, error = %e, "Failed to build event from device payload");
            return None;
        }
    };

    let created_at = element_timestamp(element).unwrap_or(now);
    Some(ProgressEvent::new(
        client_id.to_string(),
        data,
        EventSource::DeviceSync,
        created_at,
    ))
}

pub(super) fn normalize_device_payload(
    client_id: &str,
    provider: &str,
    payload: &Value,
    now: DateTime<Utc>,
) -> Vec<ProgressEvent> {
    if !KNOWN_PROVIDERS.contains(&provider.to_lowercase().as_str()) {
        debug!(provider, "Unrecognized provider, using aggregator field dictionary");
    }

    let Some(payload_type) = payload.get("type").and_then(Value::as_str) else {
        warn!(provider, "Device payload has no type, nothing to normalize");
        return Vec::new();
    };

    let Some(mapping) = mapping_for(payload_type) else {
        warn!(provider, payload_type, "Unsupported device payload type");
        return Vec::new();
    };

    let Some(elements) = payload.get("data").and_then(Value::as_array) else {
        warn!(provider, payload_type, "Device payload has no data array");
        return Vec::new();
    };

    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| {
            normalize_element(client_id, provider, mapping, index, element, now)
        })
        .collect()
}
