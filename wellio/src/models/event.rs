use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Nutrition,
    Exercise,
    Sleep,
    Weight,
    Mood,
    CheckIn,
    Unclassified,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nutrition => write!(f, "nutrition"),
            Self::Exercise => write!(f, "exercise"),
            Self::Sleep => write!(f, "sleep"),
            Self::Weight => write!(f, "weight"),
            Self::Mood => write!(f, "mood"),
            Self::CheckIn => write!(f, "check_in"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nutrition" | "meal" => Ok(Self::Nutrition),
            "exercise" | "workout" => Ok(Self::Exercise),
            "sleep" => Ok(Self::Sleep),
            "weight" | "body" => Ok(Self::Weight),
            "mood" => Ok(Self::Mood),
            "check_in" | "checkin" => Ok(Self::CheckIn),
            "unclassified" => Ok(Self::Unclassified),
            _ => Err(format!("Unknown event type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    #[default]
    Explicit,
    SmartLog,
    DeviceSync,
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::SmartLog => write!(f, "smart_log"),
            Self::DeviceSync => write!(f, "device_sync"),
        }
    }
}

impl std::str::FromStr for EventSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explicit" => Ok(Self::Explicit),
            "smart_log" => Ok(Self::SmartLog),
            "device_sync" => Ok(Self::DeviceSync),
            _ => Err(format!("Unknown event source: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    Average,
    High,
}

impl std::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Average => write!(f, "average"),
            Self::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionData {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub meal_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseData {
    pub activity: Option<String>,
    pub duration_minutes: Option<f64>,
    pub calories_burned: Option<f64>,
    pub avg_hr_bpm: Option<f64>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SleepData {
    pub duration_hours: Option<f64>,
    pub hrv_rmssd_ms: Option<f64>,
    pub energy: Option<EnergyLevel>,
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightData {
    pub weight_kg: Option<f64>,
    pub body_fat_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MoodData {
    pub score: Option<f64>,
    pub label: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckInData {
    pub weight_kg: Option<f64>,
    pub mood: Option<String>,
    pub sleep_hours: Option<f64>,
    pub energy: Option<EnergyLevel>,
    pub notes: Option<String>,
}

/// Marker for input that could not be turned into typed data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnclassifiedData {
    pub reason: String,
    #[serde(default)]
    pub raw_text: Option<String>,
}

/// Typed payload of a progress event, tagged by `eventType`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "eventType", content = "data", rename_all = "snake_case")]
pub enum EventData {
    Nutrition(NutritionData),
    Exercise(ExerciseData),
    Sleep(SleepData),
    Weight(WeightData),
    Mood(MoodData),
    CheckIn(CheckInData),
    Unclassified(UnclassifiedData),
}

impl EventData {
    /// Parse an untyped `(eventType, data)` pair, e.g. from an oracle answer
    /// or a stored row.
    pub fn from_parts(event_type: &str, data: serde_json::Value) -> Result<Self, String> {
        let event_type: EventType = event_type.parse()?;
        let data = match data {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            serde_json::Value::Object(_) => data,
            other => {
                return Err(format!(
                    "Invalid {event_type} data: expected an object, got {other}"
                ))
            }
        };

        let parsed = match event_type {
            EventType::Nutrition => serde_json::from_value(data).map(Self::Nutrition),
            EventType::Exercise => serde_json::from_value(data).map(Self::Exercise),
            EventType::Sleep => serde_json::from_value(data).map(Self::Sleep),
            EventType::Weight => serde_json::from_value(data).map(Self::Weight),
            EventType::Mood => serde_json::from_value(data).map(Self::Mood),
            EventType::CheckIn => serde_json::from_value(data).map(Self::CheckIn),
            EventType::Unclassified => serde_json::from_value(data).map(Self::Unclassified),
        };
        parsed.map_err(|e| format!("Invalid {event_type} data: {e}"))
    }

    pub fn unclassified(reason: impl Into<String>, raw_text: Option<String>) -> Self {
        Self::Unclassified(UnclassifiedData {
            reason: reason.into(),
            raw_text,
        })
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Self::Nutrition(_) => EventType::Nutrition,
            Self::Exercise(_) => EventType::Exercise,
            Self::Sleep(_) => EventType::Sleep,
            Self::Weight(_) => EventType::Weight,
            Self::Mood(_) => EventType::Mood,
            Self::CheckIn(_) => EventType::CheckIn,
            Self::Unclassified(_) => EventType::Unclassified,
        }
    }

    /// JSON of the inner payload only, as stored in the `data` column.
    pub fn payload(&self) -> serde_json::Value {
        let tagged = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        tagged
            .get("data")
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }

    /// Whether at least one field carries a value. Unclassified markers
    /// always count as having content.
    pub fn has_values(&self) -> bool {
        match self {
            Self::Unclassified(_) => true,
            _ => self
                .payload()
                .as_object()
                .map(|fields| fields.values().any(|v| !v.is_null()))
                .unwrap_or(false),
        }
    }
}

/// Canonical record of one client activity or measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub id: String,
    pub client_id: String,
    pub data: EventData,
    pub source: EventSource,
    pub confidence: f64,
    pub needs_review: bool,
    pub smart_log_id: Option<String>,
    pub superseded: bool,
    pub corrected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(
        client_id: String,
        data: EventData,
        source: EventSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: nanoid!(),
            client_id,
            data,
            source,
            confidence: 1.0,
            needs_review: false,
            smart_log_id: None,
            superseded: false,
            corrected_at: None,
            created_at,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.data.event_type()
    }

    pub fn is_exercise(&self) -> bool {
        matches!(self.data, EventData::Exercise(_))
    }
}
