use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::buckets::intensity_from_hr;
use crate::models::{
    CheckInData, EnergyLevel, EventData, EventSource, ExerciseData, Intensity, NutritionData,
    ProgressEvent,
};

/// A structured log submitted directly by a client or coach.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "logType", rename_all = "snake_case")]
pub enum ExplicitLog {
    Nutrition(NutritionLog),
    Workout(WorkoutLog),
    CheckIn(CheckInLog),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLog {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    #[serde(default)]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub avg_hr_bpm: Option<f64>,
    #[serde(default)]
    pub intensity: Option<Intensity>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInLog {
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub energy: Option<EnergyLevel>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

pub(super) fn normalize_explicit(
    client_id: &str,
    log: &ExplicitLog,
    now: DateTime<Utc>,
) -> ProgressEvent {
    let (data, logged_at) = match log {
        ExplicitLog::Nutrition(n) => (
            EventData::Nutrition(NutritionData {
                calories: n.calories,
                protein_g: n.protein_g,
                carbs_g: n.carbs_g,
                fat_g: n.fat_g,
                meal_type: n.meal_type.clone(),
                notes: n.notes.clone(),
            }),
            n.logged_at,
        ),
        ExplicitLog::Workout(w) => (
            EventData::Exercise(ExerciseData {
                activity: w.activity.clone(),
                duration_minutes: w.duration_minutes,
                calories_burned: w.calories_burned,
                avg_hr_bpm: w.avg_hr_bpm,
                // A stated intensity beats the heart-rate estimate
                intensity: w.intensity.or(w.avg_hr_bpm.map(intensity_from_hr)),
                notes: w.notes.clone(),
            }),
            w.logged_at,
        ),
        ExplicitLog::CheckIn(c) => (
            EventData::CheckIn(CheckInData {
                weight_kg: c.weight_kg,
                mood: c.mood.clone(),
                sleep_hours: c.sleep_hours,
                energy: c.energy,
                notes: c.notes.clone(),
            }),
            c.logged_at,
        ),
    };

    ProgressEvent::new(
        client_id.to_string(),
        data,
        EventSource::Explicit,
        logged_at.unwrap_or(now),
    )
}
