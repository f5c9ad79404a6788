use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Inactivity,
    MissedWorkout,
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactivity => write!(f, "inactivity"),
            Self::MissedWorkout => write!(f, "missed_workout"),
        }
    }
}

impl std::str::FromStr for TriggerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inactivity" => Ok(Self::Inactivity),
            "missed_workout" => Ok(Self::MissedWorkout),
            _ => Err(format!("Unknown trigger type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown severity: {s}")),
        }
    }
}

/// A rule-detected condition flagged for coach follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementTrigger {
    pub id: String,
    pub client_id: String,
    pub trigger_type: TriggerType,
    pub severity: Severity,
    pub reason: String,
    pub recommended_action: String,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EngagementTrigger {
    pub fn new(
        client_id: String,
        trigger_type: TriggerType,
        severity: Severity,
        reason: String,
        recommended_action: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: nanoid!(),
            client_id,
            trigger_type,
            severity,
            reason,
            recommended_action,
            resolved_at: None,
            resolved_by: None,
            created_at,
        }
    }

    pub fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }
}
