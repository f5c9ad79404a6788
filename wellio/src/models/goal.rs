use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("Unknown goal status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub client_id: String,
    pub goal_type: String,
    /// Starting point the completion ratio is measured from.
    pub baseline_value: f64,
    pub target_value: f64,
    pub current_value: f64,
    pub deadline: Option<DateTime<Utc>>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        id: String,
        client_id: String,
        goal_type: String,
        baseline_value: f64,
        target_value: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            client_id,
            goal_type,
            baseline_value,
            target_value,
            current_value: baseline_value,
            deadline: None,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Signed progress in percent, capped at 100 but not floored: a goal
    /// that moved away from its target reports a negative value.
    ///
    /// Works for decreasing goals too (weight loss: baseline 90, target 80).
    /// A degenerate goal whose target equals its baseline is either done or not.
    pub fn progress_percent(&self) -> f64 {
        let span = self.target_value - self.baseline_value;
        if span == 0.0 || !span.is_finite() {
            return if self.current_value >= self.target_value {
                100.0
            } else {
                0.0
            };
        }

        let ratio = 100.0 * (self.current_value - self.baseline_value) / span;
        if ratio.is_nan() {
            return 0.0;
        }
        ratio.min(100.0)
    }

    /// Completion in percent for display, clamped to `[0, 100]`.
    pub fn completion_percent(&self) -> f64 {
        self.progress_percent().max(0.0)
    }
}
