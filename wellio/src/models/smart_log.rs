use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthorType {
    #[default]
    Client,
    Coach,
}

impl std::fmt::Display for AuthorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Coach => write!(f, "coach"),
        }
    }
}

impl std::str::FromStr for AuthorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "coach" => Ok(Self::Coach),
            _ => Err(format!("Unknown author type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmartLogStatus {
    #[default]
    Pending,
    Processed,
    Failed,
    /// Nothing to classify; terminal.
    Empty,
}

impl std::fmt::Display for SmartLogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processed => write!(f, "processed"),
            Self::Failed => write!(f, "failed"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

impl std::str::FromStr for SmartLogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processed" => Ok(Self::Processed),
            "failed" => Ok(Self::Failed),
            "empty" => Ok(Self::Empty),
            _ => Err(format!("Unknown smart log status: {s}")),
        }
    }
}

/// Free-form client or coach entry awaiting classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartLog {
    pub id: String,
    pub client_id: String,
    pub author_type: AuthorType,
    pub raw_text: Option<String>,
    pub media_urls: Vec<String>,
    pub status: SmartLogStatus,
    pub processed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub attempts: u32,
    /// Every event this log ever produced, superseded ones included.
    pub resulting_event_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SmartLog {
    pub fn new(id: String, client_id: String, author_type: AuthorType) -> Self {
        let now = Utc::now();
        Self {
            id,
            client_id,
            author_type,
            raw_text: None,
            media_urls: Vec::new(),
            status: SmartLogStatus::Pending,
            processed_at: None,
            last_error: None,
            attempts: 0,
            resulting_event_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Trimmed text, if any remains.
    pub fn text(&self) -> Option<&str> {
        self.raw_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn has_content(&self) -> bool {
        self.text().is_some() || self.media_urls.iter().any(|u| !u.trim().is_empty())
    }
}
