use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ProgressEvent;

/// What the classification oracle gets to see of a smart log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationInput {
    pub smart_log_id: String,
    pub client_id: String,
    /// Trimmed text, `None` when the log is media-only
    pub raw_text: Option<String>,
    pub media_urls: Vec<String>,
}

/// One untyped event as proposed by the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(alias = "event_type", alias = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
    /// Per-event confidence; falls back to the overall confidence
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Oracle answer: proposed events plus an overall confidence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleOutput {
    #[serde(default)]
    pub events: Vec<RawEvent>,
    #[serde(default)]
    pub confidence: f64,
}

/// Wrapper for LLM responses that can be either the documented object or a
/// bare array of events
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OracleResponse {
    Object(OracleOutput),
    Events(Vec<RawEvent>),
}

impl From<OracleResponse> for OracleOutput {
    fn from(response: OracleResponse) -> Self {
        match response {
            OracleResponse::Object(output) => output,
            OracleResponse::Events(events) => {
                // Without an overall figure, trust the least confident event
                let confidence = events
                    .iter()
                    .filter_map(|e| e.confidence)
                    .fold(None, |min: Option<f64>, c| Some(min.map_or(c, |m| m.min(c))))
                    .unwrap_or(0.0);
                OracleOutput { events, confidence }
            }
        }
    }
}

/// Outcome of classifying one smart log
#[derive(Debug, Clone)]
pub enum Classification {
    /// Nothing to classify (no text, no media)
    Empty,
    Classified {
        events: Vec<ProgressEvent>,
        confidence: f64,
    },
}
