use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{Classification, ClassificationInput, OracleOutput, OracleResponse};
use crate::config::SmartLogConfig;
use crate::error::{Result, WellioError};
use crate::llm::{prompts, CompletionOptions, LlmProvider};
use crate::models::{EventData, EventSource, ProgressEvent, SmartLog};

/// External classifier that proposes progress events for a smart log.
#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    async fn classify(&self, input: &ClassificationInput) -> Result<OracleOutput>;
}

/// Oracle backed by the configured chat-completion LLM
#[derive(Debug, Clone)]
pub struct LlmClassificationOracle {
    llm: LlmProvider,
}

impl LlmClassificationOracle {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ClassificationOracle for LlmClassificationOracle {
    async fn classify(&self, input: &ClassificationInput) -> Result<OracleOutput> {
        if !self.llm.is_available() {
            return Err(WellioError::LlmUnavailable(
                "No LLM configured for smart-log classification".to_string(),
            ));
        }

        let prompt =
            prompts::smart_log_classification_prompt(input.raw_text.as_deref(), &input.media_urls);
        let options = CompletionOptions {
            temperature: Some(0.0),
            max_tokens: None,
        };

        let response: OracleResponse = self
            .llm
            .complete_structured(
                &prompt,
                Some(prompts::SMART_LOG_SYSTEM_PROMPT),
                Some(&options),
            )
            .await?;

        Ok(response.into())
    }
}

/// Runs one smart log through the oracle and maps the answer onto typed
/// progress events. Persistence is left to the caller.
#[derive(Clone)]
pub struct SmartLogProcessor {
    oracle: Arc<dyn ClassificationOracle>,
    timeout: Duration,
    review_threshold: f64,
}

impl SmartLogProcessor {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, config: &SmartLogConfig) -> Self {
        Self {
            oracle,
            timeout: Duration::from_secs(config.classify_timeout_secs),
            review_threshold: config.review_threshold,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Classify a smart log. The oracle is called at most once.
    pub async fn classify(&self, log: &SmartLog, now: DateTime<Utc>) -> Result<Classification> {
        if !log.has_content() {
            return Ok(Classification::Empty);
        }

        let input = ClassificationInput {
            smart_log_id: log.id.clone(),
            client_id: log.client_id.clone(),
            raw_text: log.text().map(str::to_string),
            media_urls: log
                .media_urls
                .iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect(),
        };

        let output = match tokio::time::timeout(self.timeout, self.oracle.classify(&input)).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(WellioError::Timeout(format!(
                    "Classification of smart log {} exceeded {}s",
                    log.id,
                    self.timeout.as_secs()
                )))
            }
        };

        let confidence = clamp_confidence(output.confidence);
        let events = self.map_events(log, output, now);

        tracing::debug!(
            smart_log_id = %log.id,
            events = events.len(),
            confidence,
            "Smart log classified"
        );

        Ok(Classification::Classified { events, confidence })
    }

    fn map_events(
        &self,
        log: &SmartLog,
        output: OracleOutput,
        now: DateTime<Utc>,
    ) -> Vec<ProgressEvent> {
        let overall = clamp_confidence(output.confidence);

        if output.events.is_empty() {
            let marker = EventData::unclassified(
                "Classifier found no progress events",
                log.text().map(str::to_string),
            );
            return vec![self.build_event(log, marker, overall, now)];
        }

        output
            .events
            .into_iter()
            .map(|raw| {
                let confidence = clamp_confidence(raw.confidence.unwrap_or(overall));
                let data = match EventData::from_parts(&raw.event_type, raw.data.clone()) {
                    Ok(data) if data.has_values() => data,
                    Ok(_) => EventData::unclassified(
                        format!("No recognizable fields for {}", raw.event_type),
                        Some(raw.data.to_string()),
                    ),
                    Err(e) => {
                        tracing::warn!(
                            smart_log_id = %log.id,
                            event_type = %raw.event_type,
                            error = %e,
                            "Oracle event did not parse, keeping as unclassified"
                        );
                        EventData::unclassified(e, Some(raw.data.to_string()))
                    }
                };
                self.build_event(log, data, confidence, now)
            })
            .collect()
    }

    fn build_event(
        &self,
        log: &SmartLog,
        data: EventData,
        confidence: f64,
        now: DateTime<Utc>,
    ) -> ProgressEvent {
        let unclassified = matches!(data, EventData::Unclassified(_));
        let mut event = ProgressEvent::new(log.client_id.clone(), data, EventSource::SmartLog, now);
        event.confidence = confidence;
        event.needs_review = unclassified || confidence < self.review_threshold;
        event.smart_log_id = Some(log.id.clone());
        event
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
