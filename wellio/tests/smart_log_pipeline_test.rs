mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;

use wellio::config::{ScoringConfig, SmartLogConfig};
use wellio::db::{DatabaseBackend, EventQuery};
use wellio::error::{Result, WellioError};
use wellio::intelligence::{
    Classification, ClassificationInput, ClassificationOracle, OracleOutput, RawEvent,
    SmartLogProcessor,
};
use wellio::models::{AuthorType, EventType, SmartLog, SmartLogStatus};
use wellio::services::{ProgressService, SmartLogService};

use common::{seed_client, test_db};

/// Returns the same answer every time.
struct ScriptedOracle {
    output: OracleOutput,
}

#[async_trait]
impl ClassificationOracle for ScriptedOracle {
    async fn classify(&self, _input: &ClassificationInput) -> Result<OracleOutput> {
        Ok(self.output.clone())
    }
}

struct SlowOracle;

#[async_trait]
impl ClassificationOracle for SlowOracle {
    async fn classify(&self, _input: &ClassificationInput) -> Result<OracleOutput> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(OracleOutput {
            events: Vec::new(),
            confidence: 1.0,
        })
    }
}

fn raw(event_type: &str, data: serde_json::Value, confidence: Option<f64>) -> RawEvent {
    RawEvent {
        event_type: event_type.to_string(),
        data,
        confidence,
    }
}

fn processor(events: Vec<RawEvent>, confidence: f64) -> SmartLogProcessor {
    SmartLogProcessor::new(
        Arc::new(ScriptedOracle {
            output: OracleOutput { events, confidence },
        }),
        &SmartLogConfig::default(),
    )
}

fn text_log(text: &str) -> SmartLog {
    let mut log = SmartLog::new("log-1".to_string(), "c1".to_string(), AuthorType::Coach);
    log.raw_text = Some(text.to_string());
    log
}

fn classified(result: Classification) -> Vec<wellio::models::ProgressEvent> {
    match result {
        Classification::Classified { events, .. } => events,
        Classification::Empty => panic!("expected a classified result"),
    }
}

#[tokio::test]
async fn test_low_confidence_events_need_review() {
    let processor = processor(
        vec![
            raw("nutrition", json!({"calories": 700, "mealType": "dinner"}), Some(0.95)),
            raw("mood", json!({"score": 4}), Some(0.3)),
        ],
        0.8,
    );

    let events = classified(
        processor
            .classify(&text_log("pasta for dinner, feeling meh"), Utc::now())
            .await
            .unwrap(),
    );

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type(), EventType::Nutrition);
    assert!(!events[0].needs_review);
    assert_eq!(events[1].event_type(), EventType::Mood);
    assert!(events[1].needs_review);
    assert!(events.iter().all(|e| e.smart_log_id.as_deref() == Some("log-1")));
}

#[tokio::test]
async fn test_unknown_type_becomes_unclassified_marker() {
    let processor = processor(vec![raw("meditation", json!({"minutes": 20}), Some(0.99))], 0.99);

    let events = classified(processor.classify(&text_log("meditated"), Utc::now()).await.unwrap());

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), EventType::Unclassified);
    assert!(events[0].needs_review);
}

#[tokio::test]
async fn test_no_events_yields_single_marker() {
    let processor = processor(Vec::new(), 0.9);

    let events = classified(
        processor
            .classify(&text_log("just saying hi"), Utc::now())
            .await
            .unwrap(),
    );

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type(), EventType::Unclassified);
    assert!(events[0].needs_review);
}

#[tokio::test]
async fn test_slow_oracle_times_out() {
    let processor = SmartLogProcessor::new(Arc::new(SlowOracle), &SmartLogConfig::default())
        .with_timeout(Duration::from_millis(50));

    let result = processor.classify(&text_log("ran 5k"), Utc::now()).await;
    assert!(matches!(result, Err(WellioError::Timeout(_))));
}

async fn service_with(
    processor: SmartLogProcessor,
) -> (SmartLogService, Arc<dyn DatabaseBackend>, tempfile::TempDir) {
    let (db, dir) = test_db().await;
    seed_client(&db, "c1", "coach-1").await;
    let progress = ProgressService::new(db.clone(), ScoringConfig::default());
    (SmartLogService::new(db.clone(), processor, progress), db, dir)
}

async fn stored_log(db: &Arc<dyn DatabaseBackend>, text: &str) -> SmartLog {
    let log = text_log(text);
    db.create_smart_log(&log).await.unwrap();
    log
}

#[tokio::test]
async fn test_reprocess_supersedes_previous_events() {
    let (service, db, _dir) = service_with(processor(
        vec![
            raw("exercise", json!({"activity": "bike", "durationMinutes": 45}), None),
            raw("sleep", json!({"durationHours": 7.5}), None),
        ],
        0.9,
    ))
    .await;
    let log = stored_log(&db, "biked 45 min, slept 7.5h").await;

    let first = service.process(&log.id).await.unwrap();
    let second = service.process(&log.id).await.unwrap();

    assert_eq!(first.resulting_event_ids.len(), 2);
    assert_eq!(second.resulting_event_ids.len(), 4);
    assert_eq!(second.attempts, 2);
    assert_eq!(second.status, SmartLogStatus::Processed);

    let active = db.list_events("c1", &EventQuery::default()).await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(active
        .iter()
        .all(|e| second.resulting_event_ids[2..].contains(&e.id)));

    let all = db.list_events_by_smart_log(&log.id, true).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all.iter().filter(|e| e.superseded).count(), 2);
}

#[tokio::test]
async fn test_unclassified_markers_do_not_score() {
    let (service, db, _dir) = service_with(processor(Vec::new(), 0.9)).await;
    let log = stored_log(&db, "hmm").await;

    let processed = service.process(&log.id).await.unwrap();
    assert_eq!(processed.status, SmartLogStatus::Processed);
    assert_eq!(processed.resulting_event_ids.len(), 1);

    let client = db.get_client("c1").await.unwrap().unwrap();
    assert_eq!(client.progress_score, Some(0.0));
}

#[tokio::test]
async fn test_timeout_is_recorded_on_the_log() {
    let slow = SmartLogProcessor::new(Arc::new(SlowOracle), &SmartLogConfig::default())
        .with_timeout(Duration::from_millis(50));
    let (service, db, _dir) = service_with(slow).await;
    let log = stored_log(&db, "leg day").await;

    let result = service.process(&log.id).await;
    assert!(matches!(result, Err(WellioError::Timeout(_))));

    let failed = service.get(&log.id).await.unwrap();
    assert_eq!(failed.status, SmartLogStatus::Failed);
    assert_eq!(failed.attempts, 1);
    assert!(failed.last_error.is_some());
    assert!(failed.resulting_event_ids.is_empty());
}
