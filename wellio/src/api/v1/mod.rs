pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::test_support::test_state;
    use crate::error::Result;
    use crate::intelligence::{ClassificationInput, ClassificationOracle, OracleOutput, RawEvent};

    const KEY: &str = "coach-key";

    /// Reads every smart log as a 40 minute run.
    struct RunOracle;

    #[async_trait]
    impl ClassificationOracle for RunOracle {
        async fn classify(&self, _input: &ClassificationInput) -> Result<OracleOutput> {
            Ok(OracleOutput {
                events: vec![RawEvent {
                    event_type: "exercise".into(),
                    data: json!({"activity": "run", "durationMinutes": 40}),
                    confidence: Some(0.95),
                }],
                confidence: 0.95,
            })
        }
    }

    async fn app(oracle: Option<Arc<dyn ClassificationOracle>>) -> (Router, TempDir) {
        let (state, dir) = test_state(vec![KEY.to_string()], oracle).await;
        (create_router(state), dir)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {KEY}"));
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn create_client(app: &Router) -> String {
        let (status, json) = call(
            app,
            "POST",
            "/api/v1/clients",
            Some(json!({"coachId": "coach-1", "name": "Dana", "sex": "female", "age": 34})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn protected_route_requires_auth() {
        let (app, _dir) = app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/clients")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn health_is_public_and_reports_classifier() {
        let (app, _dir) = app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["database"]["status"], "ok");
        assert_eq!(json["data"]["classifier"]["status"], "unavailable");
        assert!(json["data"]["classifier"]["reason"].is_string());
        assert_eq!(json["data"]["background"]["engagementMonitor"], true);
    }

    #[tokio::test]
    async fn openapi_json_is_public_and_valid() {
        let (app, _dir) = app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["openapi"].as_str().unwrap().starts_with('3'));
        assert!(json["paths"]["/api/v1/clients/{clientId}/smart-logs"].is_object());
        assert!(json["paths"]["/api/v1/webhooks/{provider}"].is_object());
    }

    #[tokio::test]
    async fn unknown_client_returns_not_found_envelope() {
        let (app, _dir) = app(None).await;
        let (status, json) = call(&app, "GET", "/api/v1/clients/ghost", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn create_client_validates_input() {
        let (app, _dir) = app(None).await;
        let (status, json) = call(
            &app,
            "POST",
            "/api/v1/clients",
            Some(json!({"coachId": "coach-1", "name": "  "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn explicit_log_goal_and_progress_flow() {
        let (app, _dir) = app(None).await;
        let client_id = create_client(&app).await;

        let (status, goal) = call(
            &app,
            "POST",
            &format!("/api/v1/clients/{client_id}/goals"),
            Some(json!({"goalType": "weight_loss", "baselineValue": 90.0, "targetValue": 80.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let goal_id = goal["data"]["id"].as_str().unwrap().to_string();

        let (status, goal) = call(
            &app,
            "PATCH",
            &format!("/api/v1/goals/{goal_id}"),
            Some(json!({"currentValue": 85.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(goal["data"]["completionPercent"], 50.0);

        let (status, event) = call(
            &app,
            "POST",
            &format!("/api/v1/clients/{client_id}/events"),
            Some(json!({"logType": "workout", "activity": "row", "avgHrBpm": 150})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["data"]["eventType"], "exercise");
        assert_eq!(event["data"]["source"], "explicit");

        let (status, events) = call(
            &app,
            "GET",
            &format!("/api/v1/clients/{client_id}/events?eventType=exercise"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(events["meta"]["total"], 1);

        let (status, score) = call(
            &app,
            "POST",
            &format!("/api/v1/clients/{client_id}/progress"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(score["data"]["goalProgress"], 50.0);
        assert_eq!(score["data"]["activeGoals"], 1);

        let (_, client) = call(&app, "GET", &format!("/api/v1/clients/{client_id}"), None).await;
        assert!(client["data"]["progressScore"].is_number());
    }

    #[tokio::test]
    async fn smart_log_is_accepted_then_processed() {
        let (app, _dir) = app(Some(Arc::new(RunOracle))).await;
        let client_id = create_client(&app).await;

        let (status, log) = call(
            &app,
            "POST",
            &format!("/api/v1/clients/{client_id}/smart-logs"),
            Some(json!({"rawText": "ran along the river for 40 minutes"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(log["data"]["authorType"], "client");
        let log_id = log["data"]["id"].as_str().unwrap().to_string();

        let mut processed = Value::Null;
        for _ in 0..50 {
            let (_, json) = call(&app, "GET", &format!("/api/v1/smart-logs/{log_id}"), None).await;
            if json["data"]["status"] == "processed" {
                processed = json;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(processed["data"]["resultingEventIds"].as_array().unwrap().len(), 1);

        let (_, events) = call(
            &app,
            "GET",
            &format!("/api/v1/clients/{client_id}/events"),
            None,
        )
        .await;
        assert_eq!(events["data"][0]["source"], "smart_log");
        assert_eq!(events["data"][0]["smartLogId"], log_id.as_str());
    }

    #[tokio::test]
    async fn webhook_without_reference_id_is_rejected() {
        let (app, _dir) = app(None).await;
        let (status, json) = call(
            &app,
            "POST",
            "/api/v1/webhooks/terra",
            Some(json!({"type": "activity", "data": []})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn archived_client_is_hidden_from_default_list() {
        let (app, _dir) = app(None).await;
        let client_id = create_client(&app).await;

        let (status, archived) =
            call(&app, "DELETE", &format!("/api/v1/clients/{client_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(archived["data"]["archivedAt"].is_string());

        let (_, list) = call(&app, "GET", "/api/v1/clients?coachId=coach-1", None).await;
        assert_eq!(list["meta"]["total"], 0);
        let (_, list) = call(
            &app,
            "GET",
            "/api/v1/clients?coachId=coach-1&includeArchived=true",
            None,
        )
        .await;
        assert_eq!(list["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn batch_recalculation_reports_counts() {
        let (app, _dir) = app(None).await;
        create_client(&app).await;
        create_client(&app).await;

        let (status, json) = call(&app, "POST", "/api/v1/admin/progress:recalculate", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["updated"], 2);
        assert_eq!(json["data"]["failed"].as_array().unwrap().len(), 0);
    }
}
