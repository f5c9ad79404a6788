//! # V1 API Key Authentication Middleware
//!
//! Protects every v1 route except the public ones (`/health`, OpenAPI
//! document, docs) with Bearer token authentication against
//! `WELLIO_API_KEYS`. Failures use the v1 `ApiResponse` envelope.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

/// - No keys configured: every protected request gets 401, the server
///   itself still starts.
/// - Missing or malformed `Authorization: Bearer <token>`: 401.
/// - Unknown token: 401.
pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.server.api_keys.is_empty() {
        return ApiResponse::<()>::error(
            ErrorCode::Unauthorized,
            "API keys not configured. Set WELLIO_API_KEYS to enable access.",
        )
        .into_response();
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(token) => token.trim(),
            None => {
                return ApiResponse::<()>::error(
                    ErrorCode::Unauthorized,
                    "Invalid authorization header format. Expected: Bearer <token>",
                )
                .into_response();
            }
        },
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing authorization header",
            )
            .into_response();
        }
    };

    if state.config.server.api_keys.iter().any(|key| key == token) {
        next.run(request).await
    } else {
        tracing::debug!("Rejected request with unknown API key");
        ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid API key").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_state;
    use axum::http::StatusCode;
    use axum::{middleware, routing::get, Router};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn build_test_app(api_keys: Vec<String>) -> (Router, TempDir) {
        let (state, dir) = test_state(api_keys, None).await;

        async fn protected_handler() -> &'static str {
            "protected"
        }

        let protected_routes = Router::new()
            .route("/protected", get(protected_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                v1_auth_middleware,
            ));

        (protected_routes.with_state(state), dir)
    }

    async fn parse_error_body(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    fn request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_when_no_keys_configured() {
        let (app, _dir) = build_test_app(vec![]).await;
        let response = app.oneshot(request(Some("Bearer anything"))).await.unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("WELLIO_API_KEYS"));
    }

    #[tokio::test]
    async fn test_allows_valid_key() {
        let (app, _dir) = build_test_app(vec!["coach-key".to_string()]).await;
        let response = app.oneshot(request(Some("Bearer coach-key"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_invalid_key() {
        let (app, _dir) = build_test_app(vec!["coach-key".to_string()]).await;
        let response = app.oneshot(request(Some("Bearer nope"))).await.unwrap();

        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["message"], "Invalid API key");
    }

    #[tokio::test]
    async fn test_rejects_missing_or_malformed_header() {
        let (app, _dir) = build_test_app(vec!["coach-key".to_string()]).await;
        let response = app.clone().oneshot(request(None)).await.unwrap();
        let (_, json) = parse_error_body(response).await;
        assert_eq!(json["error"]["message"], "Missing authorization header");

        let response = app.oneshot(request(Some("Token coach-key"))).await.unwrap();
        let (status, json) = parse_error_body(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");
    }
}
