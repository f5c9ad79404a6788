use axum::{http::StatusCode, response::IntoResponse};

use wellio::api::v1::response::ApiResponse;
use wellio::config::{parse_llm_provider_model, KNOWN_LLM_PROVIDERS};
use wellio::error::WellioError;

#[test]
fn test_llm_config_known_providers() {
    assert_eq!(parse_llm_provider_model("openai/gpt-4o"), ("openai", "gpt-4o"));
    assert_eq!(parse_llm_provider_model("ollama/llama3.2"), ("ollama", "llama3.2"));
    assert_eq!(
        parse_llm_provider_model("lmstudio/qwen2.5-7b"),
        ("lmstudio", "qwen2.5-7b")
    );
}

#[test]
fn test_llm_config_openrouter_keeps_nested_model() {
    let (provider, model) = parse_llm_provider_model("openrouter/anthropic/claude-3.5-sonnet");
    assert_eq!(provider, "openrouter");
    assert_eq!(model, "anthropic/claude-3.5-sonnet");
}

#[test]
fn test_llm_config_unknown_prefix_defaults_to_local() {
    assert_eq!(
        parse_llm_provider_model("some-custom-model"),
        ("local", "some-custom-model")
    );
    assert_eq!(
        parse_llm_provider_model("unknown/model-name"),
        ("local", "unknown/model-name")
    );
}

#[test]
fn test_llm_config_prefix_is_case_insensitive() {
    let (provider, model) = parse_llm_provider_model("OpenAI/gpt-4o");
    assert_eq!(provider, "OpenAI");
    assert_eq!(model, "gpt-4o");
    assert!(KNOWN_LLM_PROVIDERS.contains(&provider.to_lowercase().as_str()));
}

#[test]
fn test_llm_errors_map_to_http_status() {
    let response = ApiResponse::<()>::from(WellioError::LlmUnavailable("no model".into()))
        .into_response();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

    let response =
        ApiResponse::<()>::from(WellioError::LlmRateLimit { retry_after: Some(3) }).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ApiResponse::<()>::from(WellioError::Llm("boom".into())).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_external_errors_are_flagged() {
    assert!(WellioError::LlmUnavailable("x".into()).is_external());
    assert!(WellioError::Timeout("x".into()).is_external());
    assert!(!WellioError::Validation("x".into()).is_external());
}
