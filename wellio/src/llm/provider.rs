use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{Result, WellioError};
use crate::llm::api::LlmApiClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Resolved LLM backend. Construction never fails; a missing or unusable
/// configuration yields an unavailable provider instead.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
    client: Option<LlmApiClient>,
}

impl std::fmt::Debug for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmProvider")
            .field("backend", &self.backend)
            .finish()
    }
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => {
                if let Some(base_url) = &config.base_url {
                    LlmBackend::OpenAICompatible {
                        base_url: base_url.clone(),
                    }
                } else {
                    LlmBackend::Unavailable {
                        reason: format!("Unknown provider in model: {}", config.model),
                    }
                }
            }
        };

        if let LlmBackend::Unavailable { reason } = &backend {
            tracing::warn!(reason = %reason, "LLM provider unavailable");
            return Self::unavailable(reason);
        }

        let client = match LlmApiClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, model = %config.model, "Failed to initialize LLM client");
                return Self::unavailable(&e.to_string());
            }
        };

        Self {
            backend,
            config: Some(Arc::new(config.clone())),
            client: Some(client),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
            client: None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, LlmBackend::Unavailable { .. })
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    pub async fn complete(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String> {
        self.client()?.complete(prompt, None, options).await
    }

    pub async fn complete_json(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<Value> {
        self.client()?
            .complete_json(prompt, system_prompt, options)
            .await
    }

    pub async fn complete_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        options: Option<&CompletionOptions>,
    ) -> Result<T> {
        let json_value = self.complete_json(prompt, system_prompt, options).await?;

        serde_json::from_value(json_value).map_err(|e| {
            WellioError::Classification(format!("Failed to deserialize response: {e}"))
        })
    }

    fn client(&self) -> Result<&LlmApiClient> {
        match (&self.backend, &self.client) {
            (LlmBackend::Unavailable { reason }, _) => {
                Err(WellioError::LlmUnavailable(reason.clone()))
            }
            (_, Some(client)) => Ok(client),
            (_, None) => Err(WellioError::LlmUnavailable(
                "LLM client not initialized".to_string(),
            )),
        }
    }
}
