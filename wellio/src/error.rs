use thiserror::Error;

#[derive(Error, Debug)]
pub enum WellioError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl WellioError {
    /// Whether the error came from an external collaborator (the oracle or LLM)
    /// rather than from our own data.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::Llm(_)
                | Self::LlmUnavailable(_)
                | Self::LlmRateLimit { .. }
                | Self::Classification(_)
                | Self::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WellioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_failures_are_external() {
        assert!(WellioError::Timeout("classify".into()).is_external());
        assert!(WellioError::LlmUnavailable("none".into()).is_external());
        assert!(WellioError::Classification("bad json".into()).is_external());
        assert!(!WellioError::NotFound("client".into()).is_external());
        assert!(!WellioError::Validation("empty".into()).is_external());
    }

    #[test]
    fn rate_limit_message_includes_retry_hint() {
        let err = WellioError::LlmRateLimit {
            retry_after: Some(12),
        };
        assert!(err.to_string().contains("12"));
    }
}
