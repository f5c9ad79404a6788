use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Upper bound for every day-based window. Keeps `chrono::Duration::days`
/// well inside its range.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Day-count variable, clamped to `1..=MAX_WINDOW_DAYS`.
fn parse_days_env(var: &str, default: i64) -> i64 {
    let days = parse_env_or(var, default);
    let clamped = days.clamp(1, MAX_WINDOW_DAYS);
    if clamped != days {
        tracing::warn!("{} = {} is out of range, using {}", var, days, clamped);
    }
    clamped
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: Option<LlmConfig>,
    pub scoring: ScoringConfig,
    pub smart_log: SmartLogConfig,
    pub engagement: EngagementConfig,
    pub progress: ProgressConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// LLM configuration for the smart-log classification oracle
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// Windows and targets for the weekly/activity sub-scores.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub weekly_window_days: i64,
    /// Distinct active days per weekly window that count as 100%.
    pub weekly_target_days: u32,
    pub activity_window_days: i64,
    /// Events per activity window that count as 100%.
    pub activity_target_events: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weekly_window_days: 7,
            weekly_target_days: 5,
            activity_window_days: 30,
            activity_target_events: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmartLogConfig {
    /// Upper bound on a single oracle invocation.
    pub classify_timeout_secs: u64,
    /// Events below this confidence are flagged for coach review.
    pub review_threshold: f64,
}

impl Default for SmartLogConfig {
    fn default() -> Self {
        Self {
            classify_timeout_secs: 60,
            review_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub inactivity_days: i64,
    /// How many of a client's latest events the evaluator sees.
    pub history_limit: u32,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
            inactivity_days: 3,
            history_limit: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        let smart_log = SmartLogConfig::default();
        let engagement = EngagementConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("WELLIO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("WELLIO_PORT", 3000),
                api_keys: env::var("WELLIO_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:wellio.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
            }),
            scoring: ScoringConfig {
                weekly_window_days: parse_days_env(
                    "SCORING_WEEKLY_WINDOW_DAYS",
                    scoring.weekly_window_days,
                ),
                weekly_target_days: parse_env_or(
                    "SCORING_WEEKLY_TARGET_DAYS",
                    scoring.weekly_target_days,
                ),
                activity_window_days: parse_days_env(
                    "SCORING_ACTIVITY_WINDOW_DAYS",
                    scoring.activity_window_days,
                ),
                activity_target_events: parse_env_or(
                    "SCORING_ACTIVITY_TARGET_EVENTS",
                    scoring.activity_target_events,
                ),
            },
            smart_log: SmartLogConfig {
                classify_timeout_secs: parse_env_or(
                    "SMART_LOG_CLASSIFY_TIMEOUT_SECS",
                    smart_log.classify_timeout_secs,
                ),
                review_threshold: parse_env_or(
                    "SMART_LOG_REVIEW_THRESHOLD",
                    smart_log.review_threshold,
                ),
            },
            engagement: EngagementConfig {
                enabled: parse_env_or("ENGAGEMENT_ENABLED", engagement.enabled),
                interval_secs: parse_env_or("ENGAGEMENT_INTERVAL_SECS", engagement.interval_secs),
                inactivity_days: parse_days_env(
                    "ENGAGEMENT_INACTIVITY_DAYS",
                    engagement.inactivity_days,
                ),
                history_limit: parse_env_or("ENGAGEMENT_HISTORY_LIMIT", engagement.history_limit),
            },
            progress: ProgressConfig {
                refresh_interval_secs: parse_env_or("PROGRESS_REFRESH_INTERVAL_SECS", 86400),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_scoring_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("SCORING_WEEKLY_TARGET_DAYS");
        std::env::remove_var("SCORING_ACTIVITY_TARGET_EVENTS");

        let config = Config::default();
        assert_eq!(config.scoring.weekly_window_days, 7);
        assert_eq!(config.scoring.weekly_target_days, 5);
        assert_eq!(config.scoring.activity_window_days, 30);
        assert_eq!(config.scoring.activity_target_events, 20);
    }

    #[test]
    fn test_smart_log_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("SMART_LOG_CLASSIFY_TIMEOUT_SECS", "15");
        std::env::set_var("SMART_LOG_REVIEW_THRESHOLD", "0.75");

        let config = Config::default();
        assert_eq!(config.smart_log.classify_timeout_secs, 15);
        assert_eq!(config.smart_log.review_threshold, 0.75);

        std::env::remove_var("SMART_LOG_CLASSIFY_TIMEOUT_SECS");
        std::env::remove_var("SMART_LOG_REVIEW_THRESHOLD");
    }

    #[test]
    fn test_llm_config_absent_without_model() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::remove_var("LLM_MODEL");
        let config = Config::default();
        assert!(config.llm.is_none());

        std::env::set_var("LLM_MODEL", "openai/gpt-4o-mini");
        let config = Config::default();
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "openai/gpt-4o-mini");
        assert_eq!(llm.timeout_secs, 30);
        assert_eq!(llm.max_retries, 3);
        std::env::remove_var("LLM_MODEL");
    }

    #[test]
    fn test_api_keys_trimmed_and_filtered() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("WELLIO_API_KEYS", " key-a , ,key-b");
        let config = Config::default();
        assert_eq!(config.server.api_keys, vec!["key-a", "key-b"]);
        std::env::remove_var("WELLIO_API_KEYS");
    }

    #[test]
    fn test_invalid_value_falls_back_to_default() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("ENGAGEMENT_INACTIVITY_DAYS", "three");
        let config = Config::default();
        assert_eq!(config.engagement.inactivity_days, 3);
        std::env::remove_var("ENGAGEMENT_INACTIVITY_DAYS");
    }

    #[test]
    fn test_day_windows_are_bounded() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("SCORING_WEEKLY_WINDOW_DAYS", "9223372036854775807");
        std::env::set_var("SCORING_ACTIVITY_WINDOW_DAYS", "-4");
        std::env::set_var("ENGAGEMENT_INACTIVITY_DAYS", "0");

        let config = Config::default();
        assert_eq!(config.scoring.weekly_window_days, MAX_WINDOW_DAYS);
        assert_eq!(config.scoring.activity_window_days, 1);
        assert_eq!(config.engagement.inactivity_days, 1);

        std::env::remove_var("SCORING_WEEKLY_WINDOW_DAYS");
        std::env::remove_var("SCORING_ACTIVITY_WINDOW_DAYS");
        std::env::remove_var("ENGAGEMENT_INACTIVITY_DAYS");
    }

    #[test]
    fn test_parse_llm_provider_model() {
        assert_eq!(
            parse_llm_provider_model("openai/gpt-4o-mini"),
            ("openai", "gpt-4o-mini")
        );
        assert_eq!(
            parse_llm_provider_model("ollama/llama3.1"),
            ("ollama", "llama3.1")
        );
        assert_eq!(parse_llm_provider_model("mistral-7b"), ("local", "mistral-7b"));
    }
}
