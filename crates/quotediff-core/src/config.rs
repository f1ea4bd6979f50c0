use crate::error::QuoteDiffError;
use crate::extraction::DEFAULT_MAX_DOCUMENT_BYTES;
use crate::llm::LlmSettings;
use crate::matching::MatcherConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "QUOTEDIFF_CONFIG";
/// Environment variable holding the Anthropic API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub max_document_bytes: usize,
    pub matcher: MatcherConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Alternative Messages API endpoint (proxies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Vocabulary file used instead of the built-in preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-opus-20240229".into(),
            max_tokens: 4096,
            timeout_seconds: 120,
            retry_attempts: 3,
            retry_base_delay_ms: 1000,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            matcher: MatcherConfig::default(),
            api_key: None,
            base_url: None,
            vocabulary: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, else from `$QUOTEDIFF_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, QuoteDiffError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => {
                let content = std::fs::read_to_string(&p).map_err(|e| {
                    QuoteDiffError::Config(format!("cannot read {}: {e}", p.display()))
                })?;
                let config = Self::from_json(&content)?;
                tracing::debug!(path = %p.display(), "loaded config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, QuoteDiffError> {
        let config: AppConfig = serde_json::from_str(json)
            .map_err(|e| QuoteDiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), QuoteDiffError> {
        if self.model.trim().is_empty() {
            return Err(QuoteDiffError::Config("model must not be empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(QuoteDiffError::Config("max_tokens must be positive".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(QuoteDiffError::Config(
                "timeout_seconds must be positive".into(),
            ));
        }
        if self.retry_attempts == 0 {
            return Err(QuoteDiffError::Config(
                "retry_attempts must be at least 1".into(),
            ));
        }
        if self.max_document_bytes == 0 {
            return Err(QuoteDiffError::Config(
                "max_document_bytes must be positive".into(),
            ));
        }
        self.matcher.validate()
    }

    /// API key from the environment first, then the config file.
    pub fn api_key(&self) -> Result<String, QuoteDiffError> {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with(&self, env_value: Option<String>) -> Result<String, QuoteDiffError> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or(QuoteDiffError::MissingApiKey)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        }
    }
}
