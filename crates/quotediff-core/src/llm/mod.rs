pub mod json;
pub mod prompts;

use crate::error::QuoteDiffError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use json::{extract_json, request_json, LlmJson};
pub use prompts::LlmComparison;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One call to the model: model id, output cap and the conversation so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

/// Model id and output cap shared by every request of a workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl LlmSettings {
    pub fn request(&self, messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages,
        }
    }
}

/// A text-completion backend.
pub trait LlmClient: Send + Sync {
    /// Send the conversation and return the generated text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, QuoteDiffError>;

    /// Name of this backend (for diagnostics).
    fn name(&self) -> &str;
}

/// Blocking client for the Anthropic Messages API.
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    http: reqwest::blocking::Client,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, QuoteDiffError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Use a custom base URL (for proxies or alternative endpoints)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl LlmClient for AnthropicClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, QuoteDiffError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuoteDiffError::LlmStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json()?;
        let text = parsed
            .content
            .into_iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(QuoteDiffError::MalformedLlmOutput(
                "response contained no text".into(),
            ));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Retries transient failures of the wrapped client with a doubling delay.
pub struct RetryingClient<C> {
    inner: C,
    attempts: u32,
    base_delay: Duration,
}

impl<C: LlmClient> RetryingClient<C> {
    pub fn new(inner: C, attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            base_delay,
        }
    }
}

impl<C: LlmClient> LlmClient for RetryingClient<C> {
    fn complete(&self, request: &CompletionRequest) -> Result<String, QuoteDiffError> {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match self.inner.complete(request) {
                Ok(text) => return Ok(text),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) if attempt >= self.attempts => {
                    return Err(QuoteDiffError::LlmRetriesExhausted {
                        attempts: attempt,
                        last: e.to_string(),
                    })
                }
                Err(e) => {
                    tracing::warn!(
                        backend = self.inner.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "LLM request failed, retrying"
                    );
                    std::thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
