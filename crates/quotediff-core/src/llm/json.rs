use crate::error::QuoteDiffError;
use crate::llm::{LlmClient, LlmSettings, Message};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\n?(.*?)```").expect("fence pattern is valid")
});

const RESEND_PROMPT: &str = "Your previous reply could not be parsed as JSON. \
Resend the same content as a single valid JSON document, with no prose and no code fences.";

/// Model output that was asked to be JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LlmJson {
    Parsed(Value),
    /// The text could not be parsed even after one resend; shown as is.
    Raw(String),
}

impl LlmJson {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            LlmJson::Parsed(v) => Some(v),
            LlmJson::Raw(_) => None,
        }
    }

    /// Text form: pretty-printed JSON or the raw reply.
    pub fn to_text(&self) -> String {
        match self {
            LlmJson::Parsed(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
            LlmJson::Raw(s) => s.clone(),
        }
    }
}

/// Find a JSON object or array in a model reply.
///
/// Tries, in order: the whole reply, the first fenced code block, and the
/// span from the first `{`/`[` to the last matching closer.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        if v.is_object() || v.is_array() {
            return Some(v);
        }
    }

    if let Some(v) = FENCED
        .captures_iter(trimmed)
        .filter_map(|c| serde_json::from_str::<Value>(c[1].trim()).ok())
        .find(|v| v.is_object() || v.is_array())
    {
        return Some(v);
    }

    let start = trimmed.find(['{', '['])?;
    let closer = if trimmed[start..].starts_with('{') { '}' } else { ']' };
    let end = trimmed.rfind(closer)?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
}

/// Run a conversation whose last turn asks for JSON.
///
/// If the reply does not contain JSON the model is asked once to resend it.
/// If that also fails the first reply is returned as [`LlmJson::Raw`].
pub fn request_json(
    client: &dyn LlmClient,
    settings: &LlmSettings,
    mut messages: Vec<Message>,
) -> Result<LlmJson, QuoteDiffError> {
    let reply = client.complete(&settings.request(messages.clone()))?;
    if let Some(v) = extract_json(&reply) {
        return Ok(LlmJson::Parsed(v));
    }

    tracing::warn!(chars = reply.len(), "reply is not valid JSON, asking to resend");
    messages.push(Message::assistant(reply.clone()));
    messages.push(Message::user(RESEND_PROMPT));
    let retry = client.complete(&settings.request(messages))?;
    match extract_json(&retry) {
        Some(v) => Ok(LlmJson::Parsed(v)),
        None => {
            tracing::warn!("resent reply is still not JSON, keeping raw text");
            Ok(LlmJson::Raw(reply))
        }
    }
}
