//! Wire types for the OpenRouter chat-completions API.
//!
//! - **Request**: `{model, messages, stream: true, temperature?, max_tokens?, top_p?, plugins?}`
//! - **Stream**: newline-separated `data: {json}` records ending with `data: [DONE]`
//! - **Error body**: `{"error": {"message": ..., "code": ...}}` on non-2xx responses

use qchain_application::ChatRequest;
use qchain_domain::Message;
use serde::{Deserialize, Serialize};

/// Server-sent-event field prefix carrying a record.
pub const DATA_PREFIX: &str = "data:";

/// Payload that terminates a stream.
pub const DONE_TOKEN: &str = "[DONE]";

/// Plugin id for the router's web-search augmentation.
pub const WEB_SEARCH_PLUGIN: &str = "web";

/// A router plugin entry, e.g. `{"id": "web"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plugin {
    pub id: &'static str,
}

/// Streaming chat-completion request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Plugin>>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Body for a streaming request; always declares `stream: true`.
    pub fn streaming(request: &'a ChatRequest) -> Self {
        let params = &request.params;
        Self {
            model: params.model.as_str(),
            messages: &request.messages,
            stream: true,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            plugins: params.web_search.then(|| {
                vec![Plugin {
                    id: WEB_SEARCH_PLUGIN,
                }]
            }),
        }
    }
}

/// Structured error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `message`, followed by ` (code N)` when a code is present.
    pub fn describe(&self) -> String {
        match &self.code {
            Some(serde_json::Value::Null) | None => self.message.clone(),
            Some(serde_json::Value::String(code)) => format!("{} (code {})", self.message, code),
            Some(code) => format!("{} (code {})", self.message, code),
        }
    }
}

/// Human-readable detail from an error response body.
///
/// The router's error envelope is preferred; any other JSON document is
/// reported in compact form. A body that is not JSON yields `None`.
pub fn parse_error_detail(body: &[u8]) -> Option<String> {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return Some(envelope.error.describe());
    }
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .map(|value| value.to_string())
}
