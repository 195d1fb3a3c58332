//! OpenAI-compatible chat backend with SSE streaming support

use crate::{
    error::BackendError,
    r#trait::{Backend, BackendDescriptor, ChunkStream, StreamingBackend},
};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use sealtrace_foundation::HardwareClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;

/// Default chat completions endpoint
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Audit action for single-shot chat calls
pub const ACTION_CHAT_COMPLETION: &str = "openai_chat_completion";

/// Audit action for streamed chat calls
pub const ACTION_CHAT_STREAM: &str = "openai_chat_stream";

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// OpenAI-compatible chat backend.
///
/// Works against the official API or any compatible endpoint via
/// [`with_base_url`](Self::with_base_url). Declares both capabilities:
/// single-shot `invoke` and SSE `stream`.
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    base_url: String,
    descriptor: BackendDescriptor,
}

impl OpenAiBackend {
    /// Create a backend for a model hosted on vendor cloud hardware
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            descriptor: BackendDescriptor::new("openai", model, HardwareClass::Cloud),
        })
    }

    /// Use a custom base URL (Azure-style gateways, LocalAI, etc.)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set a custom request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, BackendError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    fn wire_request(&self, request: &ChatRequest, stream: bool) -> WireChatRequest<'_> {
        WireChatRequest {
            model: &self.descriptor.model_name,
            messages: request.messages.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream,
        }
    }

    /// Parse an error response body, falling back to the status mapping
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> BackendError {
        if let Ok(error_response) = serde_json::from_str::<WireErrorResponse>(body) {
            let message = error_response.error.message;
            return match error_response.error.code.as_deref() {
                Some("rate_limit_exceeded") => BackendError::RateLimited(message),
                Some("invalid_api_key") => BackendError::Authentication(message),
                Some("model_not_found") => BackendError::ModelNotAvailable(message),
                _ => BackendError::from_http_status(status.as_u16(), &message),
            };
        }
        BackendError::from_http_status(status.as_u16(), body)
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    type Request = ChatRequest;
    type Response = ChatResponse;

    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, request: &Self::Request) -> Result<Self::Response, BackendError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.wire_request(request, false))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::parse_error_response(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

impl StreamingBackend for OpenAiBackend {
    type Chunk = String;

    fn stream(&self, request: &Self::Request) -> ChunkStream<'_, Self::Chunk> {
        let wire = self.wire_request(request, true);

        Box::pin(async_stream::stream! {
            let response = match self
                .client
                .post(&self.base_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .header("Accept", "text/event-stream")
                .json(&wire)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(BackendError::Network(e.to_string()));
                    return;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                yield Err(Self::parse_error_response(status, &body));
                return;
            }

            // Convert the response body into an async reader for SSE parsing
            let byte_stream = response.bytes_stream();
            let stream_reader = StreamReader::new(
                byte_stream.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
            );
            let mut reader = BufReader::new(stream_reader);
            let mut line_buffer = String::new();

            loop {
                line_buffer.clear();
                match reader.read_line(&mut line_buffer).await {
                    Ok(0) => break, // EOF
                    Ok(_) => {
                        let line = line_buffer.trim();
                        if line.is_empty() || line.starts_with(':') {
                            continue;
                        }

                        let Some(data) = line.strip_prefix("data: ") else {
                            continue;
                        };
                        if data == "[DONE]" {
                            break;
                        }

                        match serde_json::from_str::<WireStreamChunk>(data) {
                            Ok(chunk) => {
                                for choice in chunk.choices {
                                    if let Some(content) = choice.delta.content {
                                        if !content.is_empty() {
                                            yield Ok(content);
                                        }
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::warn!("failed to parse SSE chunk: {} - data: {}", e, data);
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(BackendError::StreamError(format!("stream read error: {}", e)));
                        break;
                    }
                }
            }
        })
    }
}

// ============================================================================
// Request / Response types
// ============================================================================

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Caller-facing chat request; the backend injects model and stream flags
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Full vendor response, passed through unmodified
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Text of the first choice, when present
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct WireChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct WireStreamChunk {
    choices: Vec<WireStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct WireStreamChoice {
    delta: WireDelta,
}

#[derive(Debug, Deserialize)]
struct WireDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor() {
        let backend = OpenAiBackend::new("sk-test", "gpt-4o").unwrap();
        let descriptor = backend.descriptor();
        assert_eq!(descriptor.system_id, "openai");
        assert_eq!(descriptor.model_name, "gpt-4o");
        assert_eq!(descriptor.hardware, HardwareClass::Cloud);
    }

    #[test]
    fn test_wire_request_injects_model() {
        let backend = OpenAiBackend::new("sk-test", "gpt-4o-mini").unwrap();
        let request = ChatRequest::new(vec![ChatMessage::user("hello")]).with_max_tokens(64);

        let wire = serde_json::to_value(backend.wire_request(&request, true)).unwrap();
        assert_eq!(wire["model"], "gpt-4o-mini");
        assert_eq!(wire["stream"], true);
        assert_eq!(wire["max_tokens"], 64);
        assert_eq!(wire["messages"][0]["role"], "user");
        // Unset options are omitted from the vendor wire format
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn test_parse_error_response_known_codes() {
        let body = r#"{"error":{"message":"bad key","code":"invalid_api_key"}}"#;
        let err = OpenAiBackend::parse_error_response(reqwest::StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, BackendError::Authentication(_)));

        let err = OpenAiBackend::parse_error_response(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "not json",
        );
        assert!(matches!(err, BackendError::ServerError(_)));
    }

    #[test]
    fn test_response_text_helper() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("hi"));
    }
}
