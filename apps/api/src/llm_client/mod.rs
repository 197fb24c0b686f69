//! LLM Client: the single point of entry for all Gateway calls in LCAT Analyst.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! Extraction and optimization code talks to the `Gateway` trait only.
//!
//! Model: claude-sonnet-4-5 (hardcoded, not configurable)
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all Gateway calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited by the completion service")]
    RateLimited,

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The session's API credential. Held in memory only; never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for a blank key.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Document content handed to the Gateway alongside the instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPayload {
    /// Raw file bytes, Base64 encoded, tagged with their media type.
    Inline { media_type: String, data_base64: String },
    /// Contents of an uploaded plain-text file.
    TextFile(String),
    /// Pasted plain text.
    Text(String),
}

/// One completion request: a system prompt, an instruction that declares the output
/// shape, and an optional document.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub system: &'static str,
    pub instruction: String,
    pub document: Option<DocumentPayload>,
}

/// The external completion service. Returns the raw completion text; callers clean and
/// validate it. Implement this to swap backends (tests use a scripted gateway).
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn complete(&self, credential: &ApiKey, request: &GatewayRequest)
        -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    Document { source: DocumentSource },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum DocumentSource {
    Base64 { media_type: String, data: String },
    Text { media_type: String, data: String },
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

fn build_content(request: &GatewayRequest) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(2);
    match &request.document {
        Some(DocumentPayload::Inline {
            media_type,
            data_base64,
        }) => parts.push(ContentPart::Document {
            source: DocumentSource::Base64 {
                media_type: media_type.clone(),
                data: data_base64.clone(),
            },
        }),
        // The API accepts text/plain documents only as text sources.
        Some(DocumentPayload::TextFile(text)) => parts.push(ContentPart::Document {
            source: DocumentSource::Text {
                media_type: "text/plain".to_string(),
                data: text.clone(),
            },
        }),
        Some(DocumentPayload::Text(text)) => parts.push(ContentPart::Text {
            text: text.clone(),
        }),
        None => {}
    }
    parts.push(ContentPart::Text {
        text: request.instruction.clone(),
    });
    parts
}

/// Production gateway over the Anthropic Messages API.
///
/// Single attempt per call: failed units are re-triggered by the user, never retried here.
#[derive(Clone)]
pub struct AnthropicGateway {
    client: Client,
}

impl AnthropicGateway {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl Gateway for AnthropicGateway {
    async fn complete(
        &self,
        credential: &ApiKey,
        request: &GatewayRequest,
    ) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: request.system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: build_content(request),
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", credential.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            warn!("Completion service rate limited the request");
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Completion service returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "Gateway call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        llm_response
            .text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from Gateway output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned completions in order and records every request it saw.
    /// `Err(message)` entries simulate a failed round trip.
    pub struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<String, String>>>,
        pub seen: Mutex<Vec<GatewayRequest>>,
    }

    impl ScriptedGateway {
        pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Gateway for ScriptedGateway {
        async fn complete(
            &self,
            _credential: &ApiKey,
            request: &GatewayRequest,
        ) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(LlmError::Api {
                    status: 500,
                    message,
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }

    pub fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_api_key_rejects_blank_and_redacts_debug() {
        assert!(ApiKey::new("   ").is_none());
        let key = ApiKey::new(" sk-secret ").unwrap();
        assert_eq!(key.expose(), "sk-secret");
        assert!(!format!("{key:?}").contains("secret"));
    }

    #[test]
    fn test_pdf_payload_becomes_base64_document_block() {
        let request = GatewayRequest {
            system: "sys",
            instruction: "extract".to_string(),
            document: Some(DocumentPayload::Inline {
                media_type: "application/pdf".to_string(),
                data_base64: "JVBERi0=".to_string(),
            }),
        };
        let json = serde_json::to_value(build_content(&request)).unwrap();
        assert_eq!(json[0]["type"], "document");
        assert_eq!(json[0]["source"]["type"], "base64");
        assert_eq!(json[0]["source"]["media_type"], "application/pdf");
        assert_eq!(json[1]["type"], "text");
        assert_eq!(json[1]["text"], "extract");
    }

    #[test]
    fn test_text_file_payload_is_sent_as_text_source() {
        let request = GatewayRequest {
            system: "sys",
            instruction: "extract".to_string(),
            document: Some(DocumentPayload::TextFile("Positions:\n- Lead".to_string())),
        };
        let json = serde_json::to_value(build_content(&request)).unwrap();
        assert_eq!(json[0]["type"], "document");
        assert_eq!(json[0]["source"]["type"], "text");
        assert_eq!(json[0]["source"]["media_type"], "text/plain");
        assert_eq!(json[0]["source"]["data"], "Positions:\n- Lead");
    }

    #[test]
    fn test_instruction_only_request_has_single_text_part() {
        let request = GatewayRequest {
            system: "sys",
            instruction: "optimize".to_string(),
            document: None,
        };
        let json = serde_json::to_value(build_content(&request)).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
    }
}
