//! Gemini API client implementation
//!
//! Implements the LlmClient trait for the Generative Language API
//! (`generateContent` and `streamGenerateContent?alt=sse`) with function
//! calling and the built-in `google_search` tool.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::{
    CompletionRequest, CompletionResponse, ContentBlock, LlmClient, LlmError, Message, MessageContent, RetryPolicy,
    Role, StopReason, StreamChunk, TokenUsage, ToolCall,
};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "GeminiClient::from_config: called");
        let api_key = config.get_api_key().map_err(|_| LlmError::MissingApiKey {
            var: config.api_key_env.clone(),
        })?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    fn endpoint(&self, request: &CompletionRequest, method: &str) -> String {
        let model = request.model.as_deref().unwrap_or(&self.model);
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, tools = request.tools.len(), "build_request_body: called");

        let mut body = serde_json::json!({
            "contents": self.convert_messages(&request.messages),
            "generationConfig": {
                "maxOutputTokens": request.max_tokens.min(self.max_tokens),
            },
        });

        if !request.system_prompt.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": request.system_prompt }],
            });
        }

        let mut tools = Vec::new();
        if !request.tools.is_empty() {
            tools.push(serde_json::json!({
                "functionDeclarations": request.tools.iter().map(|t| t.to_gemini_declaration()).collect::<Vec<_>>(),
            }));
        }
        if request.web_search {
            tools.push(serde_json::json!({ "google_search": {} }));
        }
        if !tools.is_empty() {
            body["tools"] = serde_json::json!(tools);
        }

        body
    }

    /// Convert internal Message types to Gemini `contents`
    ///
    /// Messages that end up with no parts are dropped; the API rejects them.
    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        debug!(message_count = %messages.len(), "convert_messages: called");
        messages
            .iter()
            .filter_map(|msg| {
                let role = match msg.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                let parts = match &msg.content {
                    MessageContent::Text(text) if text.is_empty() => Vec::new(),
                    MessageContent::Text(text) => vec![serde_json::json!({ "text": text })],
                    MessageContent::Blocks(blocks) => blocks.iter().map(block_to_part).collect(),
                };
                if parts.is_empty() {
                    None
                } else {
                    Some(serde_json::json!({ "role": role, "parts": parts }))
                }
            })
            .collect()
    }

    /// Parse the Gemini API response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        let usage = api_response.usage();
        let candidate = api_response.candidates.into_iter().next().ok_or_else(|| {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            LlmError::InvalidResponse(format!("No candidates in response ({})", reason))
        })?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            collect_part(part, &mut text, &mut tool_calls);
        }

        let stop_reason = StopReason::from_gemini(candidate.finish_reason.as_deref(), !tool_calls.is_empty());
        debug!(?stop_reason, tool_calls = tool_calls.len(), "parse_response: parsed");

        Ok(CompletionResponse {
            content: if text.is_empty() { None } else { Some(text) },
            tool_calls,
            stop_reason,
            usage,
        })
    }

    /// POST `body` once, mapping error statuses to `LlmError::ApiError`
    async fn post(&self, url: &str, body: &serde_json::Value) -> Result<reqwest::Response, LlmError> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "post: API error");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

fn block_to_part(block: &ContentBlock) -> serde_json::Value {
    match block {
        ContentBlock::Text { text } => serde_json::json!({ "text": text }),
        ContentBlock::ToolUse { name, input, .. } => serde_json::json!({
            "functionCall": { "name": name, "args": input },
        }),
        ContentBlock::ToolResult {
            name,
            content,
            is_error,
            ..
        } => serde_json::json!({
            "functionResponse": {
                "name": name,
                "response": function_response_payload(content, *is_error),
            },
        }),
    }
}

/// `functionResponse.response` must be an object
fn function_response_payload(content: &str, is_error: bool) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        _ if is_error => serde_json::json!({ "error": content }),
        _ => serde_json::json!({ "result": content }),
    }
}

fn collect_part(part: GeminiPart, text: &mut String, tool_calls: &mut Vec<ToolCall>) {
    if let Some(call) = part.function_call {
        let id = call.id.unwrap_or_else(|| format!("call_{}", uuid::Uuid::now_v7()));
        tool_calls.push(ToolCall {
            id,
            name: call.name,
            input: call.args,
        });
    }
    if let Some(t) = part.text
        && !part.thought
    {
        text.push_str(&t);
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, model_override = ?request.model, "complete: called");
        let url = self.endpoint(&request, "generateContent");
        let body = self.build_request_body(&request);
        let (url, body) = (&url, &body);

        self.retry
            .run("generateContent", || async move {
                let response = self.post(url, body).await?;
                let api_response: GeminiResponse = response.json().await.map_err(|e| self.map_transport_error(e))?;
                self.parse_response(api_response)
            })
            .await
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, model_override = ?request.model, "stream: called");
        let url = format!("{}?alt=sse", self.endpoint(&request, "streamGenerateContent"));
        let body = self.build_request_body(&request);
        let (url, body) = (&url, &body);

        // Only establishing the stream is retried; a stream that fails midway is an error
        let response = self
            .retry
            .run("streamGenerateContent", || async move { self.post(url, body).await })
            .await?;

        let mut stream = response.bytes_stream();
        let mut sse = SseAccumulator::default();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| self.map_transport_error(e))?;
            for out in sse.push(&chunk) {
                let _ = chunk_tx.send(out).await;
            }
        }

        let (response, tail) = sse.finish();
        for out in tail {
            let _ = chunk_tx.send(out).await;
        }
        Ok(response)
    }
}

/// Running state of a `streamGenerateContent` SSE body
///
/// Raw bytes are buffered until a full line is available, so a multi-byte
/// character split across network chunks is decoded whole.
#[derive(Debug, Default)]
struct SseAccumulator {
    buffer: Vec<u8>,
    text: String,
    tool_calls: Vec<ToolCall>,
    finish_reason: Option<String>,
    usage: TokenUsage,
}

impl SseAccumulator {
    /// Feed one network chunk, returning what to forward for each complete line
    fn push(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        self.buffer.extend_from_slice(bytes);
        let mut out = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=line_end).collect();
            self.process_line(&line, &mut out);
        }
        out
    }

    /// Flush an unterminated last line and build the final response
    fn finish(mut self) -> (CompletionResponse, Vec<StreamChunk>) {
        let mut out = Vec::new();
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.process_line(&line, &mut out);
        }

        let stop_reason = StopReason::from_gemini(self.finish_reason.as_deref(), !self.tool_calls.is_empty());
        out.push(StreamChunk::MessageDone {
            stop_reason,
            usage: self.usage,
        });

        let response = CompletionResponse {
            content: if self.text.is_empty() { None } else { Some(self.text) },
            tool_calls: self.tool_calls,
            stop_reason,
            usage: self.usage,
        };
        (response, out)
    }

    fn process_line(&mut self, line: &[u8], out: &mut Vec<StreamChunk>) {
        let line = String::from_utf8_lossy(line);
        let Some(data) = line.trim().strip_prefix("data:") else {
            return;
        };

        let event: GeminiResponse = match serde_json::from_str(data.trim()) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "SseAccumulator::process_line: skipping unparseable event");
                return;
            }
        };

        if event.usage_metadata.is_some() {
            self.usage = event.usage();
        }

        for candidate in event.candidates {
            if candidate.finish_reason.is_some() {
                self.finish_reason = candidate.finish_reason;
            }
            for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
                let text_before = self.text.len();
                let calls_before = self.tool_calls.len();
                collect_part(part, &mut self.text, &mut self.tool_calls);

                if self.text.len() > text_before {
                    out.push(StreamChunk::TextDelta(self.text[text_before..].to_string()));
                }
                for call in &self.tool_calls[calls_before..] {
                    out.push(StreamChunk::ToolUseStart {
                        id: call.id.clone(),
                        name: call.name.clone(),
                    });
                }
            }
        }
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

impl GeminiResponse {
    fn usage(&self) -> TokenUsage {
        self.usage_metadata
            .as_ref()
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
    /// Thinking-model summaries are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}
