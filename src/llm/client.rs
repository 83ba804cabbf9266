//! Streaming chat completions client
//!
//! Speaks the OpenAI-compatible chat completions protocol: a JSON POST
//! with `stream: true`, answered by server-sent events carrying
//! incremental text deltas until a `[DONE]` sentinel.

use crate::llm::config::InferenceConfig;
use crate::llm::context::ContextEntry;
use crate::{BanterError, Result};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Stream of decoded response chunks for one request
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// Request body for a streaming chat completion
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ContextEntry>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub seed: u64,
    pub stream: bool,
}

/// One decoded event from the response stream
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    /// Build a chunk carrying the given text
    pub fn of_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: ChunkDelta {
                    content: Some(text.into()),
                },
            }],
        }
    }

    /// Text carried by this chunk, if any. Role-only and keepalive
    /// chunks carry none.
    pub fn delta_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
            .filter(|text| !text.is_empty())
    }
}

/// Streaming chat backend. The conversation controller talks to
/// whatever implements this, so tests swap the HTTP client for a
/// scripted one.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream>;
}

/// Client for a live OpenAI-compatible endpoint
pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpChatClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BanterError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream> {
        debug!(
            "POST {} ({} messages)",
            self.endpoint,
            request.messages.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| BanterError::InferenceError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BanterError::InferenceError(format!(
                "Endpoint returned {}: {}",
                status, body
            )));
        }

        let mut body = response.bytes_stream();
        let stream = try_stream! {
            let mut lines = LineBuffer::new();
            let mut done = false;
            while !done {
                let bytes = match body.next().await {
                    Some(bytes) => bytes.map_err(|e| {
                        BanterError::InferenceError(format!("Stream read failed: {}", e))
                    })?,
                    None => break,
                };
                for line in lines.push(&bytes) {
                    match decode_data_line(&line) {
                        SseData::Chunk(chunk) => yield chunk,
                        SseData::Done => {
                            done = true;
                            break;
                        }
                        SseData::Skip => {}
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

enum SseData {
    Chunk(StreamChunk),
    Done,
    Skip,
}

/// Decode one line of the SSE body. Non-data lines, keepalives, and
/// malformed payloads are skipped.
fn decode_data_line(line: &str) -> SseData {
    let data = match line.strip_prefix("data:") {
        Some(data) => data.trim(),
        None => return SseData::Skip,
    };
    if data == "[DONE]" {
        return SseData::Done;
    }
    if data.is_empty() {
        return SseData::Skip;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => SseData::Chunk(chunk),
        Err(e) => {
            debug!("Skipping malformed stream line: {}", e);
            SseData::Skip
        }
    }
}

/// Accumulates raw bytes and hands back complete lines. SSE events can
/// arrive split across network reads.
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            while matches!(line.last(), Some(b'\n') | Some(b'\r')) {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }
}

/// Deterministic backend that replays a fixed fragment script. Stands
/// in for a live endpoint in tests and offline demos.
#[derive(Clone)]
pub struct ScriptedClient {
    fragments: Vec<String>,
    fail_after: Option<usize>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedClient {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            fail_after: None,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail with an inference error after yielding `n` fragments
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Pause between fragments so callers can observe an in-flight
    /// stream
    pub fn paced(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream> {
        self.requests.lock().push(request);

        let mut items: Vec<Result<StreamChunk>> = self
            .fragments
            .iter()
            .map(|fragment| Ok(StreamChunk::of_text(fragment.clone())))
            .collect();
        if let Some(n) = self.fail_after {
            items.truncate(n);
            items.push(Err(BanterError::InferenceError(
                "scripted failure".to_string(),
            )));
        }

        let stream = futures::stream::iter(items);
        match self.delay {
            Some(delay) => Ok(Box::pin(stream.then(move |item| async move {
                tokio::time::sleep(delay).await;
                item
            }))),
            None => Ok(Box::pin(stream)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::context::ChatRole;

    #[test]
    fn test_chunk_parsing() {
        let json = r#"{"id":"cmpl-1","choices":[{"index":0,"delta":{"content":"Hello"}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.delta_text(), Some("Hello"));
    }

    #[test]
    fn test_chunk_without_content() {
        let role_only = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(role_only).unwrap();
        assert_eq!(chunk.delta_text(), None);

        let no_choices = r#"{"choices":[]}"#;
        let chunk: StreamChunk = serde_json::from_str(no_choices).unwrap();
        assert_eq!(chunk.delta_text(), None);

        let empty_content = r#"{"choices":[{"delta":{"content":""}}]}"#;
        let chunk: StreamChunk = serde_json::from_str(empty_content).unwrap();
        assert_eq!(chunk.delta_text(), None);
    }

    #[test]
    fn test_decode_data_line() {
        assert!(matches!(
            decode_data_line(r#"data: {"choices":[{"delta":{"content":"hi"}}]}"#),
            SseData::Chunk(_)
        ));
        assert!(matches!(decode_data_line("data: [DONE]"), SseData::Done));
        assert!(matches!(decode_data_line("data:"), SseData::Skip));
        assert!(matches!(decode_data_line(""), SseData::Skip));
        assert!(matches!(decode_data_line(": keepalive"), SseData::Skip));
        assert!(matches!(decode_data_line("data: not json"), SseData::Skip));
    }

    #[test]
    fn test_line_buffer_joins_split_reads() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"data: {\"choi").is_empty());

        let lines = buffer.push(b"ces\":[]}\r\ndata: [DONE]\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "data: {\"choices\":[]}");
        assert_eq!(lines[1], "data: [DONE]");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: None,
            messages: vec![
                ContextEntry::system("Be brief."),
                ContextEntry::user("Hi"),
            ],
            max_tokens: 500,
            temperature: 0.1,
            seed: 0,
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("model").is_none());
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hi");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["stream"], true);
    }

    #[tokio::test]
    async fn test_scripted_client_replays_fragments() {
        let client = ScriptedClient::new(["Hel", "lo"]);
        let request = ChatRequest {
            model: None,
            messages: vec![ContextEntry::user("hi")],
            max_tokens: 500,
            temperature: 0.1,
            seed: 0,
            stream: true,
        };

        let mut stream = client.stream_chat(request).await.unwrap();
        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            if let Some(text) = chunk.unwrap().delta_text() {
                collected.push_str(text);
            }
        }

        assert_eq!(collected, "Hello");
        let seen = client.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn test_scripted_client_failure() {
        let client = ScriptedClient::new(["a", "b", "c"]).failing_after(1);
        let request = ChatRequest {
            model: None,
            messages: vec![],
            max_tokens: 500,
            temperature: 0.1,
            seed: 0,
            stream: true,
        };

        let mut stream = client.stream_chat(request).await.unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}
