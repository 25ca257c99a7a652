use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

/// One turn of the chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Payload of one streamed chat object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChunkMessage {
    pub content: String,
}

/// One NDJSON object from the streaming chat endpoint. The terminal object
/// has `done: true` and carries no displayable text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChunkMessage>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{0}. Please ensure the generation server is running and accessible")]
    Unreachable(String),
    #[error("server returned http status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    Protocol(String),
    #[error("stream interrupted: {0}")]
    Stream(String),
}

/// Ordered sequence of chat chunks as they arrive from the server.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, BackendError>> + Send>>;

/// Streaming text-generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn chat_stream(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChunkStream, BackendError>;
}

/// Client for an Ollama-compatible generation server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    endpoint_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.endpoint_url)
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, BackendError> {
        let response = self
            .client
            .post(self.api_url(path))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response).await
    }

    /// Non-streaming completion via the generate endpoint.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        let response = self
            .post_json(
                "generate",
                &GenerateRequest {
                    model,
                    prompt,
                    stream: false,
                },
            )
            .await?;
        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Protocol(err.to_string()))?;
        Ok(parsed.response)
    }

    /// Lists the model names known to the server; used when verifying
    /// settings against a live server.
    pub async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let response = self
            .client
            .get(self.api_url("tags"))
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = check_status(response).await?;
        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Protocol(err.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn chat_stream(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<ChunkStream, BackendError> {
        let response = self
            .post_json(
                "chat",
                &ChatRequest {
                    model,
                    messages: &messages,
                    stream: true,
                },
            )
            .await?;

        let stream = async_stream::stream! {
            let mut byte_stream = response.bytes_stream();
            // Network frames need not align with NDJSON lines, or even with
            // character boundaries; only complete lines are decoded.
            let mut buffer = LineBuffer::new();
            while let Some(result) = byte_stream.next().await {
                match result {
                    Ok(bytes) => {
                        for line in buffer.push(&bytes) {
                            yield parse_chunk_line(&line);
                        }
                    }
                    Err(err) => {
                        yield Err(BackendError::Stream(err.to_string()));
                        return;
                    }
                }
            }
            if let Some(line) = buffer.finish() {
                yield parse_chunk_line(&line);
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Reassembles NDJSON lines from arbitrarily framed network bytes. A frame
/// can end in the middle of a multi-byte character, so bytes stay undecoded
/// until a newline completes the line.
struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Appends one frame and returns the complete non-empty lines it closed.
    fn push(&mut self, frame: &[u8]) -> Vec<String> {
        self.bytes.extend_from_slice(frame);
        let mut lines = Vec::new();
        while let Some(newline) = self.bytes.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.bytes.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw[..newline]);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        lines
    }

    /// Returns the unterminated final line, if any.
    fn finish(self) -> Option<String> {
        let trailing = String::from_utf8_lossy(&self.bytes);
        let trailing = trailing.trim();
        if trailing.is_empty() {
            None
        } else {
            Some(trailing.to_string())
        }
    }
}

fn parse_chunk_line(line: &str) -> Result<ChatChunk, BackendError> {
    serde_json::from_str(line)
        .map_err(|err| BackendError::Protocol(format!("bad stream line: {err}")))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(BackendError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

fn map_transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Unreachable(err.to_string())
}
