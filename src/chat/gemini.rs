//! Streaming Gemini text client used by the chat command.

use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ZyraError};

use super::message::{ChatMessage, ChatRole};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Thin wrapper over the Gemini `streamGenerateContent` endpoint: send
/// the transcript, receive a stream of text chunks.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request_body(messages: &[ChatMessage]) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{"text": msg.content}],
                })
            })
            .collect();
        serde_json::json!({ "contents": contents })
    }

    /// Stream the model's reply to the given transcript as text chunks.
    pub async fn stream_reply(
        &self,
        messages: &[ChatMessage],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let body = Self::build_request_body(messages);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        );

        debug!(model = %self.model, "streaming chat request");

        let resp = self.client.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(ZyraError::Chat(format!(
                "model request failed with status {status}: {body_text}"
            )));
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(ZyraError::Network(e));
                        break;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if let Some(data) = parse_sse_data(&line) {
                        if let Ok(resp) = serde_json::from_str::<GeminiResponse>(data) {
                            for candidate in resp.candidates {
                                for part in candidate.content.parts {
                                    if let Some(text) = part.text {
                                        yield Ok(text);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    /// Collect a full reply, forwarding each chunk to `on_chunk` as it
    /// arrives.
    pub async fn reply(
        &self,
        messages: &[ChatMessage],
        mut on_chunk: impl FnMut(&str),
    ) -> Result<String> {
        let mut stream = self.stream_reply(messages).await?;
        let mut full = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            on_chunk(&chunk);
            full.push_str(&chunk);
        }
        Ok(full)
    }
}

/// Parse an SSE "data:" line, returning None for "[DONE]".
fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }
    Some(data)
}

// Internal Gemini response types

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
