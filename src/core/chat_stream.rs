use std::fmt::Display;
use std::pin::Pin;
use std::str::Utf8Error;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use memchr::memchr;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::core::credentials::ApiKey;
use crate::core::message::Message;
use crate::utils::url::construct_api_url;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 1024;

const ERROR_SUMMARY_LIMIT: usize = 200;

/// Finite, single-use sequence of text deltas for one assistant turn.
pub type FragmentStream = BoxStream<'static, String>;

/// Failures while setting up a streamed completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}: {summary}")]
    Status {
        status: reqwest::StatusCode,
        summary: String,
    },
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Start a streamed completion for `history` under `system_prompt`.
    ///
    /// `None` means the call could not be set up. The failure has already
    /// been logged and is never retried.
    async fn stream_completion(
        &self,
        system_prompt: &str,
        model: &str,
        history: &[Message],
    ) -> Option<FragmentStream>;
}

/// System prompt first, then the whole history including the newest user turn.
pub fn build_request(system_prompt: &str, model: &str, history: &[Message]) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::new("system", system_prompt));
    messages.extend(history.iter().map(Message::to_api));

    ChatRequest {
        model: model.to_string(),
        messages,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        stream: true,
    }
}

/// Client for an OpenAI-compatible `chat/completions` endpoint. Holds no
/// per-call state, so one instance can be shared by every session.
#[derive(Clone, Debug)]
pub struct ChatStreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
}

impl ChatStreamClient {
    pub fn new(base_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: ApiKey,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn open(&self, request: &ChatRequest) -> Result<FragmentStream, CompletionError> {
        let chat_url = construct_api_url(&self.base_url, "chat/completions");
        let response = self
            .http
            .post(chat_url)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Status {
                status,
                summary: summarize_api_error(&body),
            });
        }

        Ok(sse_fragments(response.bytes_stream()))
    }
}

#[async_trait]
impl CompletionClient for ChatStreamClient {
    async fn stream_completion(
        &self,
        system_prompt: &str,
        model: &str,
        history: &[Message],
    ) -> Option<FragmentStream> {
        let request = build_request(system_prompt, model, history);
        debug!(
            model,
            messages = request.messages.len(),
            "requesting streamed completion"
        );

        match self.open(&request).await {
            Ok(fragments) => Some(fragments),
            Err(err) => {
                error!(error = %err, model, "API Error");
                None
            }
        }
    }
}

/// What one server-sent-events line means for the response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    Fragment(String),
    Done,
    Ignored,
    Failed(String),
}

pub fn parse_sse_line(line: &str) -> SseLine {
    let Some(payload) = line.strip_prefix("data:").map(str::trim) else {
        return SseLine::Ignored;
    };

    if payload.is_empty() {
        return SseLine::Ignored;
    }
    if payload == "[DONE]" {
        return SseLine::Done;
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => {
            return SseLine::Failed(format!(
                "malformed stream payload: {}",
                truncate_chars(payload, ERROR_SUMMARY_LIMIT)
            ))
        }
    };

    if value.get("error").filter(|error| !error.is_null()).is_some() {
        return SseLine::Failed(summarize_api_error(payload));
    }

    match serde_json::from_value::<ChatResponse>(value) {
        Ok(chunk) => match chunk.delta_text() {
            Some(text) if !text.is_empty() => SseLine::Fragment(text.to_string()),
            _ => SseLine::Ignored,
        },
        Err(err) => SseLine::Failed(format!("unexpected stream payload: {err}")),
    }
}

/// Byte buffer that yields complete lines. Bytes are kept until a newline
/// arrives, so multi-byte characters split across network chunks survive.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    fn extend(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    fn next_line(&mut self) -> Option<Result<String, Utf8Error>> {
        let newline_pos = memchr(b'\n', &self.bytes)?;
        let line: Vec<u8> = self.bytes.drain(..=newline_pos).collect();
        Some(std::str::from_utf8(&line[..newline_pos]).map(|s| s.trim().to_string()))
    }

    fn take_remainder(&mut self) -> Option<Result<String, Utf8Error>> {
        if self.bytes.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.bytes);
        Some(std::str::from_utf8(&rest).map(|s| s.trim().to_string()))
    }
}

enum Step {
    Yield(String),
    Continue,
    Stop,
}

fn interpret(line: Result<String, Utf8Error>) -> Step {
    let line = match line {
        Ok(line) => line,
        Err(err) => {
            warn!(error = %err, "skipping stream line with invalid UTF-8");
            return Step::Continue;
        }
    };

    match parse_sse_line(&line) {
        SseLine::Fragment(text) => Step::Yield(text),
        SseLine::Ignored => Step::Continue,
        SseLine::Done => Step::Stop,
        SseLine::Failed(reason) => {
            warn!(%reason, "stream reported an error; keeping partial response");
            Step::Stop
        }
    }
}

/// Turn a server-sent-events body into text deltas.
///
/// The sequence ends at `data: [DONE]`, at the end of the body, or at the
/// first error, whichever comes first.
pub fn sse_fragments<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    struct State<S> {
        body: Pin<Box<S>>,
        lines: LineBuffer,
        exhausted: bool,
    }

    let state = State {
        body: Box::pin(body),
        lines: LineBuffer::default(),
        exhausted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            while let Some(line) = state.lines.next_line() {
                match interpret(line) {
                    Step::Yield(text) => return Some((text, state)),
                    Step::Continue => {}
                    Step::Stop => return None,
                }
            }

            if state.exhausted {
                return match state.lines.take_remainder().map(interpret) {
                    Some(Step::Yield(text)) => Some((text, state)),
                    _ => None,
                };
            }

            match state.body.next().await {
                Some(Ok(chunk)) => state.lines.extend(chunk.as_ref()),
                Some(Err(err)) => {
                    warn!(error = %err, "response stream interrupted; keeping partial response");
                    return None;
                }
                None => state.exhausted = true,
            }
        }
    })
    .boxed()
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
}

/// One-line summary of an error body for the log.
pub fn summarize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let text = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .unwrap_or_else(|| trimmed.to_string());
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, ERROR_SUMMARY_LIMIT)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((index, _)) => format!("{}…", &text[..index]),
        None => text.to_string(),
    }
}
