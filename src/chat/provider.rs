/// Upstream text-generation provider
///
/// The relay talks to the provider through [`CompletionProvider`] so the HTTP
/// layer can be driven by a scripted provider in tests. [`XaiProvider`] is the
/// production implementation against an OpenAI-compatible
/// `/chat/completions` endpoint with `stream: true`.
///
/// Timeout and retry policy:
/// - connect timeout and whole-request timeout come from [`RelayConfig`]
/// - connect errors, timeouts, 429 and 5xx are retried with doubling backoff
/// - retries only happen before the first byte; a mid-stream failure ends the stream

use crate::chat::message::ChatTurn;
use crate::chat::sse::{SseDecoder, SseEvent};
use crate::config::RelayConfig;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::collections::VecDeque;
use std::pin::Pin;
use thiserror::Error;

/// Ordered text chunks of one completion
pub type ChunkStream = BoxStream<'static, Result<String, ProviderError>>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider API key is not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider stream failed: {0}")]
    Stream(String),
}

impl ProviderError {
    /// Whether a fresh attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Transport(e) => e.is_connect() || e.is_timeout(),
            ProviderError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            ProviderError::MissingApiKey(_) | ProviderError::Stream(_) => false,
        }
    }
}

/// One completion call: the assembled conversation plus sampling settings
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatTurn>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Start a completion; resolves once the upstream accepted the request
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// xAI (OpenAI-compatible) streaming client
#[derive(Debug, Clone)]
pub struct XaiProvider {
    client: Client,
    config: RelayConfig,
}

impl XaiProvider {
    pub fn new(config: RelayConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn attempt(&self, api_key: &str, body: &ChatCompletionBody<'_>) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .header(header::ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        Err(ProviderError::Status {
            status: status.as_u16(),
            body: detail,
        })
    }
}

#[async_trait]
impl CompletionProvider for XaiProvider {
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError> {
        // Read on every call so a rotated key takes effect without a restart
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| ProviderError::MissingApiKey(self.config.api_key_var.clone()))?;

        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: true,
        };

        let mut attempt = 0;
        loop {
            match self.attempt(&api_key, &body).await {
                Ok(response) => {
                    tracing::debug!("📥 Provider accepted completion after {} retries", attempt);
                    return Ok(chunk_stream(response.bytes_stream()));
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = self.config.backoff_for(attempt);
                    tracing::warn!(
                        "🔄 Provider call failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.config.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

struct DecodeState<S> {
    upstream: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Turn a raw SSE byte stream into ordered text chunks
///
/// The stream ends at `[DONE]`, at upstream end of input, or right after the
/// first upstream error.
pub fn chunk_stream<S, B, E>(upstream: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ProviderError> + Send + 'static,
{
    let state = DecodeState {
        upstream: Box::pin(upstream),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(chunk) = state.pending.pop_front() {
                return Some((Ok(chunk), state));
            }
            if state.finished {
                return None;
            }

            let events = match state.upstream.next().await {
                Some(Ok(bytes)) => state.decoder.push(bytes.as_ref()),
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e.into()), state));
                }
                None => {
                    state.finished = true;
                    state.decoder.finish()
                }
            };
            for event in events {
                match event {
                    SseEvent::Delta(text) => state.pending.push_back(text),
                    SseEvent::Done => state.finished = true,
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn delta(text: &str) -> Vec<u8> {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn chunks_arrive_in_order_and_stop_at_done() {
        let upstream = stream::iter(vec![
            Ok::<_, ProviderError>(delta("Hello")),
            Ok(delta(", world")),
            Ok(b"data: [DONE]\n\n".to_vec()),
            Ok(delta("after done")),
        ]);

        let chunks: Vec<String> = chunk_stream(upstream)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;
        assert_eq!(chunks, vec!["Hello", ", world"]);
    }

    #[tokio::test]
    async fn upstream_error_ends_the_stream() {
        let upstream = stream::iter(vec![
            Ok(delta("partial")),
            Err(ProviderError::Stream("connection reset".to_string())),
            Ok(delta("never seen")),
        ]);

        let items: Vec<_> = chunk_stream(upstream).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "partial");
        assert!(matches!(items[1], Err(ProviderError::Stream(_))));
    }

    #[tokio::test]
    async fn stream_without_done_flushes_the_last_line() {
        let mut last = delta("tail");
        last.truncate(last.len() - 2);
        let upstream = stream::iter(vec![Ok::<_, ProviderError>(delta("head ")), Ok(last)]);

        let chunks: Vec<String> = chunk_stream(upstream).map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec!["head ", "tail"]);
    }

    #[test]
    fn retry_classification() {
        let throttled = ProviderError::Status { status: 429, body: String::new() };
        let unavailable = ProviderError::Status { status: 503, body: String::new() };
        let rejected = ProviderError::Status { status: 401, body: "bad key".to_string() };
        assert!(throttled.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!rejected.is_retryable());
        assert!(!ProviderError::MissingApiKey("XAI_API_KEY".to_string()).is_retryable());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = RelayConfig {
            api_key_var: "PROMPTLAB_TEST_PROVIDER_KEY_NEVER_SET".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            ..RelayConfig::default()
        };
        let provider = XaiProvider::new(config).unwrap();
        let request = CompletionRequest {
            messages: vec![ChatTurn::new(crate::chat::message::Role::User, "hi")],
            temperature: 0.7,
            max_tokens: 100,
        };

        match provider.stream(request).await {
            Err(ProviderError::MissingApiKey(var)) => assert_eq!(var, "PROMPTLAB_TEST_PROVIDER_KEY_NEVER_SET"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected a missing key error"),
        }
    }
}
