/// Client-side chat session
///
/// Drives one conversation with an agent through a [`ChatTransport`]:
/// the user message and an empty assistant message are appended before the
/// request goes out, streamed chunks grow the assistant message in receipt
/// order, and failures roll the optimistic messages back.

use crate::chat::message::{estimate_tokens, ChatTurn, Message, Role};
use crate::chat::relay::ChatRequest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const SEND_FAILED: &str = "Failed to send message";
pub const STREAM_FAILED: &str = "Failed to receive complete response";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

pub type TextStream = BoxStream<'static, Result<String, TransportError>>;

/// Sends one chat turn and yields the reply as text chunks
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, agent_id: &str, message: &str, history: &[ChatTurn]) -> Result<TextStream, TransportError>;
}

/// [`ChatTransport`] against a running relay (`POST /api/agents/chat`)
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    base_url: String,
}

impl HttpChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/agents/chat", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for HttpChatClient {
    async fn send(&self, agent_id: &str, message: &str, history: &[ChatTurn]) -> Result<TextStream, TransportError> {
        let request = ChatRequest::new(agent_id, message, history.to_vec());
        let response = self.client.post(self.endpoint()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(utf8_chunks(response.bytes_stream()))
    }
}

/// Decode a byte stream into text, holding back characters split across chunks
fn utf8_chunks<S, B>(bytes: S) -> TextStream
where
    S: futures::Stream<Item = Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let carry: Vec<u8> = Vec::new();
    bytes
        .scan(carry, |carry, item| {
            let decoded = item.map_err(TransportError::from).map(|chunk| {
                carry.extend_from_slice(chunk.as_ref());
                let valid = match std::str::from_utf8(&carry[..]) {
                    Ok(_) => carry.len(),
                    Err(e) if e.error_len().is_none() => e.valid_up_to(),
                    Err(_) => carry.len(),
                };
                let text = String::from_utf8_lossy(&carry[..valid]).into_owned();
                carry.drain(..valid);
                text
            });
            futures::future::ready(Some(decoded))
        })
        .filter(|item| futures::future::ready(!matches!(item, Ok(text) if text.is_empty())))
        .boxed()
}

/// Outcome of [`ChatSession::send_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a send already in flight
    Ignored,
    Completed,
    /// The request failed; user and assistant messages were removed
    SendFailed,
    /// The stream broke; only the assistant message was removed
    StreamFailed,
}

pub struct ChatSession {
    agent_id: String,
    model: String,
    transport: Arc<dyn ChatTransport>,
    messages: Vec<Message>,
    is_loading: bool,
    error: Option<String>,
}

impl ChatSession {
    pub fn new(agent_id: impl Into<String>, model: impl Into<String>, transport: Arc<dyn ChatTransport>) -> Self {
        Self::with_messages(agent_id, model, transport, Vec::new())
    }

    pub fn with_messages(
        agent_id: impl Into<String>,
        model: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
        initial: Vec<Message>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            model: model.into(),
            transport,
            messages: initial,
            is_loading: false,
            error: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn send_message(&mut self, content: &str) -> SendOutcome {
        self.send_message_with(content, |_| {}).await
    }

    /// Send `content`, calling `on_chunk` for every streamed chunk
    pub async fn send_message_with<F>(&mut self, content: &str, mut on_chunk: F) -> SendOutcome
    where
        F: FnMut(&str) + Send,
    {
        if content.trim().is_empty() || self.is_loading {
            return SendOutcome::Ignored;
        }
        self.is_loading = true;
        self.error = None;

        // History is the conversation before this turn
        let history: Vec<ChatTurn> = self.messages.iter().map(Message::turn).collect();
        self.messages.push(Message::new(Role::User, content, None));
        self.messages.push(Message::new(Role::Assistant, "", Some(self.model.clone())));

        let sent = self.transport.send(&self.agent_id, content, &history).await;
        let outcome = match sent {
            Ok(mut chunks) => {
                let mut full_response = String::new();
                let mut broken = false;
                while let Some(chunk) = chunks.next().await {
                    match chunk {
                        Ok(text) => {
                            full_response.push_str(&text);
                            if let Some(assistant) = self.streaming_message() {
                                assistant.content.push_str(&text);
                                assistant.timestamp = Utc::now();
                            }
                            on_chunk(&text);
                        }
                        Err(e) => {
                            tracing::error!("❌ Chat stream for agent {} broke: {}", self.agent_id, e);
                            broken = true;
                            break;
                        }
                    }
                }

                if broken {
                    self.error = Some(STREAM_FAILED.to_string());
                    self.rollback(1);
                    SendOutcome::StreamFailed
                } else {
                    if let Some(assistant) = self.streaming_message() {
                        assistant.tokens = Some(estimate_tokens(&full_response));
                        assistant.content = full_response;
                        assistant.timestamp = Utc::now();
                    }
                    SendOutcome::Completed
                }
            }
            Err(e) => {
                tracing::error!("❌ Error sending message to agent {}: {}", self.agent_id, e);
                let message = e.to_string();
                self.error = Some(if message.is_empty() { SEND_FAILED.to_string() } else { message });
                self.rollback(2);
                SendOutcome::SendFailed
            }
        };

        self.is_loading = false;
        outcome
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Transcript of the current messages for download
    pub fn export(&self, agent_name: &str) -> Transcript {
        Transcript::new(agent_name, &self.messages)
    }

    fn streaming_message(&mut self) -> Option<&mut Message> {
        self.messages.last_mut().filter(|m| m.role == Role::Assistant)
    }

    fn rollback(&mut self, count: usize) {
        let keep = self.messages.len().saturating_sub(count);
        self.messages.truncate(keep);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Exported chat: `{agent, timestamp, messages:[{role, content, timestamp}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub agent: String,
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<TranscriptMessage>,
}

impl Transcript {
    pub fn new(agent: &str, messages: &[Message]) -> Self {
        Self {
            agent: agent.to_string(),
            timestamp: Utc::now(),
            messages: messages
                .iter()
                .map(|m| TranscriptMessage {
                    role: m.role,
                    content: m.content.clone(),
                    timestamp: m.timestamp,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `chat-<agent>-<YYYY-MM-DD>.json`
    pub fn file_name(&self) -> String {
        format!("chat-{}-{}.json", self.agent, self.timestamp.format("%Y-%m-%d"))
    }
}
