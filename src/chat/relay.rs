/// Chat Relay
///
/// Validates an agent chat request against the agent catalog, assembles the
/// conversation (`[system, ...history, user]`) and forwards it to the
/// completion provider with the agent's sampling settings.

use crate::catalog::{AgentCatalog, AiAgent};
use crate::chat::message::{ChatTurn, Role};
use crate::chat::provider::{ChunkStream, CompletionProvider, CompletionRequest, ProviderError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Body of `POST /api/agents/chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

impl ChatRequest {
    pub fn new(agent_id: impl Into<String>, message: impl Into<String>, history: Vec<ChatTurn>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            message: Some(message.into()),
            conversation_history: history,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Agent ID and message are required")]
    MissingFields,
    #[error("Agent not found")]
    AgentNotFound,
    #[error("Agent is not active")]
    AgentInactive,
    #[error("Failed to generate response")]
    Upstream(#[source] ProviderError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingFields | RelayError::AgentInactive => StatusCode::BAD_REQUEST,
            RelayError::AgentNotFound => StatusCode::NOT_FOUND,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Plain-text reason; upstream detail stays in the server log
        (self.status(), self.to_string()).into_response()
    }
}

/// Relay between chat clients and the completion provider
#[derive(Clone)]
pub struct ChatRelay {
    agents: Arc<AgentCatalog>,
    provider: Arc<dyn CompletionProvider>,
}

impl ChatRelay {
    pub fn new(agents: Arc<AgentCatalog>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { agents, provider }
    }

    /// Validate the request and build the provider call
    pub fn prepare(&self, request: ChatRequest) -> Result<(AiAgent, CompletionRequest), RelayError> {
        let agent_id = non_blank(request.agent_id).ok_or(RelayError::MissingFields)?;
        let message = non_blank(request.message).ok_or(RelayError::MissingFields)?;

        let agent = self.agents.get_by_id(&agent_id).ok_or(RelayError::AgentNotFound)?;
        if !agent.is_active {
            return Err(RelayError::AgentInactive);
        }

        let mut messages = Vec::with_capacity(request.conversation_history.len() + 2);
        messages.push(ChatTurn::new(Role::System, agent.system_prompt.clone()));
        messages.extend(
            request
                .conversation_history
                .into_iter()
                .filter(|turn| turn.role != Role::System),
        );
        messages.push(ChatTurn::new(Role::User, message));

        let completion = CompletionRequest {
            messages,
            temperature: agent.temperature,
            max_tokens: agent.max_tokens,
        };
        Ok((agent, completion))
    }

    /// Validate, assemble and start streaming the agent's reply
    pub async fn relay(&self, request: ChatRequest) -> Result<ChunkStream, RelayError> {
        let (agent, completion) = self.prepare(request)?;
        tracing::info!(
            "📥 Relaying chat for agent {} ({} messages, temperature {}, max tokens {})",
            agent.id,
            completion.messages.len(),
            completion.temperature,
            completion.max_tokens
        );

        self.provider.stream(completion).await.map_err(|e| {
            tracing::error!("❌ Chat relay for agent {} failed: {}", agent.id, e);
            RelayError::Upstream(e)
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use crate::chat::provider::chunk_stream;
    use async_trait::async_trait;
    use futures::{stream, StreamExt};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records requests and replies with a fixed SSE body
    struct ScriptedProvider {
        seen: Mutex<Vec<CompletionRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError> {
            self.seen.lock().unwrap().push(request);
            if self.fail {
                return Err(ProviderError::Status { status: 503, body: "overloaded".to_string() });
            }
            let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi!\"}}]}\n\ndata: [DONE]\n\n";
            Ok(chunk_stream(stream::iter(vec![Ok::<_, ProviderError>(body.as_bytes().to_vec())])))
        }
    }

    fn relay(fail: bool) -> (ChatRelay, Arc<ScriptedProvider>, AiAgent) {
        let catalog = seed::load().unwrap();
        let agent = catalog.agents.active().into_iter().next().unwrap();
        let provider = Arc::new(ScriptedProvider { seen: Mutex::new(Vec::new()), fail });
        (ChatRelay::new(catalog.agents.clone(), provider.clone()), provider, agent)
    }

    #[test]
    fn missing_fields_are_rejected_first() {
        let (relay, _, _) = relay(false);
        let err = relay.prepare(ChatRequest::default()).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Agent ID and message are required");

        let blank = ChatRequest::new("nonexistent", "   ", Vec::new());
        assert!(matches!(relay.prepare(blank), Err(RelayError::MissingFields)));
    }

    #[test]
    fn unknown_and_inactive_agents_are_rejected() {
        let (relay, _, agent) = relay(false);
        let err = relay.prepare(ChatRequest::new("nonexistent", "hi", Vec::new())).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        relay.agents.set_active(&agent.id, false).unwrap();
        let err = relay.prepare(ChatRequest::new(agent.id.clone(), "hi", Vec::new())).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Agent is not active");
    }

    #[test]
    fn conversation_is_assembled_around_the_history() {
        let (relay, _, agent) = relay(false);
        let history = vec![
            ChatTurn::new(Role::User, "first question"),
            ChatTurn::new(Role::Assistant, "first answer"),
        ];
        let (_, completion) = relay
            .prepare(ChatRequest::new(agent.id.clone(), "follow up", history.clone()))
            .unwrap();

        assert_eq!(completion.messages.len(), 4);
        assert_eq!(completion.messages[0], ChatTurn::new(Role::System, agent.system_prompt.clone()));
        assert_eq!(&completion.messages[1..3], history.as_slice());
        assert_eq!(completion.messages[3], ChatTurn::new(Role::User, "follow up"));
        assert_eq!(completion.temperature, agent.temperature);
        assert_eq!(completion.max_tokens, agent.max_tokens);
    }

    #[tokio::test]
    async fn relay_streams_provider_chunks() {
        let (relay, provider, agent) = relay(false);
        let chunks: Vec<String> = relay
            .relay(ChatRequest::new(agent.id.clone(), "hello", Vec::new()))
            .await
            .unwrap()
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        assert_eq!(chunks, vec!["Hi!"]);
        assert_eq!(provider.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_generic_error() {
        let (relay, _, agent) = relay(true);
        let err = match relay.relay(ChatRequest::new(agent.id.clone(), "hello", Vec::new())).await {
            Err(e) => e,
            Ok(_) => panic!("expected relay failure"),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to generate response");
    }
}
