/// Chat message and conversation model
///
/// Messages are created per turn by the chat session; conversations group them
/// under an agent. Neither is persisted beyond the process.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const TITLE_LIMIT: usize = 50;
const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Message {
    /// Create a message stamped now, with an estimated token count
    pub fn new(role: Role, content: impl Into<String>, model: Option<String>) -> Self {
        let content = content.into();
        Self {
            id: generate_id("msg"),
            role,
            tokens: Some(estimate_tokens(&content)),
            content,
            timestamp: Utc::now(),
            model,
        }
    }

    pub fn turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// The role/content pair exchanged with the relay and the upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A stored conversation between a user and an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub agent_id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
}

impl Conversation {
    pub fn new(agent_id: impl Into<String>, title: impl Into<String>, initial: Option<Message>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("conv"),
            agent_id: agent_id.into(),
            title: title.into(),
            messages: initial.into_iter().collect(),
            created_at: now,
            updated_at: now,
            is_archived: false,
        }
    }
}

/// Rough token estimate: one token per four characters, rounded up
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(4)
}

/// Title derived from the first user message
pub fn conversation_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    let title: String = trimmed.chars().take(TITLE_LIMIT).collect();
    if title.len() < trimmed.len() {
        format!("{}...", title)
    } else {
        title
    }
}

/// Display name for an upstream model id
pub fn format_model_name(model: &str) -> String {
    match model {
        "grok-beta" => "Grok Beta".to_string(),
        "grok-vision-beta" => "Grok Vision Beta".to_string(),
        other => other.to_string(),
    }
}

/// `<prefix>-<unix millis>-<9 base36 chars>`
pub(crate) fn generate_id(prefix: &str) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}
