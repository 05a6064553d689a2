/// Chat Layer
///
/// Everything between a chat client and the upstream text-generation provider:
/// - Message and conversation model
/// - Provider trait and the streaming xAI client
/// - Relay validation and conversation assembly
/// - Client-side session with optimistic updates and transcript export

// Message, conversation and token helpers
pub mod message;

// OpenAI-compatible SSE decoding
pub mod sse;

// Upstream completion provider
pub mod provider;

// Agent chat relay
pub mod relay;

// Client-side chat session
pub mod session;

pub use message::{ChatTurn, Conversation, Message, Role};
pub use provider::{ChunkStream, CompletionProvider, CompletionRequest, ProviderError, XaiProvider};
pub use relay::{ChatRelay, ChatRequest, RelayError};
pub use session::{ChatSession, ChatTransport, HttpChatClient, Transcript};
