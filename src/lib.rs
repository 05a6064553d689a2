/// PromptLab: catalog and laboratory service for AI prompts, workflows and agents
///
/// This library provides the seed-backed catalog repositories, the heuristic prompt
/// and workflow laboratory, and the streaming chat relay in front of an external
/// text-generation provider.

// Core configuration and setup
pub mod config;

// Catalog layer - repository abstraction over embedded seed data
pub mod catalog;

// n8n workflow model and structural validation
pub mod workflow;

// Laboratory engines - analyzer, optimizer, simulator, generator, playground
pub mod lab;

// Chat layer - message model, upstream provider, relay and client session
pub mod chat;

// HTTP API layer - catalog, laboratory and chat endpoints
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use catalog::Catalog;
pub use workflow::{Edge, N8nWorkflow, WorkflowNode};
pub use server::{build_router, create_app, start_server, AppState};
