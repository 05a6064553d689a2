/// HTTP API Layer
///
/// REST endpoints over the catalog, the laboratory engines and the chat relay:
/// - Streaming agent chat
/// - Agent management and catalog browsing
/// - Laboratory engines and side-by-side comparison

// Agent chat relay (streamed text)
pub mod chat;

// Agent browsing, creation and activation
pub mod agents;

// Prompts, tools, workflows, API services, integrations
pub mod catalog;

// Template marketplace
pub mod marketplace;

// Teams, workspaces and analytics
pub mod teams;

// Laboratory engines
pub mod lab;

// Prompt and workflow comparison
pub mod compare;

// Re-export router builders
pub use agents::create_agent_routes;
pub use catalog::create_catalog_routes;
pub use chat::create_chat_routes;
pub use compare::create_compare_routes;
pub use lab::create_lab_routes;
pub use marketplace::create_marketplace_routes;
pub use teams::create_team_routes;
