/// Embedded seed data
///
/// The JSON documents under `data/` are compiled into the binary and parsed
/// once at startup. Every seed workflow is validated as a DAG before the
/// catalog is handed out.

use crate::catalog::agents::{AgentCatalog, AgentTemplate, AiAgent};
use crate::catalog::analytics::{
    AnalyticsCatalog, AnalyticsMetrics, CostSuggestion, TeamAnalytics, UserAnalytics,
};
use crate::catalog::apis::{ApiCatalog, ApiIntegration, ApiService};
use crate::catalog::integrations::{
    Integration, IntegrationCatalog, IntegrationConnection, SyncLog, WebhookEvent,
};
use crate::catalog::prompts::{AiTool, PromptCatalog, SystemPrompt};
use crate::catalog::store::SeedRepository;
use crate::catalog::teams::{Activity, SharedResource, Team, TeamCatalog, TeamMember, Workspace};
use crate::catalog::templates::{
    MarketplaceTemplate, TemplateCatalog, TemplateCollection, TemplateReview,
};
use crate::catalog::workflows::WorkflowCatalog;
use crate::catalog::Catalog;
use crate::chat::message::Conversation;
use crate::workflow::{validate_workflow, N8nWorkflow, WorkflowCategory};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

const PROMPTS: &str = include_str!("../../data/prompts.json");
const WORKFLOWS: &str = include_str!("../../data/workflows.json");
const AGENTS: &str = include_str!("../../data/agents.json");
const APIS: &str = include_str!("../../data/apis.json");
const INTEGRATIONS: &str = include_str!("../../data/integrations.json");
const TEMPLATES: &str = include_str!("../../data/templates.json");
const TEAMS: &str = include_str!("../../data/teams.json");
const ANALYTICS: &str = include_str!("../../data/analytics.json");

#[derive(Deserialize)]
struct PromptSeed {
    tools: Vec<AiTool>,
    prompts: Vec<SystemPrompt>,
}

#[derive(Deserialize)]
struct WorkflowSeed {
    categories: Vec<WorkflowCategory>,
    workflows: Vec<N8nWorkflow>,
}

#[derive(Deserialize)]
struct AgentSeed {
    templates: Vec<AgentTemplate>,
    agents: Vec<AiAgent>,
    conversations: Vec<Conversation>,
}

#[derive(Deserialize)]
struct ApiSeed {
    services: Vec<ApiService>,
    integrations: Vec<ApiIntegration>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntegrationSeed {
    integrations: Vec<Integration>,
    connections: Vec<IntegrationConnection>,
    webhook_events: Vec<WebhookEvent>,
    sync_logs: Vec<SyncLog>,
}

#[derive(Deserialize)]
struct TemplateSeed {
    templates: Vec<MarketplaceTemplate>,
    reviews: Vec<TemplateReview>,
    collections: Vec<TemplateCollection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamSeed {
    teams: Vec<Team>,
    members: Vec<TeamMember>,
    shared_resources: Vec<SharedResource>,
    activities: Vec<Activity>,
    workspaces: Vec<Workspace>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsSeed {
    metrics: AnalyticsMetrics,
    users: Vec<UserAnalytics>,
    teams: Vec<TeamAnalytics>,
    cost_suggestions: Vec<CostSuggestion>,
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("Failed to parse {} seed data", name))
}

/// Parse all seed documents into a fresh catalog
///
/// Each call builds independent repositories, so in-memory changes made
/// through one catalog never leak into another.
pub fn load() -> Result<Catalog> {
    let prompts: PromptSeed = parse("prompts", PROMPTS)?;
    let workflows: WorkflowSeed = parse("workflows", WORKFLOWS)?;
    let agents: AgentSeed = parse("agents", AGENTS)?;
    let apis: ApiSeed = parse("apis", APIS)?;
    let integrations: IntegrationSeed = parse("integrations", INTEGRATIONS)?;
    let templates: TemplateSeed = parse("templates", TEMPLATES)?;
    let teams: TeamSeed = parse("teams", TEAMS)?;
    let analytics: AnalyticsSeed = parse("analytics", ANALYTICS)?;

    for workflow in &workflows.workflows {
        validate_workflow(workflow)
            .with_context(|| format!("Seed workflow {} is invalid", workflow.id))?;
    }

    tracing::info!(
        "📥 Loaded seed catalog: {} prompts, {} workflows, {} agents, {} templates",
        prompts.prompts.len(),
        workflows.workflows.len(),
        agents.agents.len(),
        templates.templates.len()
    );

    Ok(Catalog {
        prompts: Arc::new(PromptCatalog::new(
            SeedRepository::shared("prompts", prompts.prompts),
            SeedRepository::shared("tools", prompts.tools),
        )),
        workflows: Arc::new(WorkflowCatalog::new(
            SeedRepository::shared("workflows", workflows.workflows),
            SeedRepository::shared("workflow categories", workflows.categories),
        )),
        agents: Arc::new(AgentCatalog::new(
            SeedRepository::shared("agents", agents.agents),
            SeedRepository::shared("agent templates", agents.templates),
            SeedRepository::shared("conversations", agents.conversations),
        )),
        apis: Arc::new(ApiCatalog::new(
            SeedRepository::shared("api services", apis.services),
            SeedRepository::shared("api integrations", apis.integrations),
        )),
        integrations: Arc::new(IntegrationCatalog::new(
            SeedRepository::shared("integrations", integrations.integrations),
            SeedRepository::shared("connections", integrations.connections),
            SeedRepository::shared("webhook events", integrations.webhook_events),
            SeedRepository::shared("sync logs", integrations.sync_logs),
        )),
        templates: Arc::new(TemplateCatalog::new(
            SeedRepository::shared("marketplace templates", templates.templates),
            SeedRepository::shared("template reviews", templates.reviews),
            SeedRepository::shared("template collections", templates.collections),
        )),
        teams: Arc::new(TeamCatalog::new(
            SeedRepository::shared("teams", teams.teams),
            SeedRepository::shared("team members", teams.members),
            SeedRepository::shared("shared resources", teams.shared_resources),
            SeedRepository::shared("activities", teams.activities),
            SeedRepository::shared("workspaces", teams.workspaces),
        )),
        analytics: Arc::new(AnalyticsCatalog::new(
            analytics.metrics,
            SeedRepository::shared("user analytics", analytics.users),
            SeedRepository::shared("team analytics", analytics.teams),
            analytics.cost_suggestions,
        )),
    })
}

impl Catalog {
    /// Catalog backed by the embedded seed data
    pub fn from_seed() -> Result<Self> {
        load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_seed_documents_parse() {
        let catalog = load().unwrap();
        assert_eq!(catalog.prompts.list().len(), 4);
        assert_eq!(catalog.prompts.tools().len(), 6);
        assert_eq!(catalog.workflows.list().len(), 3);
        assert_eq!(catalog.agents.list().len(), 3);
        assert_eq!(catalog.agents.templates().len(), 4);
        assert_eq!(catalog.apis.list().len(), 4);
        assert_eq!(catalog.integrations.list().len(), 6);
        assert_eq!(catalog.templates.list().len(), 4);
        assert_eq!(catalog.teams.list().len(), 2);
        assert_eq!(catalog.analytics.users().len(), 2);
    }
}
