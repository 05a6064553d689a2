/// AI agent catalog
///
/// Agents, agent templates and seed conversations, plus validated agent
/// creation through [`AgentConfig`].

use crate::catalog::{Record, Repository};
use crate::chat::message::{generate_id, Conversation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const MAX_TOKENS_LIMIT: u32 = 4000;

/// A canned example exchange shown on an agent card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentExample {
    pub id: String,
    pub title: String,
    pub user_message: String,
    pub expected_response: String,
}

/// A configured chat agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAgent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub model: String,
    /// Sampling temperature in [0, 2]
    pub temperature: f32,
    /// Completion budget in [1, 4000]
    pub max_tokens: u32,
    pub category: String,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub conversation_count: u32,
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub examples: Vec<AgentExample>,
}

impl Record for AiAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

/// An agent blueprint without identity or activity state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub system_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub tags: Vec<String>,
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub examples: Vec<AgentExample>,
    pub is_popular: bool,
}

impl Record for AgentTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

impl Record for Conversation {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }
}

/// Agent creation request
///
/// Every rule is checked and all failures are reported together.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub category: String,
    pub tags: Vec<String>,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid agent configuration: {}", .errors.join("; "))]
pub struct AgentConfigError {
    pub errors: Vec<String>,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), AgentConfigError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Agent name is required".to_string());
        }
        if self.description.trim().is_empty() {
            errors.push("Agent description is required".to_string());
        }
        if self.system_prompt.trim().is_empty() {
            errors.push("System prompt is required".to_string());
        }
        if self.model.trim().is_empty() {
            errors.push("Model selection is required".to_string());
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push("Temperature must be between 0 and 2".to_string());
            }
        }
        if let Some(max_tokens) = self.max_tokens {
            if !(1..=MAX_TOKENS_LIMIT).contains(&max_tokens) {
                errors.push("Max tokens must be between 1 and 4000".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AgentConfigError { errors })
        }
    }

    /// Validate and build an active agent with a fresh id
    pub fn build(self) -> Result<AiAgent, AgentConfigError> {
        self.validate()?;
        let now = Utc::now();
        Ok(AiAgent {
            id: generate_id("agent"),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            system_prompt: self.system_prompt,
            model: self.model,
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            category: self.category,
            tags: self.tags,
            is_active: true,
            created_at: now,
            last_used: None,
            conversation_count: 0,
            capabilities: self.capabilities,
            examples: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelUsage {
    pub model: String,
    pub count: usize,
}

/// Aggregate agent statistics for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub total_agents: usize,
    pub active_agents: usize,
    pub total_conversations: u64,
    pub total_messages: usize,
    pub popular_categories: Vec<CategoryCount>,
    pub model_usage: Vec<ModelUsage>,
}

pub struct AgentCatalog {
    agents: Arc<dyn Repository<AiAgent>>,
    templates: Arc<dyn Repository<AgentTemplate>>,
    conversations: Arc<dyn Repository<Conversation>>,
}

impl AgentCatalog {
    pub fn new(
        agents: Arc<dyn Repository<AiAgent>>,
        templates: Arc<dyn Repository<AgentTemplate>>,
        conversations: Arc<dyn Repository<Conversation>>,
    ) -> Self {
        Self {
            agents,
            templates,
            conversations,
        }
    }

    pub fn list(&self) -> Vec<AiAgent> {
        self.agents.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<AiAgent> {
        self.agents.get_by_id(id)
    }

    pub fn active(&self) -> Vec<AiAgent> {
        self.agents.filter(&|agent| agent.is_active)
    }

    /// `"all"` returns every agent
    pub fn by_category(&self, category: &str) -> Vec<AiAgent> {
        if category == "all" {
            return self.agents.list();
        }
        self.agents.filter(&|agent| agent.category == category)
    }

    pub fn search(&self, query: &str) -> Vec<AiAgent> {
        self.agents.search(query)
    }

    pub fn stats(&self) -> AgentStats {
        let agents = self.agents.list();

        let mut popular_categories: Vec<CategoryCount> = Vec::new();
        let mut model_usage: Vec<ModelUsage> = Vec::new();
        for agent in &agents {
            match popular_categories.iter_mut().find(|c| c.category == agent.category) {
                Some(entry) => entry.count += 1,
                None => popular_categories.push(CategoryCount {
                    category: agent.category.clone(),
                    count: 1,
                }),
            }
            match model_usage.iter_mut().find(|m| m.model == agent.model) {
                Some(entry) => entry.count += 1,
                None => model_usage.push(ModelUsage {
                    model: agent.model.clone(),
                    count: 1,
                }),
            }
        }

        AgentStats {
            total_agents: agents.len(),
            active_agents: agents.iter().filter(|a| a.is_active).count(),
            total_conversations: agents.iter().map(|a| a.conversation_count as u64).sum(),
            total_messages: self
                .conversations
                .list()
                .iter()
                .map(|c| c.messages.len())
                .sum(),
            popular_categories,
            model_usage,
        }
    }

    pub fn conversations_for(&self, agent_id: &str) -> Vec<Conversation> {
        self.conversations
            .filter(&|conversation| conversation.agent_id == agent_id)
    }

    pub fn templates(&self) -> Vec<AgentTemplate> {
        self.templates.list()
    }

    pub fn popular_templates(&self) -> Vec<AgentTemplate> {
        self.templates.filter(&|template| template.is_popular)
    }

    /// In-memory activity toggle; `None` when the agent is unknown
    pub fn set_active(&self, id: &str, is_active: bool) -> Option<AiAgent> {
        let updated = self.agents.update(id, &|agent| agent.is_active = is_active);
        if updated.is_some() {
            tracing::info!("🔄 Agent {} active={}", id, is_active);
        }
        updated
    }

    pub fn create(&self, config: AgentConfig) -> Result<AiAgent, AgentConfigError> {
        let agent = config.build()?;
        if !self.agents.insert(agent.clone()) {
            return Err(AgentConfigError {
                errors: vec![format!("Agent id {} already exists", agent.id)],
            });
        }
        tracing::info!("✅ Created agent: {} ({})", agent.id, agent.name);
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn valid_config() -> AgentConfig {
        AgentConfig {
            name: "Helper".into(),
            description: "Helps".into(),
            system_prompt: "You help.".into(),
            model: "grok-beta".into(),
            ..AgentConfig::default()
        }
    }

    #[test]
    fn validation_collects_every_failure() {
        let config = AgentConfig {
            temperature: Some(2.5),
            max_tokens: Some(0),
            ..AgentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                "Agent name is required",
                "Agent description is required",
                "System prompt is required",
                "Model selection is required",
                "Temperature must be between 0 and 2",
                "Max tokens must be between 1 and 4000",
            ]
        );
    }

    #[test]
    fn build_applies_defaults() {
        let agent = valid_config().build().unwrap();
        assert!(agent.id.starts_with("agent-"));
        assert!(agent.is_active);
        assert_eq!(agent.conversation_count, 0);
        assert_eq!(agent.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(agent.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn boundary_values_are_accepted() {
        let config = AgentConfig {
            temperature: Some(2.0),
            max_tokens: Some(4000),
            ..valid_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stats_aggregate_seed_data() {
        let catalog = seed::load().unwrap().agents;
        let stats = catalog.stats();
        assert_eq!(stats.total_agents, 3);
        assert_eq!(stats.active_agents, 2);
        assert_eq!(stats.total_conversations, 55);
        assert_eq!(stats.total_messages, 2);
        assert_eq!(
            stats.model_usage,
            vec![ModelUsage {
                model: "grok-beta".into(),
                count: 3
            }]
        );
    }

    #[test]
    fn set_active_and_create_mutate_in_memory_only() {
        let catalog = seed::load().unwrap().agents;
        assert!(catalog.set_active("missing", true).is_none());
        let agent = catalog.set_active("agent-3", true).unwrap();
        assert!(agent.is_active);
        assert_eq!(catalog.active().len(), 3);

        let created = catalog.create(valid_config()).unwrap();
        assert_eq!(catalog.get_by_id(&created.id).unwrap().name, "Helper");
    }

    #[test]
    fn back_to_back_creates_keep_every_agent() {
        let catalog = seed::load().unwrap().agents;
        let before = catalog.list().len();

        let ids: HashSet<String> = (0..50)
            .map(|_| catalog.create(valid_config()).unwrap().id)
            .collect();

        assert_eq!(ids.len(), 50);
        assert_eq!(catalog.list().len(), before + 50);
    }

    #[test]
    fn by_category_all_returns_everything() {
        let catalog = seed::load().unwrap().agents;
        assert_eq!(catalog.by_category("all").len(), 3);
        assert_eq!(catalog.by_category("Creative").len(), 1);
        assert_eq!(catalog.popular_templates().len(), 3);
    }
}
