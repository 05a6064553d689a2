/// System prompt catalog
///
/// Browsing accessors over the AI tool system prompts and the tool directory.
/// The prompt optimizer also draws its expert prompts from here.

use crate::catalog::{unique_in_order, Record, Repository};
use crate::workflow::Complexity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A published system prompt of an AI tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPrompt {
    pub id: String,
    pub name: String,
    /// Tool display name (e.g., "v0", "Cursor")
    pub tool: String,
    pub category: String,
    pub description: String,
    pub content: String,
    pub version: String,
    pub last_updated: String,
    pub complexity: Complexity,
    pub tags: Vec<String>,
    pub word_count: u32,
    pub features: Vec<String>,
}

impl Record for SystemPrompt {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.description.as_str(),
            self.content.as_str(),
        ];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

/// An AI tool listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub website: String,
    pub company: String,
    pub prompt_count: u32,
}

impl Record for AiTool {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.company.as_str(),
        ]
    }
}

/// Exact-match prompt filter; absent fields do not constrain
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFilter {
    pub category: Option<String>,
    pub tool: Option<String>,
    pub complexity: Option<Complexity>,
    /// Matches prompts carrying any of these tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PromptFilter {
    pub fn matches(&self, prompt: &SystemPrompt) -> bool {
        if let Some(category) = &self.category {
            if &prompt.category != category {
                return false;
            }
        }
        if let Some(tool) = &self.tool {
            if &prompt.tool != tool {
                return false;
            }
        }
        if let Some(complexity) = self.complexity {
            if prompt.complexity != complexity {
                return false;
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| prompt.tags.contains(tag)) {
            return false;
        }
        true
    }
}

/// Distinct filter values offered by the prompt browser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFacets {
    pub categories: Vec<String>,
    pub tools: Vec<String>,
    pub tags: Vec<String>,
}

pub struct PromptCatalog {
    prompts: Arc<dyn Repository<SystemPrompt>>,
    tools: Arc<dyn Repository<AiTool>>,
}

impl PromptCatalog {
    pub fn new(
        prompts: Arc<dyn Repository<SystemPrompt>>,
        tools: Arc<dyn Repository<AiTool>>,
    ) -> Self {
        Self { prompts, tools }
    }

    pub fn get_by_id(&self, id: &str) -> Option<SystemPrompt> {
        self.prompts.get_by_id(id)
    }

    pub fn list(&self) -> Vec<SystemPrompt> {
        self.prompts.list()
    }

    pub fn search(&self, query: &str) -> Vec<SystemPrompt> {
        self.prompts.search(query)
    }

    pub fn by_tool(&self, tool: &str) -> Vec<SystemPrompt> {
        self.prompts
            .filter(&|prompt| prompt.tool.eq_ignore_ascii_case(tool))
    }

    pub fn by_category(&self, category: &str) -> Vec<SystemPrompt> {
        self.prompts
            .filter(&|prompt| prompt.category.eq_ignore_ascii_case(category))
    }

    pub fn filter(&self, filter: &PromptFilter) -> Vec<SystemPrompt> {
        self.prompts.filter(&|prompt| filter.matches(prompt))
    }

    pub fn unique_categories(&self) -> Vec<String> {
        unique_in_order(self.prompts.list().into_iter().map(|p| p.category))
    }

    pub fn unique_tools(&self) -> Vec<String> {
        unique_in_order(self.prompts.list().into_iter().map(|p| p.tool))
    }

    pub fn unique_tags(&self) -> Vec<String> {
        unique_in_order(self.prompts.list().into_iter().flat_map(|p| p.tags))
    }

    pub fn facets(&self) -> PromptFacets {
        PromptFacets {
            categories: self.unique_categories(),
            tools: self.unique_tools(),
            tags: self.unique_tags(),
        }
    }

    pub fn tools(&self) -> Vec<AiTool> {
        self.tools.list()
    }

    pub fn tool_by_id(&self, id: &str) -> Option<AiTool> {
        self.tools.get_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn catalog() -> Arc<PromptCatalog> {
        seed::load().unwrap().prompts
    }

    #[test]
    fn by_tool_ignores_case() {
        let catalog = catalog();
        let ids: Vec<_> = catalog.by_tool("cursor").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["cursor-main"]);
        assert_eq!(catalog.by_tool("V0").len(), 1);
    }

    #[test]
    fn search_matches_content_and_tags() {
        let catalog = catalog();
        let ids: Vec<_> = catalog.search("TAILWIND").into_iter().map(|p| p.id).collect();
        assert!(ids.contains(&"v0-main".to_string()));
        assert!(catalog.search("no-such-term-anywhere").is_empty());
    }

    #[test]
    fn filter_is_exact_and_tags_match_any() {
        let catalog = catalog();
        let filter = PromptFilter {
            complexity: Some(Complexity::Advanced),
            tags: vec!["testing".into(), "react".into()],
            ..PromptFilter::default()
        };
        let ids: Vec<_> = catalog.filter(&filter).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["v0-main", "devin-main"]);

        let filter = PromptFilter {
            tool: Some("cursor".into()),
            ..PromptFilter::default()
        };
        assert!(catalog.filter(&filter).is_empty());
    }

    #[test]
    fn facets_are_distinct_in_seed_order() {
        let facets = catalog().facets();
        assert_eq!(facets.tools, vec!["v0", "Cursor", "Devin", "Claude"]);
        assert_eq!(facets.categories.len(), 4);
    }
}
