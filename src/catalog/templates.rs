/// Marketplace template catalog
///
/// Community templates (agents, workflows, prompts, integrations) with their
/// reviews and curated collections.

use crate::catalog::{unique_in_order, Record, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const RANKING_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Agent,
    Workflow,
    Prompt,
    Integration,
}

impl TemplateType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "agent" => Some(TemplateType::Agent),
            "workflow" => Some(TemplateType::Workflow),
            "prompt" => Some(TemplateType::Prompt),
            "integration" => Some(TemplateType::Integration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAuthor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub verified: bool,
    pub reputation: f64,
    pub total_templates: u32,
    pub total_downloads: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub downloads: u64,
    pub forks: u64,
    pub likes: u64,
    pub views: u64,
    pub rating: f64,
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePricing {
    /// "Free", "Premium" or "Enterprise"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub license: String,
}

/// A published marketplace template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub category: String,
    pub tags: Vec<String>,
    pub author: TemplateAuthor,
    /// Type-specific payload (agent config, workflow graph, prompt text...)
    pub content: Value,
    pub metadata: Value,
    pub stats: TemplateStats,
    pub pricing: TemplatePricing,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub is_featured: bool,
}

impl Record for MarketplaceTemplate {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReview {
    pub id: String,
    pub template_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub rating: u8,
    pub title: String,
    pub content: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub helpful: u32,
    pub verified: bool,
}

impl Record for TemplateReview {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCollection {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: TemplateAuthor,
    /// Template ids
    pub templates: Vec<String>,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub followers: u32,
}

impl Record for TemplateCollection {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

pub struct TemplateCatalog {
    templates: Arc<dyn Repository<MarketplaceTemplate>>,
    reviews: Arc<dyn Repository<TemplateReview>>,
    collections: Arc<dyn Repository<TemplateCollection>>,
}

impl TemplateCatalog {
    pub fn new(
        templates: Arc<dyn Repository<MarketplaceTemplate>>,
        reviews: Arc<dyn Repository<TemplateReview>>,
        collections: Arc<dyn Repository<TemplateCollection>>,
    ) -> Self {
        Self {
            templates,
            reviews,
            collections,
        }
    }

    pub fn list(&self) -> Vec<MarketplaceTemplate> {
        self.templates.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<MarketplaceTemplate> {
        self.templates.get_by_id(id)
    }

    pub fn featured(&self) -> Vec<MarketplaceTemplate> {
        self.templates.filter(&|template| template.is_featured)
    }

    pub fn by_type(&self, template_type: TemplateType) -> Vec<MarketplaceTemplate> {
        self.templates
            .filter(&|template| template.template_type == template_type)
    }

    pub fn by_category(&self, category: &str) -> Vec<MarketplaceTemplate> {
        self.templates.filter(&|template| template.category == category)
    }

    pub fn by_author(&self, author_id: &str) -> Vec<MarketplaceTemplate> {
        self.templates.filter(&|template| template.author.id == author_id)
    }

    pub fn search(&self, query: &str) -> Vec<MarketplaceTemplate> {
        self.templates.search(query)
    }

    pub fn reviews_for(&self, template_id: &str) -> Vec<TemplateReview> {
        self.reviews.filter(&|review| review.template_id == template_id)
    }

    pub fn collections(&self) -> Vec<TemplateCollection> {
        self.collections.list()
    }

    pub fn categories(&self) -> Vec<String> {
        unique_in_order(self.templates.list().into_iter().map(|t| t.category))
    }

    /// Most downloaded first
    pub fn popular(&self) -> Vec<MarketplaceTemplate> {
        let mut templates = self.templates.list();
        templates.sort_by(|a, b| b.stats.downloads.cmp(&a.stats.downloads));
        templates.truncate(RANKING_LIMIT);
        templates
    }

    /// Highest rated first
    pub fn top_rated(&self) -> Vec<MarketplaceTemplate> {
        let mut templates = self.templates.list();
        templates.sort_by(|a, b| b.stats.rating.total_cmp(&a.stats.rating));
        templates.truncate(RANKING_LIMIT);
        templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn ids(templates: Vec<MarketplaceTemplate>) -> Vec<String> {
        templates.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn rankings_sort_by_downloads_and_rating() {
        let catalog = seed::load().unwrap().templates;
        assert_eq!(
            ids(catalog.popular()),
            vec!["template-3", "template-1", "template-2", "template-4"]
        );
        assert_eq!(
            ids(catalog.top_rated()),
            vec!["template-1", "template-4", "template-2", "template-3"]
        );
        // Rankings never reorder the store
        assert_eq!(ids(catalog.list())[0], "template-1");
    }

    #[test]
    fn type_and_author_filters() {
        let catalog = seed::load().unwrap().templates;
        assert_eq!(ids(catalog.by_type(TemplateType::Workflow)), vec!["template-2"]);
        assert_eq!(ids(catalog.by_author("author-1")), vec!["template-1"]);
        assert_eq!(TemplateType::parse("Agent"), Some(TemplateType::Agent));
    }

    #[test]
    fn featured_search_and_reviews() {
        let catalog = seed::load().unwrap().templates;
        assert_eq!(ids(catalog.featured()), vec!["template-1", "template-4"]);
        assert_eq!(ids(catalog.search("webhooks")), vec!["template-4"]);
        assert_eq!(catalog.reviews_for("template-1").len(), 1);
        assert!(catalog.reviews_for("template-3").is_empty());
    }
}
