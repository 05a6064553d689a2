/// Third-party API service directory

use crate::catalog::{unique_in_order, Record, Repository};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const POPULAR_LIMIT: usize = 6;

/// A documented third-party API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub provider: String,
    pub base_url: String,
    pub auth_type: String,
    pub pricing: String,
    pub rate_limit: String,
    pub documentation: String,
    /// Endpoint reference documents, passed through as published
    #[serde(default)]
    pub endpoints: Vec<Value>,
    pub tags: Vec<String>,
    pub popularity: u32,
    pub last_updated: String,
    pub status: String,
    pub integration_complexity: String,
}

impl Record for ApiService {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

/// A ready-made agent integration built on an API service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIntegration {
    pub id: String,
    pub api_id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_template: Option<String>,
    pub setup_instructions: Vec<String>,
    pub required_credentials: Vec<String>,
    pub is_popular: bool,
}

impl Record for ApiIntegration {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

pub struct ApiCatalog {
    services: Arc<dyn Repository<ApiService>>,
    integrations: Arc<dyn Repository<ApiIntegration>>,
}

impl ApiCatalog {
    pub fn new(
        services: Arc<dyn Repository<ApiService>>,
        integrations: Arc<dyn Repository<ApiIntegration>>,
    ) -> Self {
        Self {
            services,
            integrations,
        }
    }

    pub fn list(&self) -> Vec<ApiService> {
        self.services.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<ApiService> {
        self.services.get_by_id(id)
    }

    pub fn by_category(&self, category: &str) -> Vec<ApiService> {
        self.services.filter(&|service| service.category == category)
    }

    pub fn search(&self, query: &str) -> Vec<ApiService> {
        self.services.search(query)
    }

    /// Top services by popularity; the stored order is left untouched
    pub fn popular(&self) -> Vec<ApiService> {
        let mut services = self.services.list();
        services.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        services.truncate(POPULAR_LIMIT);
        services
    }

    pub fn categories(&self) -> Vec<String> {
        unique_in_order(self.services.list().into_iter().map(|s| s.category))
    }

    pub fn integrations(&self) -> Vec<ApiIntegration> {
        self.integrations.list()
    }

    pub fn integrations_for(&self, api_id: &str) -> Vec<ApiIntegration> {
        self.integrations
            .filter(&|integration| integration.api_id == api_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::seed;

    #[test]
    fn popular_sorts_without_reordering_the_store() {
        let catalog = seed::load().unwrap().apis;
        let before: Vec<_> = catalog.list().into_iter().map(|s| s.id).collect();
        let popular: Vec<_> = catalog.popular().into_iter().map(|s| s.id).collect();

        assert_eq!(popular, vec!["openai-api", "github-api", "stripe-api", "slack-api"]);
        let after: Vec<_> = catalog.list().into_iter().map(|s| s.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn integrations_filter_by_api() {
        let catalog = seed::load().unwrap().apis;
        let hits = catalog.integrations_for("stripe-api");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "stripe-payment-workflow");
        assert!(catalog.integrations_for("slack-api").is_empty());
    }
}
