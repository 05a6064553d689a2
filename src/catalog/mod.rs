/// Catalog Layer
///
/// Read-mostly repositories over the embedded seed data. Every domain
/// (prompts, workflows, agents, APIs, integrations, marketplace templates,
/// teams, analytics) is exposed as a typed catalog holding
/// `Arc<dyn Repository<T>>`, so the seed-backed store can be swapped for a real
/// one without touching the API layer.

use std::collections::HashSet;
use std::sync::Arc;

// ArcSwap-backed repository implementation
pub mod store;

// Embedded seed data loading
pub mod seed;

// Per-domain catalogs
pub mod agents;
pub mod analytics;
pub mod apis;
pub mod integrations;
pub mod prompts;
pub mod teams;
pub mod templates;
pub mod workflows;

// Side-by-side comparison selection
pub mod compare;

pub use agents::{AgentCatalog, AgentConfig, AgentConfigError, AiAgent, AgentTemplate};
pub use analytics::AnalyticsCatalog;
pub use apis::ApiCatalog;
pub use compare::ComparisonSet;
pub use integrations::IntegrationCatalog;
pub use prompts::{PromptCatalog, PromptFilter, SystemPrompt};
pub use store::SeedRepository;
pub use teams::TeamCatalog;
pub use templates::TemplateCatalog;
pub use workflows::WorkflowCatalog;

/// A catalog entry addressable by id and searchable by free text
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Fields matched by [`Repository::search`]
    fn search_fields(&self) -> Vec<&str>;
}

/// Repository abstraction over a collection of records
///
/// Listing, search and filter results keep repository order.
pub trait Repository<T: Record>: Send + Sync {
    fn get_by_id(&self, id: &str) -> Option<T>;

    fn list(&self) -> Vec<T>;

    fn filter(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T>;

    /// Append a record; `false` when its id is already taken
    fn insert(&self, record: T) -> bool;

    /// Apply an in-place change to one record and return the updated value
    fn update(&self, id: &str, apply: &dyn Fn(&mut T)) -> Option<T>;

    /// Case-insensitive substring search over [`Record::search_fields`]
    ///
    /// An empty query matches every record.
    fn search(&self, query: &str) -> Vec<T> {
        let needle = query.trim().to_lowercase();
        self.filter(&|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
    }
}

/// All domain catalogs, cheap to clone
#[derive(Clone)]
pub struct Catalog {
    pub prompts: Arc<PromptCatalog>,
    pub workflows: Arc<WorkflowCatalog>,
    pub agents: Arc<AgentCatalog>,
    pub apis: Arc<ApiCatalog>,
    pub integrations: Arc<IntegrationCatalog>,
    pub templates: Arc<TemplateCatalog>,
    pub teams: Arc<TeamCatalog>,
    pub analytics: Arc<AnalyticsCatalog>,
}

/// Distinct values in first-seen order
pub(crate) fn unique_in_order<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_keeps_first_occurrence_order() {
        let values = ["b", "a", "b", "c", "a"].iter().map(|s| s.to_string());
        assert_eq!(unique_in_order(values), vec!["b", "a", "c"]);
    }
}
