/// n8n workflow catalog

use crate::catalog::{unique_in_order, Record, Repository};
use crate::workflow::{N8nWorkflow, WorkflowCategory};
use std::sync::Arc;

impl Record for N8nWorkflow {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

impl Record for WorkflowCategory {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

pub struct WorkflowCatalog {
    workflows: Arc<dyn Repository<N8nWorkflow>>,
    categories: Arc<dyn Repository<WorkflowCategory>>,
}

impl WorkflowCatalog {
    pub fn new(
        workflows: Arc<dyn Repository<N8nWorkflow>>,
        categories: Arc<dyn Repository<WorkflowCategory>>,
    ) -> Self {
        Self {
            workflows,
            categories,
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<N8nWorkflow> {
        self.workflows.get_by_id(id)
    }

    pub fn list(&self) -> Vec<N8nWorkflow> {
        self.workflows.list()
    }

    pub fn search(&self, query: &str) -> Vec<N8nWorkflow> {
        self.workflows.search(query)
    }

    pub fn by_category(&self, category: &str) -> Vec<N8nWorkflow> {
        self.workflows
            .filter(&|workflow| workflow.category.eq_ignore_ascii_case(category))
    }

    pub fn unique_categories(&self) -> Vec<String> {
        unique_in_order(self.workflows.list().into_iter().map(|w| w.category))
    }

    pub fn unique_tags(&self) -> Vec<String> {
        unique_in_order(self.workflows.list().into_iter().flat_map(|w| w.tags))
    }

    pub fn categories(&self) -> Vec<WorkflowCategory> {
        self.categories.list()
    }
}
