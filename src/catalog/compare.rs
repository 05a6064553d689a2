/// Side-by-side comparison of prompts and workflows
///
/// A comparison holds at most three distinct ids in selection order.

use crate::catalog::prompts::PromptCatalog;
use crate::catalog::workflows::WorkflowCatalog;
use crate::workflow::Complexity;
use serde::Serialize;

pub const MAX_COMPARED: usize = 3;

/// Ordered, de-duplicated selection capped at [`MAX_COMPARED`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSet {
    ids: Vec<String>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a caller list; duplicates and overflow are dropped
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for id in ids {
            set.add(id);
        }
        set
    }

    /// Returns false when already selected or full
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id.is_empty() || self.is_selected(&id) || !self.can_add_more() {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    pub fn can_add_more(&self) -> bool {
        self.ids.len() < MAX_COMPARED
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSummary {
    pub id: String,
    pub name: String,
    pub tool: String,
    pub category: String,
    pub description: String,
    pub word_count: u32,
    pub complexity: Complexity,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub node_count: usize,
    pub trigger_type: String,
    pub complexity: Complexity,
}

/// Resolved comparison; unknown ids are listed in `missing`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<T> {
    pub items: Vec<T>,
    pub missing: Vec<String>,
}

pub fn compare_prompts(catalog: &PromptCatalog, selection: &ComparisonSet) -> Comparison<PromptSummary> {
    let mut items = Vec::new();
    let mut missing = Vec::new();
    for id in selection.ids() {
        match catalog.get_by_id(id) {
            Some(prompt) => items.push(PromptSummary {
                id: prompt.id,
                name: prompt.name,
                tool: prompt.tool,
                category: prompt.category,
                description: prompt.description,
                word_count: prompt.word_count,
                complexity: prompt.complexity,
                tags: prompt.tags,
            }),
            None => missing.push(id.clone()),
        }
    }
    Comparison { items, missing }
}

pub fn compare_workflows(
    catalog: &WorkflowCatalog,
    selection: &ComparisonSet,
) -> Comparison<WorkflowSummary> {
    let mut items = Vec::new();
    let mut missing = Vec::new();
    for id in selection.ids() {
        match catalog.get_by_id(id) {
            Some(workflow) => items.push(WorkflowSummary {
                id: workflow.id,
                name: workflow.name,
                category: workflow.category,
                description: workflow.description,
                node_count: workflow.node_count,
                trigger_type: workflow.trigger_type,
                complexity: workflow.complexity,
            }),
            None => missing.push(id.clone()),
        }
    }
    Comparison { items, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    #[test]
    fn selection_dedups_and_caps_at_three() {
        let mut set = ComparisonSet::new();
        assert!(set.add("a"));
        assert!(!set.add("a"));
        assert!(set.add("b"));
        assert!(set.add("c"));
        assert!(!set.can_add_more());
        assert!(!set.add("d"));
        assert_eq!(set.ids(), ["a", "b", "c"]);

        assert!(set.remove("b"));
        assert!(!set.is_selected("b"));
        assert!(set.can_add_more());
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_ids_are_reported_missing() {
        let catalog = seed::load().unwrap();
        let set = ComparisonSet::from_ids(["v0-main", "ghost", "claude-main", "devin-main"]);
        let comparison = compare_prompts(&catalog.prompts, &set);

        let ids: Vec<_> = comparison.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["v0-main", "claude-main"]);
        assert_eq!(comparison.missing, vec!["ghost"]);
    }

    #[test]
    fn workflow_summaries_carry_node_counts() {
        let catalog = seed::load().unwrap();
        let set = ComparisonSet::from_ids(["csv-data-processing"]);
        let comparison = compare_workflows(&catalog.workflows, &set);
        assert_eq!(comparison.items[0].node_count, 5);
        assert!(comparison.missing.is_empty());
    }
}
