/// Workflow template library
///
/// The three starter templates ship in `data/workflow_templates.json`. The
/// library is verified when it is built: every `{{TOKEN}}` must be a known
/// placeholder, the referenced tokens must match the declared variables and
/// each template graph must be a valid DAG.

use crate::lab::generator::placeholders::{token_pattern, tokens_in, Placeholder};
use crate::lab::generator::slug;
use crate::workflow::{validate_workflow, Complexity, Edge, N8nWorkflow, TriggerFamily, WorkflowNode};
use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

const WORKFLOW_TEMPLATES: &str = include_str!("../../../data/workflow_templates.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub nodes: Vec<WorkflowNode>,
    pub connections: Vec<Edge>,
    /// Placeholder names the template declares
    pub variables: Vec<String>,
}

impl WorkflowTemplate {
    pub fn category_slug(&self) -> String {
        slug(&self.category)
    }

    /// Family of the first webhook or cron node, before substitution
    pub fn trigger_family(&self) -> Option<TriggerFamily> {
        self.nodes.iter().find_map(WorkflowNode::trigger_family)
    }

    /// Placeholders referenced by node names, types and parameters
    fn referenced_placeholders(&self, pattern: &Regex) -> Result<BTreeSet<Placeholder>> {
        let mut tokens = Vec::new();
        for node in &self.nodes {
            tokens_in(&Value::String(node.name.clone()), pattern, &mut tokens);
            tokens_in(&Value::String(node.node_type.clone()), pattern, &mut tokens);
            tokens_in(&node.parameters, pattern, &mut tokens);
        }
        tokens
            .iter()
            .map(|token| {
                Placeholder::parse(token)
                    .ok_or_else(|| anyhow!("Template {} references unknown placeholder {}", self.id, token))
            })
            .collect()
    }

    fn declared_placeholders(&self) -> Result<BTreeSet<Placeholder>> {
        self.variables
            .iter()
            .map(|variable| {
                Placeholder::parse(variable)
                    .ok_or_else(|| anyhow!("Template {} declares unknown variable {}", self.id, variable))
            })
            .collect()
    }

    /// The template as a workflow, for structural validation
    fn skeleton(&self) -> N8nWorkflow {
        N8nWorkflow {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            tags: Vec::new(),
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            version: "1.0".to_string(),
            last_updated: String::new(),
            complexity: Complexity::Basic,
            author: String::new(),
            use_case: String::new(),
            estimated_run_time: String::new(),
            trigger_type: String::new(),
            node_count: self.nodes.len(),
        }
    }

    fn verify(&self, pattern: &Regex) -> Result<()> {
        let referenced = self.referenced_placeholders(pattern)?;
        let declared = self.declared_placeholders()?;
        if let Some(undeclared) = referenced.difference(&declared).next() {
            bail!("Template {} uses undeclared placeholder {}", self.id, undeclared);
        }
        if let Some(unused) = declared.difference(&referenced).next() {
            bail!("Template {} declares unused placeholder {}", self.id, unused);
        }
        validate_workflow(&self.skeleton()).with_context(|| format!("Template {} is not a valid workflow", self.id))?;
        Ok(())
    }
}

/// Verified, non-empty set of workflow templates
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<WorkflowTemplate>,
    pattern: Regex,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<WorkflowTemplate>) -> Result<Self> {
        if templates.is_empty() {
            bail!("Workflow template library is empty");
        }
        let pattern = token_pattern()?;
        {
            let mut ids = BTreeSet::new();
            for template in &templates {
                if !ids.insert(template.id.as_str()) {
                    bail!("Duplicate workflow template id: {}", template.id);
                }
                template.verify(&pattern)?;
            }
        }
        Ok(Self { templates, pattern })
    }

    /// Library built from the embedded starter templates
    pub fn embedded() -> Result<Self> {
        let templates: Vec<WorkflowTemplate> =
            serde_json::from_str(WORKFLOW_TEMPLATES).context("Failed to parse workflow templates")?;
        let library = Self::new(templates)?;
        tracing::info!("📥 Loaded {} workflow templates", library.templates.len());
        Ok(library)
    }

    pub fn templates(&self) -> &[WorkflowTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&WorkflowTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub(crate) fn pattern(&self) -> &Regex {
        &self.pattern
    }
}
