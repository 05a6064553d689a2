/// Workflow generator
///
/// Turns a natural-language description into an n8n workflow:
/// - keyword analysis picks the category, trigger and integrations
/// - the best-scoring template from the verified library is instantiated
/// - typed placeholder substitution fills in node names, types and parameters
///
/// Every generated workflow passes the same DAG validation as catalog workflows.

use crate::workflow::{validate_workflow, Complexity, N8nWorkflow, TriggerFamily};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

// Closed placeholder set and substitution pass
pub mod placeholders;

// Verified template library
pub mod templates;

pub use placeholders::{Placeholder, SubstitutionMap};
pub use templates::{TemplateLibrary, WorkflowTemplate};

const DEFAULT_CATEGORY: &str = "automation";
const DEFAULT_TRIGGER: &str = "webhook";
const FALLBACK_NAME: &str = "Generated Workflow";
const NAME_WORDS: usize = 4;
const SECONDS_PER_NODE: f64 = 2.0;

/// Category keyword table; earlier rows win
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("notifications", &["notify", "alert", "email", "slack", "message", "send"]),
    ("data-processing", &["process", "transform", "csv", "data", "parse", "clean"]),
    ("api-integration", &["api", "connect", "sync", "integrate", "webhook"]),
    ("automation", &["automate", "schedule", "trigger", "workflow"]),
    ("monitoring", &["monitor", "check", "health", "status", "uptime"]),
    ("content-management", &["content", "publish", "newsletter", "blog", "cms"]),
];

const TRIGGER_KEYWORDS: &[(&str, &[&str])] = &[
    ("webhook", &["webhook", "receive", "incoming", "post", "trigger"]),
    ("schedule", &["daily", "weekly", "hourly", "schedule", "cron", "every"]),
    ("manual", &["manual", "button", "click", "run"]),
];

const INTEGRATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("slack", &["slack"]),
    ("email", &["email", "smtp", "send"]),
    ("github", &["github", "git"]),
    ("database", &["database", "postgres", "mysql", "store"]),
    ("google", &["google", "drive", "sheets"]),
    ("hubspot", &["hubspot", "crm"]),
];

/// Lowercase with spaces replaced by hyphens ("Data Processing" -> "data-processing")
pub fn slug(value: &str) -> String {
    value.trim().to_lowercase().replace(' ', "-")
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGenerationRequest {
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    /// "webhook", "schedule" or "manual"
    #[serde(default)]
    pub trigger_type: Option<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub complexity: Option<Complexity>,
}

impl WorkflowGenerationRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

/// What the generator understood from a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAnalysis {
    pub detected_category: String,
    pub detected_trigger: String,
    pub required_integrations: Vec<String>,
    pub complexity: Complexity,
    /// Lowercased description tokens
    pub keywords: Vec<String>,
    pub intent: String,
}

impl WorkflowAnalysis {
    pub fn category_slug(&self) -> String {
        slug(&self.detected_category)
    }

    fn trigger_family(&self) -> Option<TriggerFamily> {
        match self.detected_trigger.as_str() {
            "webhook" => Some(TriggerFamily::Webhook),
            "schedule" => Some(TriggerFamily::Schedule),
            _ => None,
        }
    }
}

fn first_match(table: &[(&'static str, &[&str])], words: &[String]) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| words.iter().any(|w| w == k)))
        .map(|(name, _)| *name)
}

pub fn analyze_request(request: &WorkflowGenerationRequest) -> WorkflowAnalysis {
    let keywords: Vec<String> = request
        .description
        .to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect();

    let detected_category = non_blank(&request.category)
        .or_else(|| first_match(CATEGORY_KEYWORDS, &keywords).map(String::from))
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let detected_trigger = non_blank(&request.trigger_type)
        .map(|trigger| trigger.to_lowercase())
        .or_else(|| first_match(TRIGGER_KEYWORDS, &keywords).map(String::from))
        .unwrap_or_else(|| DEFAULT_TRIGGER.to_string());

    let mut required_integrations: Vec<String> = Vec::new();
    let requested = request.integrations.iter().map(|i| i.trim().to_lowercase());
    let detected = INTEGRATION_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|k| keywords.iter().any(|w| w == k)))
        .map(|(name, _)| name.to_string());
    for integration in requested.chain(detected) {
        if !integration.is_empty() && !required_integrations.contains(&integration) {
            required_integrations.push(integration);
        }
    }

    let complexity = request.complexity.unwrap_or_else(|| {
        let (words, integrations) = (keywords.len(), required_integrations.len());
        if words < 10 && integrations <= 1 {
            Complexity::Basic
        } else if words > 30 || integrations > 3 {
            Complexity::Advanced
        } else {
            Complexity::Intermediate
        }
    });

    WorkflowAnalysis {
        detected_category,
        detected_trigger,
        required_integrations,
        complexity,
        keywords,
        intent: request.description.clone(),
    }
}

fn category_matches(template: &WorkflowTemplate, analysis: &WorkflowAnalysis) -> bool {
    template.category_slug().contains(&analysis.category_slug())
}

fn score(template: &WorkflowTemplate, analysis: &WorkflowAnalysis) -> u32 {
    let mut score = 0;
    if category_matches(template, analysis) {
        score += 50;
    }
    if let (Some(template_family), Some(wanted)) = (template.trigger_family(), analysis.trigger_family()) {
        if template_family == wanted {
            score += 30;
        }
    }
    for integration in &analysis.required_integrations {
        if template
            .variables
            .iter()
            .any(|variable| variable.to_lowercase().contains(integration.as_str()))
        {
            score += 10;
        }
    }
    score
}

/// "N seconds" below a minute, otherwise rounded minutes
pub fn estimate_run_time(complexity: Complexity, node_count: usize) -> String {
    let total = (node_count as f64 * SECONDS_PER_NODE * complexity.run_time_multiplier()).round() as u64;
    if total < 60 {
        format!("{} seconds", total)
    } else {
        format!("{} minutes", (total as f64 / 60.0).round() as u64)
    }
}

fn workflow_name(description: &str) -> String {
    let words: Vec<String> = description
        .split_whitespace()
        .take(NAME_WORDS)
        .map(capitalize)
        .collect();
    if words.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        words.join(" ")
    }
}

fn workflow_tags(analysis: &WorkflowAnalysis) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let candidates = [analysis.detected_category.to_lowercase(), analysis.detected_trigger.clone()]
        .into_iter()
        .chain(analysis.required_integrations.iter().cloned());
    for tag in candidates {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn confidence(analysis: &WorkflowAnalysis, template: &WorkflowTemplate) -> u32 {
    let mut confidence: i32 = 60;
    if analysis.category_slug() != DEFAULT_CATEGORY {
        confidence += 15;
    }
    confidence += (analysis.required_integrations.len() as i32 * 5).min(20);
    if category_matches(template, analysis) {
        confidence += 15;
    }
    if analysis.keywords.len() < 5 {
        confidence -= 10;
    }
    confidence.clamp(40, 90) as u32
}

fn explanation(workflow: &N8nWorkflow, template: &WorkflowTemplate, analysis: &WorkflowAnalysis) -> String {
    let integrations = if analysis.required_integrations.is_empty() {
        "none specified".to_string()
    } else {
        analysis.required_integrations.join(", ")
    };
    format!(
        "Generated a {} {} workflow using the \"{}\" template. The workflow includes {} nodes and is triggered by {}. It incorporates {} integrations: {}.",
        workflow.complexity.as_str().to_lowercase(),
        workflow.category.to_lowercase(),
        template.name,
        workflow.node_count,
        workflow.trigger_type.to_lowercase(),
        analysis.required_integrations.len(),
        integrations
    )
}

fn suggestions(workflow: &N8nWorkflow, analysis: &WorkflowAnalysis) -> Vec<String> {
    let mut suggestions = Vec::new();
    if analysis.required_integrations.is_empty() {
        suggestions.push("Consider adding specific integrations (Slack, email, database) for better functionality");
    }
    if workflow.node_count < 3 {
        suggestions.push("Add error handling and logging nodes for production use");
    }
    if analysis.complexity == Complexity::Basic {
        suggestions.push("Consider adding data validation and transformation steps");
    }
    suggestions.push("Test the workflow with sample data before deploying to production");
    suggestions.push("Add monitoring and alerting for workflow failures");
    suggestions.into_iter().map(String::from).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkflow {
    pub workflow: N8nWorkflow,
    pub explanation: String,
    pub suggestions: Vec<String>,
    /// 40..=90
    pub confidence: u32,
    pub template_used: Vec<String>,
    pub analysis: WorkflowAnalysis,
}

/// Generator over a verified template library
#[derive(Debug, Clone)]
pub struct WorkflowGenerator {
    library: TemplateLibrary,
}

impl WorkflowGenerator {
    pub fn new(library: TemplateLibrary) -> Self {
        Self { library }
    }

    pub fn embedded() -> Result<Self> {
        Ok(Self::new(TemplateLibrary::embedded()?))
    }

    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Highest score wins; ties go to the smallest template id
    pub fn select_template(&self, analysis: &WorkflowAnalysis) -> Option<(&WorkflowTemplate, u32)> {
        self.library
            .templates()
            .iter()
            .map(|template| (template, score(template, analysis)))
            .reduce(|best, candidate| {
                if candidate.1 > best.1 || (candidate.1 == best.1 && candidate.0.id < best.0.id) {
                    candidate
                } else {
                    best
                }
            })
    }

    fn instantiate(&self, template: &WorkflowTemplate, analysis: &WorkflowAnalysis) -> N8nWorkflow {
        let substitutions = SubstitutionMap::for_analysis(analysis);
        let pattern = self.library.pattern();
        let nodes: Vec<_> = template
            .nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                node.name = substitutions.substitute_text(&node.name, pattern);
                node.node_type = substitutions.substitute_text(&node.node_type, pattern);
                node.parameters = substitutions.substitute_value(&node.parameters, pattern);
                node
            })
            .collect();

        let now = Utc::now();
        N8nWorkflow {
            id: format!("generated-{}", now.timestamp_millis()),
            name: workflow_name(&analysis.intent),
            description: analysis.intent.clone(),
            category: capitalize(&analysis.detected_category),
            tags: workflow_tags(analysis),
            node_count: nodes.len(),
            estimated_run_time: estimate_run_time(analysis.complexity, nodes.len()),
            nodes,
            connections: template.connections.clone(),
            version: "1.0".to_string(),
            last_updated: now.format("%Y-%m-%d").to_string(),
            complexity: analysis.complexity,
            author: "AI Generator".to_string(),
            use_case: analysis.intent.clone(),
            trigger_type: capitalize(&analysis.detected_trigger),
        }
    }

    pub fn generate(&self, request: &WorkflowGenerationRequest) -> Result<GeneratedWorkflow> {
        let analysis = analyze_request(request);
        let (template, template_score) = self
            .select_template(&analysis)
            .context("Workflow template library is empty")?;
        tracing::debug!(
            "🔍 Category '{}', trigger '{}' -> template {} (score {})",
            analysis.detected_category,
            analysis.detected_trigger,
            template.id,
            template_score
        );

        let workflow = self.instantiate(template, &analysis);
        validate_workflow(&workflow)
            .with_context(|| format!("Generated workflow from template {} is invalid", template.id))?;

        let generated = GeneratedWorkflow {
            explanation: explanation(&workflow, template, &analysis),
            suggestions: suggestions(&workflow, &analysis),
            confidence: confidence(&analysis, template),
            template_used: vec![template.name.clone()],
            workflow,
            analysis,
        };
        tracing::info!(
            "✅ Generated workflow {} ({} nodes, confidence {})",
            generated.workflow.id,
            generated.workflow.node_count,
            generated.confidence
        );
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use regex::Regex;
    use serde_json::json;

    fn generator() -> WorkflowGenerator {
        WorkflowGenerator::embedded().unwrap()
    }

    #[test]
    fn slack_github_request_picks_notification_template() {
        let generator = generator();
        let request = WorkflowGenerationRequest::new("send a slack message when a new github issue is created");
        let analysis = analyze_request(&request);
        assert_eq!(analysis.detected_category, "notifications");
        assert_eq!(analysis.detected_trigger, "webhook");
        assert_eq!(analysis.required_integrations, vec!["slack", "email", "github"]);
        assert_eq!(analysis.complexity, Complexity::Intermediate);

        let (template, score) = generator.select_template(&analysis).unwrap();
        assert_eq!(template.id, "webhook-notification");
        assert_eq!(score, 80);

        let generated = generator.generate(&request).unwrap();
        let workflow = &generated.workflow;
        assert_eq!(workflow.name, "Send A Slack Message");
        assert_eq!(workflow.category, "Notifications");
        assert_eq!(workflow.trigger_type, "Webhook");
        assert_eq!(workflow.tags, vec!["notifications", "webhook", "slack", "email", "github"]);
        assert_eq!(workflow.estimated_run_time, "6 seconds");
        assert_eq!(workflow.author, "AI Generator");
        assert!(workflow.id.starts_with("generated-"));
        assert_eq!(workflow.nodes[1].node_type, "n8n-nodes-base.slack");
        assert_eq!(
            workflow.nodes[0].parameters,
            json!({ "httpMethod": "POST", "path": "send-a-slack-message" })
        );
        assert_eq!(workflow.nodes[1].parameters["channel"], "#general");
        assert_eq!(generated.confidence, 90);
        assert_eq!(generated.template_used, vec!["Webhook to Notification"]);
        assert_eq!(
            generated.explanation,
            "Generated a intermediate notifications workflow using the \"Webhook to Notification\" template. \
             The workflow includes 2 nodes and is triggered by webhook. \
             It incorporates 3 integrations: slack, email, github."
        );
    }

    #[test]
    fn scheduled_data_request_gets_structured_parameters() {
        let generated = generator()
            .generate(&WorkflowGenerationRequest::new("process csv data daily and store in database"))
            .unwrap();
        let workflow = &generated.workflow;

        assert_eq!(generated.template_used, vec!["Scheduled Data Processing"]);
        assert_eq!(workflow.category, "Data-processing");
        assert_eq!(workflow.complexity, Complexity::Basic);
        assert_eq!(workflow.estimated_run_time, "8 seconds");
        assert_eq!(workflow.nodes[0].parameters, json!({ "rule": "0 9 * * *" }));
        assert_eq!(workflow.nodes[1].node_type, "n8n-nodes-base.postgres");
        assert_eq!(workflow.nodes[1].parameters["operation"], "executeQuery");
        assert_eq!(workflow.nodes[3].parameters, json!({ "operation": "insert", "table": "processed_data" }));
        assert_eq!(generated.confidence, 90);
    }

    #[test]
    fn explicit_request_fields_override_detection() {
        let request = WorkflowGenerationRequest {
            description: "move records between systems".to_string(),
            category: Some("API Integration".to_string()),
            trigger_type: Some("manual".to_string()),
            integrations: vec!["HubSpot".to_string()],
            complexity: Some(Complexity::Advanced),
        };
        let generated = generator().generate(&request).unwrap();
        let workflow = &generated.workflow;

        assert_eq!(generated.template_used, vec!["API Integration"]);
        assert_eq!(generated.analysis.detected_category, "API Integration");
        assert_eq!(workflow.category, "API Integration");
        assert_eq!(workflow.tags[0], "api integration");
        assert_eq!(workflow.complexity, Complexity::Advanced);
        assert_eq!(workflow.trigger_type, "Manual");
        assert_eq!(workflow.nodes[0].name, "Manual Trigger");
        assert_eq!(workflow.nodes[0].node_type, "n8n-nodes-base.manualTrigger");
        assert_eq!(workflow.nodes[0].parameters, json!({}));
        assert_eq!(workflow.nodes[3].parameters["url"], "https://api.hubapi.com/crm/v3/objects/contacts");
        assert_eq!(workflow.nodes[3].parameters["body"], "={{$json}}");
        assert_eq!(workflow.estimated_run_time, "16 seconds");
    }

    #[test]
    fn empty_description_still_generates() {
        let generated = generator().generate(&WorkflowGenerationRequest::new("")).unwrap();
        assert_eq!(generated.workflow.name, "Generated Workflow");
        assert_eq!(generated.analysis.detected_category, "automation");
        assert_eq!(generated.template_used, vec!["Webhook to Notification"]);
        assert_eq!(generated.confidence, 50);
        assert_eq!(generated.workflow.nodes[0].parameters["path"], "webhook");
    }

    #[test]
    fn no_residual_placeholders_for_any_combination() {
        let generator = generator();
        let residual = Regex::new(r"\{\{[A-Z][A-Z0-9_]*\}\}").unwrap();
        let categories = [None, Some("notifications"), Some("data-processing"), Some("api-integration"), Some("monitoring")];
        let triggers = [None, Some("webhook"), Some("schedule"), Some("manual")];
        let integration_sets: [&[&str]; 4] = [&[], &["slack"], &["email", "google"], &["database", "github", "hubspot"]];

        for category in categories {
            for trigger in triggers {
                for integrations in integration_sets {
                    let request = WorkflowGenerationRequest {
                        description: "sync data every day".to_string(),
                        category: category.map(String::from),
                        trigger_type: trigger.map(String::from),
                        integrations: integrations.iter().map(|i| i.to_string()).collect(),
                        complexity: None,
                    };
                    let generated = generator.generate(&request).unwrap();
                    let workflow = &generated.workflow;
                    assert_eq!(workflow.node_count, workflow.nodes.len());
                    assert!((40..=90).contains(&generated.confidence));
                    for node in &workflow.nodes {
                        let rendered = format!("{} {} {}", node.name, node.node_type, node.parameters);
                        assert!(!residual.is_match(&rendered), "residual token in {}", rendered);
                    }
                }
            }
        }
    }

    #[test]
    fn score_ties_resolve_to_smallest_id() {
        let mut templates = TemplateLibrary::embedded().unwrap().templates().to_vec();
        let mut twin = templates[0].clone();
        twin.id = "a-webhook-notification".to_string();
        templates.push(twin);
        let generator = WorkflowGenerator::new(TemplateLibrary::new(templates).unwrap());

        let analysis = analyze_request(&WorkflowGenerationRequest::new("notify me"));
        let (template, _) = generator.select_template(&analysis).unwrap();
        assert_eq!(template.id, "a-webhook-notification");
    }

    #[test]
    fn run_time_switches_to_minutes() {
        assert_eq!(estimate_run_time(Complexity::Basic, 2), "4 seconds");
        assert_eq!(estimate_run_time(Complexity::Advanced, 20), "1 minutes");
        assert_eq!(estimate_run_time(Complexity::Advanced, 60), "4 minutes");
    }
}
