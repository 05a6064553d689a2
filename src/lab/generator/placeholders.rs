/// Typed `{{PLACEHOLDER}}` substitution
///
/// Every token a workflow template may reference is a [`Placeholder`]. A
/// [`SubstitutionMap`] resolves all of them for one request, and a single
/// generic pass rewrites node names, types and parameters. Only upper-case
/// tokens are substituted; n8n runtime expressions like `={{$json}}` pass
/// through untouched.

use crate::lab::generator::WorkflowAnalysis;
use anyhow::Result;
use regex::{Captures, Regex};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;

const TOKEN_PATTERN: &str = r"\{\{([A-Z][A-Z0-9_]*)\}\}";
const WEBHOOK_PATH_CHARS: usize = 20;
const MESSAGE_EXCERPT_CHARS: usize = 50;
const DAILY_AT_NINE: &str = "0 9 * * *";
const TRANSFORM_CODE: &str =
    "return items.map(item => ({ json: { ...item.json, processedAt: new Date().toISOString() } }));";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    WebhookPath,
    NotificationType,
    Channel,
    MessageTemplate,
    CronSchedule,
    DataSourceType,
    DataSourceParams,
    TransformationCode,
    StorageType,
    StorageParams,
    TriggerName,
    TriggerType,
    TriggerParams,
    SourceApiUrl,
    TransformationLogic,
    TargetApiUrl,
}

impl Placeholder {
    pub const ALL: [Placeholder; 16] = [
        Placeholder::WebhookPath,
        Placeholder::NotificationType,
        Placeholder::Channel,
        Placeholder::MessageTemplate,
        Placeholder::CronSchedule,
        Placeholder::DataSourceType,
        Placeholder::DataSourceParams,
        Placeholder::TransformationCode,
        Placeholder::StorageType,
        Placeholder::StorageParams,
        Placeholder::TriggerName,
        Placeholder::TriggerType,
        Placeholder::TriggerParams,
        Placeholder::SourceApiUrl,
        Placeholder::TransformationLogic,
        Placeholder::TargetApiUrl,
    ];

    /// Token name as written between the braces
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::WebhookPath => "WEBHOOK_PATH",
            Placeholder::NotificationType => "NOTIFICATION_TYPE",
            Placeholder::Channel => "CHANNEL",
            Placeholder::MessageTemplate => "MESSAGE_TEMPLATE",
            Placeholder::CronSchedule => "CRON_SCHEDULE",
            Placeholder::DataSourceType => "DATA_SOURCE_TYPE",
            Placeholder::DataSourceParams => "DATA_SOURCE_PARAMS",
            Placeholder::TransformationCode => "TRANSFORMATION_CODE",
            Placeholder::StorageType => "STORAGE_TYPE",
            Placeholder::StorageParams => "STORAGE_PARAMS",
            Placeholder::TriggerName => "TRIGGER_NAME",
            Placeholder::TriggerType => "TRIGGER_TYPE",
            Placeholder::TriggerParams => "TRIGGER_PARAMS",
            Placeholder::SourceApiUrl => "SOURCE_API_URL",
            Placeholder::TransformationLogic => "TRANSFORMATION_LOGIC",
            Placeholder::TargetApiUrl => "TARGET_API_URL",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|placeholder| placeholder.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

/// Matcher for `{{UPPER_CASE}}` tokens
pub fn token_pattern() -> Result<Regex> {
    Ok(Regex::new(TOKEN_PATTERN)?)
}

/// Token names referenced anywhere in `value`, in order of appearance
pub fn tokens_in(value: &Value, pattern: &Regex, found: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for captures in pattern.captures_iter(text) {
                found.push(captures[1].to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|item| tokens_in(item, pattern, found)),
        Value::Object(fields) => fields.values().for_each(|field| tokens_in(field, pattern, found)),
        _ => {}
    }
}

fn has_integration(analysis: &WorkflowAnalysis, name: &str) -> bool {
    analysis.required_integrations.iter().any(|i| i == name)
}

fn has_keyword(analysis: &WorkflowAnalysis, keyword: &str) -> bool {
    analysis.keywords.iter().any(|k| k == keyword)
}

fn webhook_path(analysis: &WorkflowAnalysis) -> String {
    let slug = analysis.keywords.join("-");
    let path: String = slug.chars().take(WEBHOOK_PATH_CHARS).collect();
    if path.is_empty() {
        "webhook".to_string()
    } else {
        path
    }
}

fn cron_schedule(analysis: &WorkflowAnalysis) -> &'static str {
    if has_keyword(analysis, "daily") {
        DAILY_AT_NINE
    } else if has_keyword(analysis, "weekly") {
        "0 9 * * 1"
    } else if has_keyword(analysis, "hourly") {
        "0 * * * *"
    } else {
        DAILY_AT_NINE
    }
}

fn data_source_type(analysis: &WorkflowAnalysis) -> &'static str {
    if has_integration(analysis, "google") {
        "googleDrive"
    } else if has_integration(analysis, "database") {
        "postgres"
    } else {
        "httpRequest"
    }
}

fn storage_type(analysis: &WorkflowAnalysis) -> &'static str {
    if has_integration(analysis, "database") {
        "postgres"
    } else if has_integration(analysis, "google") {
        "googleSheets"
    } else {
        "postgres"
    }
}

fn source_api_url(analysis: &WorkflowAnalysis) -> &'static str {
    if has_integration(analysis, "github") {
        "https://api.github.com/repos"
    } else if has_integration(analysis, "google") {
        "https://www.googleapis.com/drive/v3/files"
    } else if has_integration(analysis, "hubspot") {
        "https://api.hubapi.com/crm/v3/objects/contacts"
    } else {
        "https://api.example.com/source"
    }
}

fn target_api_url(analysis: &WorkflowAnalysis) -> &'static str {
    if has_integration(analysis, "hubspot") {
        "https://api.hubapi.com/crm/v3/objects/contacts"
    } else if has_integration(analysis, "slack") {
        "https://slack.com/api/chat.postMessage"
    } else {
        "https://api.example.com/target"
    }
}

fn resolve(placeholder: Placeholder, analysis: &WorkflowAnalysis) -> Value {
    match placeholder {
        Placeholder::WebhookPath => json!(webhook_path(analysis)),
        Placeholder::NotificationType => {
            // Email only wins when Slack is absent
            if !has_integration(analysis, "slack") && has_integration(analysis, "email") {
                json!("emailSend")
            } else {
                json!("slack")
            }
        }
        Placeholder::Channel => json!(match analysis.category_slug().as_str() {
            "monitoring" => "#alerts",
            "data-processing" => "#data",
            "api-integration" => "#integrations",
            _ => "#general",
        }),
        Placeholder::MessageTemplate => {
            let excerpt: String = analysis.intent.chars().take(MESSAGE_EXCERPT_CHARS).collect();
            json!(format!("Workflow triggered: {}...", excerpt))
        }
        Placeholder::CronSchedule => json!(cron_schedule(analysis)),
        Placeholder::DataSourceType => json!(data_source_type(analysis)),
        Placeholder::DataSourceParams => match data_source_type(analysis) {
            "googleDrive" => json!({ "operation": "list", "folderId": "root" }),
            "postgres" => json!({ "operation": "executeQuery", "query": "SELECT * FROM source_data" }),
            _ => json!({ "url": source_api_url(analysis), "method": "GET" }),
        },
        Placeholder::TransformationCode | Placeholder::TransformationLogic => json!(TRANSFORM_CODE),
        Placeholder::StorageType => json!(storage_type(analysis)),
        Placeholder::StorageParams => match storage_type(analysis) {
            "googleSheets" => json!({ "operation": "append", "range": "A:Z" }),
            _ => json!({ "operation": "insert", "table": "processed_data" }),
        },
        Placeholder::TriggerName => json!(match analysis.detected_trigger.as_str() {
            "webhook" => "Webhook Trigger",
            "schedule" => "Schedule Trigger",
            "manual" => "Manual Trigger",
            _ => "Trigger",
        }),
        Placeholder::TriggerType => json!(match analysis.detected_trigger.as_str() {
            "schedule" => "cron",
            "manual" => "manualTrigger",
            _ => "webhook",
        }),
        Placeholder::TriggerParams => match analysis.detected_trigger.as_str() {
            "schedule" => json!({ "rule": cron_schedule(analysis) }),
            "manual" => Value::Object(Map::new()),
            _ => json!({ "httpMethod": "POST", "path": webhook_path(analysis) }),
        },
        Placeholder::SourceApiUrl => json!(source_api_url(analysis)),
        Placeholder::TargetApiUrl => json!(target_api_url(analysis)),
    }
}

/// Resolved value for every placeholder of one generation request
#[derive(Debug, Clone)]
pub struct SubstitutionMap {
    values: HashMap<Placeholder, Value>,
}

impl SubstitutionMap {
    pub fn for_analysis(analysis: &WorkflowAnalysis) -> Self {
        let values = Placeholder::ALL
            .into_iter()
            .map(|placeholder| (placeholder, resolve(placeholder, analysis)))
            .collect();
        Self { values }
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&Value> {
        self.values.get(&placeholder)
    }

    /// Replace tokens inside `text`; structured values are inlined as JSON
    pub fn substitute_text(&self, text: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(text, |captures: &Captures| {
                match Placeholder::parse(&captures[1]).and_then(|p| self.get(p)) {
                    Some(Value::String(value)) => value.clone(),
                    Some(value) => value.to_string(),
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Rewrite every string in `value`
    ///
    /// A string that is exactly one placeholder takes the resolved value as is,
    /// so `"{{STORAGE_PARAMS}}"` becomes a parameter object.
    pub fn substitute_value(&self, value: &Value, pattern: &Regex) -> Value {
        match value {
            Value::String(text) => {
                if let Some(captures) = pattern.captures(text) {
                    if captures[0].len() == text.len() {
                        if let Some(resolved) = Placeholder::parse(&captures[1]).and_then(|p| self.get(p)) {
                            return resolved.clone();
                        }
                    }
                }
                Value::String(self.substitute_text(text, pattern))
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.substitute_value(item, pattern))
                    .collect(),
            ),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, field)| (key.clone(), self.substitute_value(field, pattern)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Complexity;
    use pretty_assertions::assert_eq;

    fn analysis(description: &str, trigger: &str, integrations: &[&str]) -> WorkflowAnalysis {
        WorkflowAnalysis {
            detected_category: "notifications".to_string(),
            detected_trigger: trigger.to_string(),
            required_integrations: integrations.iter().map(|i| i.to_string()).collect(),
            complexity: Complexity::Basic,
            keywords: description.to_lowercase().split_whitespace().map(String::from).collect(),
            intent: description.to_string(),
        }
    }

    #[test]
    fn every_placeholder_round_trips_its_name() {
        for placeholder in Placeholder::ALL {
            assert_eq!(Placeholder::parse(placeholder.name()), Some(placeholder));
        }
        assert_eq!(Placeholder::parse("NOT_A_TOKEN"), None);
        assert_eq!(Placeholder::CronSchedule.to_string(), "{{CRON_SCHEDULE}}");
    }

    #[test]
    fn text_substitution_preserves_runtime_expressions() {
        let pattern = token_pattern().unwrap();
        let map = SubstitutionMap::for_analysis(&analysis("Ping the team", "webhook", &["email"]));

        assert_eq!(
            map.substitute_text("n8n-nodes-base.{{NOTIFICATION_TYPE}}", &pattern),
            "n8n-nodes-base.emailSend"
        );
        assert_eq!(map.substitute_text("={{$json}}", &pattern), "={{$json}}");
        assert_eq!(map.substitute_text("{{UNKNOWN}}", &pattern), "{{UNKNOWN}}");
    }

    #[test]
    fn whole_token_strings_become_structured_values() {
        let pattern = token_pattern().unwrap();
        let map = SubstitutionMap::for_analysis(&analysis("sync nightly", "schedule", &["google"]));

        let params = map.substitute_value(&json!("{{STORAGE_PARAMS}}"), &pattern);
        assert_eq!(params, json!({ "operation": "append", "range": "A:Z" }));

        let trigger = map.substitute_value(&json!({ "p": "{{TRIGGER_PARAMS}}" }), &pattern);
        assert_eq!(trigger, json!({ "p": { "rule": "0 9 * * *" } }));
    }

    #[test]
    fn webhook_path_is_a_short_slug() {
        let pattern = token_pattern().unwrap();
        let map = SubstitutionMap::for_analysis(&analysis(
            "Send a Slack message when a new GitHub issue is created",
            "webhook",
            &[],
        ));
        assert_eq!(
            map.substitute_text("{{WEBHOOK_PATH}}", &pattern),
            "send-a-slack-message"
        );

        let empty = SubstitutionMap::for_analysis(&analysis("", "webhook", &[]));
        assert_eq!(empty.get(Placeholder::WebhookPath), Some(&json!("webhook")));
    }
}
