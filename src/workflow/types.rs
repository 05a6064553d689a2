/// Core n8n workflow type definitions
///
/// Defines the workflow, node and edge structures shared by the workflow catalog,
/// the workflow generator and the comparison view. These types are
/// serialized/deserialized as camelCase JSON to match n8n exports.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Complexity tier shared by prompts, workflows and analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Basic => "Basic",
            Complexity::Intermediate => "Intermediate",
            Complexity::Advanced => "Advanced",
        }
    }

    /// Run-time multiplier used when estimating workflow duration
    pub fn run_time_multiplier(self) -> f64 {
        match self {
            Complexity::Basic => 1.0,
            Complexity::Intermediate => 1.5,
            Complexity::Advanced => 2.0,
        }
    }

    /// Case-insensitive parse ("basic", "Advanced", ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "basic" => Some(Complexity::Basic),
            "intermediate" => Some(Complexity::Intermediate),
            "advanced" => Some(Complexity::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete n8n workflow definition containing nodes and their connections
///
/// Invariants: `node_count == nodes.len()` and every connection references node ids
/// present in `nodes`. Both are checked by [`crate::workflow::graph::validate_workflow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct N8nWorkflow {
    /// Unique workflow identifier (e.g., "slack-github-integration")
    pub id: String,
    /// Human-readable workflow name
    pub name: String,
    pub description: String,
    /// Display category (e.g., "Notifications", "Data Processing")
    pub category: String,
    pub tags: Vec<String>,
    /// List of nodes in this workflow
    pub nodes: Vec<WorkflowNode>,
    /// List of edges connecting nodes
    pub connections: Vec<Edge>,
    pub version: String,
    pub last_updated: String,
    pub complexity: Complexity,
    pub author: String,
    pub use_case: String,
    /// Human-readable estimate such as "< 5 seconds" or "12 seconds"
    pub estimated_run_time: String,
    /// Trigger family label ("Webhook", "Schedule", "Manual")
    pub trigger_type: String,
    pub node_count: usize,
}

/// A single node in an n8n workflow
///
/// `parameters` is the node-specific configuration. Its shape depends on the
/// node type (e.g. `{ "httpMethod": "POST", "path": "..." }` for a webhook node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique node identifier within the workflow (e.g., "webhook", "transform")
    pub id: String,
    pub name: String,
    /// n8n node type (e.g., "n8n-nodes-base.webhook")
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_type_version")]
    pub type_version: u32,
    /// Canvas position [x, y]
    pub position: [i32; 2],
    #[serde(default)]
    pub parameters: Value,
    /// Credential slot name -> credential reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<BTreeMap<String, String>>,
}

fn default_type_version() -> u32 {
    1
}

impl WorkflowNode {
    /// Trigger family of this node, if it is a webhook or cron entry point
    pub fn trigger_family(&self) -> Option<TriggerFamily> {
        if self.node_type.contains("webhook") {
            Some(TriggerFamily::Webhook)
        } else if self.node_type.contains("cron") {
            Some(TriggerFamily::Schedule)
        } else {
            None
        }
    }
}

/// Entry-point families recognised on workflow nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerFamily {
    Webhook,
    Schedule,
}

/// Connection between two nodes in the workflow graph
///
/// Edges define the data flow direction from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID
    pub from: String,
    /// Target node ID
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Workflow category metadata shown in the catalog browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    pub count: u32,
    pub icon: String,
}
