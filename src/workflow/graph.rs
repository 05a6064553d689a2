/// Petgraph-based structural validation for n8n workflows
///
/// Converts a workflow into a directed graph and checks the structural
/// invariants every catalog or generated workflow must satisfy: the declared
/// node count matches, node ids are unique, every connection references known
/// nodes and the connections form a DAG.

use crate::workflow::types::{N8nWorkflow, WorkflowNode};
use anyhow::{anyhow, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A workflow compiled into a petgraph DAG
#[derive(Debug)]
pub struct WorkflowGraph<'a> {
    /// The petgraph DiGraph structure
    graph: DiGraph<&'a WorkflowNode, ()>,
}

impl<'a> WorkflowGraph<'a> {
    /// Build the graph, rejecting duplicate node ids and dangling edges
    pub fn build(workflow: &'a N8nWorkflow) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut node_id_to_index: HashMap<&str, NodeIndex> = HashMap::new();

        for node in &workflow.nodes {
            let index = graph.add_node(node);
            if node_id_to_index.insert(node.id.as_str(), index).is_some() {
                return Err(anyhow!("Duplicate node id: {}", node.id));
            }
        }

        for edge in &workflow.connections {
            let from = node_id_to_index
                .get(edge.from.as_str())
                .ok_or_else(|| anyhow!("Edge references unknown node: {}", edge.from))?;
            let to = node_id_to_index
                .get(edge.to.as_str())
                .ok_or_else(|| anyhow!("Edge references unknown node: {}", edge.to))?;
            graph.add_edge(*from, *to, ());
        }

        Ok(Self { graph })
    }

    /// Node ids in topological order
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let order = toposort(&self.graph, None)
            .map_err(|_| anyhow!("Workflow contains cycles - must be a DAG"))?;
        Ok(order
            .into_iter()
            .map(|index| self.graph[index].id.clone())
            .collect())
    }
}

/// Validate a workflow and return its execution order
pub fn validate_workflow(workflow: &N8nWorkflow) -> Result<Vec<String>> {
    if workflow.node_count != workflow.nodes.len() {
        return Err(anyhow!(
            "Workflow {} declares {} nodes but has {}",
            workflow.id,
            workflow.node_count,
            workflow.nodes.len()
        ));
    }

    let graph = WorkflowGraph::build(workflow)?;
    let order = graph.topological_order()?;
    tracing::debug!("📊 Workflow {} order: {:?}", workflow.id, order);
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::{Complexity, Edge};
    use serde_json::json;

    fn node(id: &str, node_type: &str) -> WorkflowNode {
        WorkflowNode {
            id: id.to_string(),
            name: id.to_string(),
            node_type: node_type.to_string(),
            type_version: 1,
            position: [0, 0],
            parameters: json!({}),
            credentials: None,
        }
    }

    fn workflow(nodes: Vec<WorkflowNode>, connections: Vec<Edge>) -> N8nWorkflow {
        N8nWorkflow {
            id: "wf-test".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            category: "Automation".to_string(),
            tags: vec![],
            node_count: nodes.len(),
            nodes,
            connections,
            version: "1.0".to_string(),
            last_updated: "2024-01-01".to_string(),
            complexity: Complexity::Basic,
            author: "tests".to_string(),
            use_case: String::new(),
            estimated_run_time: "2 seconds".to_string(),
            trigger_type: "Webhook".to_string(),
        }
    }

    #[test]
    fn linear_workflow_orders_from_trigger() {
        let wf = workflow(
            vec![
                node("b", "n8n-nodes-base.slack"),
                node("a", "n8n-nodes-base.webhook"),
            ],
            vec![Edge::new("a", "b")],
        );

        assert_eq!(validate_workflow(&wf).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let wf = workflow(vec![node("a", "x"), node("a", "y")], vec![]);
        let err = validate_workflow(&wf).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate node id: a");
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let wf = workflow(vec![node("a", "x")], vec![Edge::new("a", "ghost")]);
        let err = validate_workflow(&wf).unwrap_err();
        assert!(err.to_string().contains("unknown node: ghost"));
    }

    #[test]
    fn cycle_is_rejected() {
        let wf = workflow(
            vec![node("a", "x"), node("b", "y")],
            vec![Edge::new("a", "b"), Edge::new("b", "a")],
        );
        assert!(validate_workflow(&wf).is_err());
    }

    #[test]
    fn node_count_mismatch_is_rejected() {
        let mut wf = workflow(vec![node("a", "x")], vec![]);
        wf.node_count = 2;
        assert!(validate_workflow(&wf).is_err());
    }
}
