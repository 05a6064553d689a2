/// Workflow Model Layer
///
/// This module handles n8n workflow definitions and their structural checks:
/// - Type definitions (N8nWorkflow, WorkflowNode, Edge, Complexity)
/// - petgraph DAG validation for catalog and generated workflows

// Core workflow type definitions
pub mod types;

// Graph construction and invariant checks
pub mod graph;

// Re-export commonly used types
pub use graph::{validate_workflow, WorkflowGraph};
pub use types::{Complexity, Edge, N8nWorkflow, TriggerFamily, WorkflowCategory, WorkflowNode};
