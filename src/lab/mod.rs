/// Prompt Laboratory
///
/// Heuristic engines behind the laboratory screens:
/// - Analyzer and optimizer (deterministic)
/// - Model simulator and playground (randomized through an injected `Rng`)
/// - Workflow generator (template library + typed placeholder substitution)

use thiserror::Error;

// Prompt scoring
pub mod analyzer;

// Prompt rewriting for a target tool
pub mod optimizer;

// Per-model interpretation predictions
pub mod simulator;

// Variation experiments
pub mod playground;

// Description to n8n workflow
pub mod generator;

pub use analyzer::{analyze, PromptAnalysis};
pub use generator::{GeneratedWorkflow, WorkflowGenerationRequest, WorkflowGenerator};
pub use optimizer::{optimize, OptimizationResult};
pub use playground::{PlaygroundExperiment, PromptVariation, VariationParameters};
pub use simulator::{simulate, simulate_all, ModelSimulation};

/// Rejected laboratory request
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabError {
    #[error("Prompt is required")]
    MissingPrompt,
    #[error("Workflow description is required")]
    MissingDescription,
    #[error("Experiment name is required")]
    MissingName,
    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),
}

/// Trimmed `value`, or `error` when it is blank
pub fn require(value: &str, error: LabError) -> Result<&str, LabError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert_eq!(require("  ", LabError::MissingPrompt), Err(LabError::MissingPrompt));
        assert_eq!(require(" hi ", LabError::MissingPrompt), Ok("hi"));
        assert_eq!(LabError::MissingName.to_string(), "Experiment name is required");
    }
}
