/// Prompt Laboratory endpoints
///
/// Thin wrappers over the laboratory engines. Blank prompts, descriptions and
/// experiment names are rejected with 400; randomized engines draw from a
/// fresh entropy-seeded RNG per request.

use crate::lab::{
    self,
    generator::GeneratedWorkflow,
    optimizer::DEFAULT_TARGET_TOOL,
    playground::{self, FilledPrompt, DEFAULT_VARIATION_COUNT},
    simulator, LabError, OptimizationResult, PlaygroundExperiment, PromptAnalysis, VariationParameters,
    WorkflowGenerationRequest,
};
use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

const MAX_VARIATIONS: usize = 4;

impl IntoResponse for LabError {
    fn into_response(self) -> Response {
        let status = match self {
            LabError::UnknownTemplate(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub prompt: String,
    /// Defaults to v0; an empty string optimizes without a tool profile
    pub target_tool: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperimentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_prompt: String,
    pub variation_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVariationRequest {
    pub experiment: PlaygroundExperiment,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub parameters: VariationParameters,
}

#[derive(Debug, Deserialize)]
pub struct RunExperimentRequest {
    pub experiment: PlaygroundExperiment,
}

#[derive(Debug, Default, Deserialize)]
pub struct FillTemplateRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

pub fn create_lab_routes() -> Router<AppState> {
    Router::new()
        .route("/api/lab/analyze", post(analyze_prompt))
        .route("/api/lab/optimize", post(optimize_prompt))
        .route("/api/lab/simulate", post(simulate_model))
        .route("/api/lab/simulate/all", post(simulate_all_models))
        .route("/api/lab/models", get(list_models))
        .route("/api/lab/workflows/generate", post(generate_workflow))
        .route("/api/lab/experiments", post(create_experiment))
        .route("/api/lab/experiments/variations", post(add_variation))
        .route("/api/lab/experiments/run", post(run_experiment))
        .route("/api/lab/templates", get(list_prompt_templates))
        .route("/api/lab/templates/{id}/fill", post(fill_prompt_template))
}

/// POST /api/lab/analyze
/// Body: { "prompt": "..." }
async fn analyze_prompt(Json(request): Json<PromptRequest>) -> Result<Json<PromptAnalysis>, LabError> {
    let prompt = lab::require(&request.prompt, LabError::MissingPrompt)?;
    Ok(Json(lab::analyze(prompt)))
}

/// POST /api/lab/optimize
/// Body: { "prompt": "...", "targetTool": "cursor" }
async fn optimize_prompt(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizationResult>, LabError> {
    let prompt = lab::require(&request.prompt, LabError::MissingPrompt)?;
    let target_tool = request.target_tool.as_deref().unwrap_or(DEFAULT_TARGET_TOOL);

    let result = lab::optimize(&state.catalog.prompts, prompt, target_tool);
    tracing::debug!(
        "📊 Optimized prompt for '{}' with confidence {}",
        target_tool,
        result.confidence
    );
    Ok(Json(result))
}

/// POST /api/lab/simulate
/// Body: { "prompt": "...", "model": "claude" }
async fn simulate_model(Json(request): Json<SimulateRequest>) -> Result<Json<Value>, LabError> {
    let prompt = lab::require(&request.prompt, LabError::MissingPrompt)?;
    let mut rng = StdRng::from_entropy();
    Ok(Json(json!(lab::simulate(prompt, &request.model, &mut rng))))
}

/// POST /api/lab/simulate/all
async fn simulate_all_models(Json(request): Json<PromptRequest>) -> Result<Json<Value>, LabError> {
    let prompt = lab::require(&request.prompt, LabError::MissingPrompt)?;
    let mut rng = StdRng::from_entropy();
    Ok(Json(json!({ "simulations": lab::simulate_all(prompt, &mut rng) })))
}

async fn list_models() -> Json<Value> {
    Json(json!({ "models": simulator::models() }))
}

/// Generate an n8n workflow from a description
///
/// POST /api/lab/workflows/generate
/// Body: { "description": "...", "category": null, "triggerType": null, "integrations": [], "complexity": null }
async fn generate_workflow(
    State(state): State<AppState>,
    Json(request): Json<WorkflowGenerationRequest>,
) -> Result<Json<GeneratedWorkflow>, Response> {
    lab::require(&request.description, LabError::MissingDescription).map_err(IntoResponse::into_response)?;

    match state.generator.generate(&request) {
        Ok(generated) => {
            tracing::info!(
                "✅ Generated workflow {} from template {:?} (confidence {})",
                generated.workflow.id,
                generated.template_used,
                generated.confidence
            );
            Ok(Json(generated))
        }
        Err(e) => {
            tracing::error!("❌ Workflow generation failed: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// POST /api/lab/experiments
/// Body: { "name": "...", "basePrompt": "...", "variationCount": 3 }
async fn create_experiment(Json(request): Json<CreateExperimentRequest>) -> Result<Json<PlaygroundExperiment>, LabError> {
    let name = lab::require(&request.name, LabError::MissingName)?;
    let base_prompt = lab::require(&request.base_prompt, LabError::MissingPrompt)?;
    let count = request
        .variation_count
        .unwrap_or(DEFAULT_VARIATION_COUNT)
        .clamp(1, MAX_VARIATIONS);

    Ok(Json(playground::create_experiment(name, base_prompt, count)))
}

/// POST /api/lab/experiments/variations
async fn add_variation(Json(request): Json<AddVariationRequest>) -> Result<Json<PlaygroundExperiment>, LabError> {
    let name = lab::require(&request.name, LabError::MissingName)?;
    let prompt = lab::require(&request.prompt, LabError::MissingPrompt)?;
    Ok(Json(playground::add_variation(
        &request.experiment,
        name,
        prompt,
        request.parameters,
    )))
}

/// POST /api/lab/experiments/run
/// Body: { "experiment": { ... } }
async fn run_experiment(Json(request): Json<RunExperimentRequest>) -> Json<PlaygroundExperiment> {
    let mut rng = StdRng::from_entropy();
    let experiment = playground::run_experiment(&request.experiment, &mut rng);
    tracing::debug!(
        "🧪 Ran experiment {} over {} variations",
        experiment.id,
        experiment.variations.len()
    );
    Json(experiment)
}

async fn list_prompt_templates() -> Json<Value> {
    Json(json!({ "templates": playground::PROMPT_TEMPLATES }))
}

/// POST /api/lab/templates/:id/fill
/// Body: { "values": { "COMPONENT_TYPE": "modal" } }
async fn fill_prompt_template(
    Path(id): Path<String>,
    Json(request): Json<FillTemplateRequest>,
) -> Result<Json<FilledPrompt>, LabError> {
    let template = playground::prompt_template(&id).ok_or_else(|| LabError::UnknownTemplate(id.clone()))?;
    Ok(Json(template.fill(&request.values)))
}
