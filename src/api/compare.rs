/// Side-by-side comparison endpoints
///
/// `ids` is a comma-separated list; duplicates are dropped and only the first
/// three distinct ids are compared.

use crate::catalog::compare::{compare_prompts, compare_workflows, Comparison, PromptSummary, WorkflowSummary};
use crate::catalog::ComparisonSet;
use crate::server::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub ids: String,
}

impl CompareQuery {
    fn selection(&self) -> ComparisonSet {
        ComparisonSet::from_ids(self.ids.split(',').map(str::trim).filter(|id| !id.is_empty()))
    }
}

pub fn create_compare_routes() -> Router<AppState> {
    Router::new()
        .route("/api/compare/prompts", get(compare_prompt_selection))
        .route("/api/compare/workflows", get(compare_workflow_selection))
}

/// GET /api/compare/prompts?ids=v0-main,cursor-main
async fn compare_prompt_selection(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Json<Comparison<PromptSummary>> {
    Json(compare_prompts(&state.catalog.prompts, &query.selection()))
}

/// GET /api/compare/workflows?ids=...
async fn compare_workflow_selection(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Json<Comparison<WorkflowSummary>> {
    Json(compare_workflows(&state.catalog.workflows, &query.selection()))
}
