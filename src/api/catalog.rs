/// Catalog browsing endpoints
///
/// Read-only views over prompts, AI tools, workflows, API services and
/// integrations. List endpoints accept an optional free-text `q` plus the
/// domain's own filters.

use crate::catalog::{
    apis::ApiService, integrations::Integration, integrations::IntegrationConnection, PromptFilter, SystemPrompt,
};
use crate::server::AppState;
use crate::workflow::{Complexity, N8nWorkflow};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub struct PromptQuery {
    pub q: Option<String>,
    pub tool: Option<String>,
    pub category: Option<String>,
    pub complexity: Option<String>,
    /// Comma-separated; matches prompts carrying any of them
    pub tags: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IntegrationQuery {
    pub category: Option<String>,
    pub popular: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionQuery {
    pub user_id: Option<String>,
    pub team_id: Option<String>,
}

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn create_catalog_routes() -> Router<AppState> {
    Router::new()
        // Prompts and tools
        .route("/api/prompts", get(list_prompts))
        .route("/api/prompts/facets", get(prompt_facets))
        .route("/api/prompts/{id}", get(get_prompt))
        .route("/api/tools", get(list_tools))
        // Workflows
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/categories", get(workflow_categories))
        .route("/api/workflows/{id}", get(get_workflow))
        // API services
        .route("/api/apis", get(list_apis))
        .route("/api/apis/popular", get(popular_apis))
        .route("/api/apis/categories", get(api_categories))
        .route("/api/apis/{id}", get(get_api))
        .route("/api/apis/{id}/integrations", get(api_integrations))
        // Integrations and connections
        .route("/api/integrations", get(list_integrations))
        .route("/api/integrations/categories", get(integration_categories))
        .route("/api/integrations/{id}", get(get_integration))
        .route("/api/connections", get(list_connections))
        .route("/api/connections/{id}", get(get_connection))
        .route("/api/connections/{id}/events", get(connection_events))
        .route("/api/connections/{id}/sync-logs", get(connection_sync_logs))
}

/// List prompts
///
/// GET /api/prompts?q=&tool=&category=&complexity=&tags=a,b
/// Tool and category compare case-insensitively; an unknown complexity is a 400
async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<PromptQuery>,
) -> Result<Json<Value>, StatusCode> {
    let prompts = &state.catalog.prompts;

    let complexity = match non_blank(&query.complexity) {
        Some(value) => Some(Complexity::parse(value).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };
    let filter = PromptFilter {
        complexity,
        tags: non_blank(&query.tags)
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        ..PromptFilter::default()
    };

    let mut found: Vec<SystemPrompt> = match non_blank(&query.q) {
        Some(q) => prompts.search(q),
        None => prompts.list(),
    };
    if let Some(tool) = non_blank(&query.tool) {
        found.retain(|prompt| prompt.tool.eq_ignore_ascii_case(tool));
    }
    if let Some(category) = non_blank(&query.category) {
        found.retain(|prompt| prompt.category.eq_ignore_ascii_case(category));
    }
    found.retain(|prompt| filter.matches(prompt));

    Ok(Json(json!({ "prompts": found })))
}

async fn prompt_facets(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.catalog.prompts.facets()))
}

async fn get_prompt(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SystemPrompt>, StatusCode> {
    state.catalog.prompts.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "tools": state.catalog.prompts.tools() }))
}

/// GET /api/workflows?q=&category=
async fn list_workflows(State(state): State<AppState>, Query(query): Query<CategoryQuery>) -> Json<Value> {
    let workflows = &state.catalog.workflows;
    let mut found: Vec<N8nWorkflow> = match non_blank(&query.q) {
        Some(q) => workflows.search(q),
        None => workflows.list(),
    };
    if let Some(category) = non_blank(&query.category) {
        found.retain(|workflow| workflow.category.eq_ignore_ascii_case(category));
    }
    Json(json!({ "workflows": found }))
}

async fn workflow_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "categories": state.catalog.workflows.categories() }))
}

async fn get_workflow(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<N8nWorkflow>, StatusCode> {
    state.catalog.workflows.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/apis?q=&category=
async fn list_apis(State(state): State<AppState>, Query(query): Query<CategoryQuery>) -> Json<Value> {
    let apis = &state.catalog.apis;
    let mut found: Vec<ApiService> = match non_blank(&query.category) {
        Some(category) => apis.by_category(category),
        None => apis.list(),
    };
    if let Some(q) = non_blank(&query.q) {
        let hits = apis.search(q);
        found.retain(|api| hits.iter().any(|hit| hit.id == api.id));
    }
    Json(json!({ "apis": found }))
}

async fn popular_apis(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "apis": state.catalog.apis.popular() }))
}

async fn api_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "categories": state.catalog.apis.categories() }))
}

async fn get_api(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ApiService>, StatusCode> {
    state.catalog.apis.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn api_integrations(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if state.catalog.apis.get_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "integrations": state.catalog.apis.integrations_for(&id) })))
}

/// GET /api/integrations?category=&popular=true
async fn list_integrations(State(state): State<AppState>, Query(query): Query<IntegrationQuery>) -> Json<Value> {
    let integrations = &state.catalog.integrations;
    let mut found: Vec<Integration> = if query.popular.unwrap_or(false) {
        integrations.popular()
    } else {
        integrations.list()
    };
    if let Some(category) = non_blank(&query.category) {
        let in_category = integrations.by_category(category);
        found.retain(|integration| in_category.iter().any(|c| c.id == integration.id));
    }
    Json(json!({ "integrations": found }))
}

async fn integration_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "categories": state.catalog.integrations.categories() }))
}

async fn get_integration(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Integration>, StatusCode> {
    state.catalog.integrations.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/connections?userId=&teamId=
async fn list_connections(State(state): State<AppState>, Query(query): Query<ConnectionQuery>) -> Json<Value> {
    let connections = state
        .catalog
        .integrations
        .connections(non_blank(&query.user_id), non_blank(&query.team_id));
    Json(json!({ "connections": connections }))
}

async fn get_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IntegrationConnection>, StatusCode> {
    state
        .catalog
        .integrations
        .connection_by_id(&id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn connection_events(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let integrations = &state.catalog.integrations;
    if integrations.connection_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "events": integrations.webhook_events(Some(&id)) })))
}

async fn connection_sync_logs(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let integrations = &state.catalog.integrations;
    if integrations.connection_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "syncLogs": integrations.sync_logs(Some(&id)) })))
}
