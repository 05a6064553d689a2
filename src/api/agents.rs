/// AI agent endpoints
///
/// Browsing, stats, templates, in-memory activation toggles and validated
/// agent creation.

use crate::catalog::{AgentConfig, AgentConfigError, AiAgent};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

impl IntoResponse for AgentConfigError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "errors": self.errors }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AgentQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub popular: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

pub fn create_agent_routes() -> Router<AppState> {
    Router::new()
        .route("/api/agents", get(list_agents).post(create_agent))
        .route("/api/agents/stats", get(agent_stats))
        .route("/api/agents/templates", get(agent_templates))
        .route("/api/agents/{id}", get(get_agent))
        .route("/api/agents/{id}/conversations", get(agent_conversations))
        .route("/api/agents/{id}/active", put(set_agent_active))
}

/// List agents
///
/// GET /api/agents?q=&category=&active=
async fn list_agents(State(state): State<AppState>, Query(query): Query<AgentQuery>) -> Json<Value> {
    let agents = &state.catalog.agents;
    let category = query.category.as_deref().unwrap_or("all");

    let mut found = match query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let mut hits = agents.search(q);
            if category != "all" {
                hits.retain(|agent| agent.category == category);
            }
            hits
        }
        None => agents.by_category(category),
    };
    if let Some(active) = query.active {
        found.retain(|agent| agent.is_active == active);
    }

    Json(json!({ "agents": found }))
}

/// Create an agent from a validated configuration
///
/// POST /api/agents
/// Returns 400 with `{ "errors": [...] }` listing every failed rule
async fn create_agent(
    State(state): State<AppState>,
    Json(config): Json<AgentConfig>,
) -> Result<(StatusCode, Json<AiAgent>), AgentConfigError> {
    match state.catalog.agents.create(config) {
        Ok(agent) => Ok((StatusCode::CREATED, Json(agent))),
        Err(e) => {
            tracing::debug!("🔍 Rejected agent configuration: {}", e);
            Err(e)
        }
    }
}

async fn agent_stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.catalog.agents.stats()))
}

/// GET /api/agents/templates?popular=true
async fn agent_templates(State(state): State<AppState>, Query(query): Query<TemplateQuery>) -> Json<Value> {
    let templates = if query.popular.unwrap_or(false) {
        state.catalog.agents.popular_templates()
    } else {
        state.catalog.agents.templates()
    };
    Json(json!({ "templates": templates }))
}

async fn get_agent(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<AiAgent>, StatusCode> {
    state.catalog.agents.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn agent_conversations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if state.catalog.agents.get_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let conversations = state.catalog.agents.conversations_for(&id);
    Ok(Json(json!({ "conversations": conversations })))
}

/// Toggle an agent on or off (in memory only)
///
/// PUT /api/agents/:id/active
/// Body: { "isActive": false }
async fn set_agent_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<AiAgent>, StatusCode> {
    state
        .catalog
        .agents
        .set_active(&id, request.is_active)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
