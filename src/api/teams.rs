/// Team collaboration and analytics endpoints

use crate::api::catalog::non_blank;
use crate::catalog::teams::Team;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_TOP_USERS: usize = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFilter {
    pub team_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopUsersQuery {
    pub limit: Option<usize>,
}

pub fn create_team_routes() -> Router<AppState> {
    Router::new()
        .route("/api/teams", get(list_teams))
        .route("/api/teams/{id}", get(get_team))
        .route("/api/teams/{id}/members", get(team_members))
        .route("/api/teams/{id}/activities", get(team_activities))
        .route("/api/workspaces", get(list_workspaces))
        .route("/api/shared-resources", get(list_shared_resources))
        .route("/api/users/{id}/teams", get(user_teams))
        // Analytics
        .route("/api/analytics", get(analytics_metrics))
        .route("/api/analytics/users", get(user_analytics))
        .route("/api/analytics/users/top", get(top_users))
        .route("/api/analytics/teams", get(team_analytics))
        .route("/api/analytics/cost-suggestions", get(cost_suggestions))
}

async fn list_teams(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "teams": state.catalog.teams.list() }))
}

async fn get_team(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Team>, StatusCode> {
    state.catalog.teams.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn team_members(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if state.catalog.teams.get_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "members": state.catalog.teams.members(&id) })))
}

async fn team_activities(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if state.catalog.teams.get_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "activities": state.catalog.teams.activities(&id) })))
}

/// GET /api/workspaces?teamId=
async fn list_workspaces(State(state): State<AppState>, Query(filter): Query<TeamFilter>) -> Json<Value> {
    Json(json!({ "workspaces": state.catalog.teams.workspaces(non_blank(&filter.team_id)) }))
}

/// GET /api/shared-resources?teamId=
async fn list_shared_resources(State(state): State<AppState>, Query(filter): Query<TeamFilter>) -> Json<Value> {
    Json(json!({ "resources": state.catalog.teams.shared_resources(non_blank(&filter.team_id)) }))
}

async fn user_teams(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "teams": state.catalog.teams.teams_of_user(&id) }))
}

async fn analytics_metrics(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.catalog.analytics.metrics()))
}

async fn user_analytics(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "users": state.catalog.analytics.users() }))
}

/// Users ranked by activity score
///
/// GET /api/analytics/users/top?limit=10
async fn top_users(State(state): State<AppState>, Query(query): Query<TopUsersQuery>) -> Json<Value> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_USERS);
    Json(json!({ "users": state.catalog.analytics.top_users(limit) }))
}

async fn team_analytics(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "teams": state.catalog.analytics.teams() }))
}

async fn cost_suggestions(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "suggestions": state.catalog.analytics.cost_suggestions() }))
}
