/// Template marketplace endpoints

use crate::api::catalog::non_blank;
use crate::catalog::templates::{MarketplaceTemplate, TemplateType};
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

#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
}

pub fn create_marketplace_routes() -> Router<AppState> {
    Router::new()
        .route("/api/templates", get(list_templates))
        .route("/api/templates/featured", get(featured_templates))
        .route("/api/templates/popular", get(popular_templates))
        .route("/api/templates/top-rated", get(top_rated_templates))
        .route("/api/templates/collections", get(template_collections))
        .route("/api/templates/categories", get(template_categories))
        .route("/api/templates/{id}", get(get_template))
        .route("/api/templates/{id}/reviews", get(template_reviews))
}

/// List marketplace templates
///
/// GET /api/templates?q=&type=&category=&author=
/// Filters intersect; an unknown type is a 400
async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> Result<Json<Value>, StatusCode> {
    let templates = &state.catalog.templates;

    let mut found: Vec<MarketplaceTemplate> = match non_blank(&query.q) {
        Some(q) => templates.search(q),
        None => templates.list(),
    };
    let mut narrow = |subset: Vec<MarketplaceTemplate>| {
        found.retain(|template| subset.iter().any(|s| s.id == template.id));
    };
    if let Some(value) = non_blank(&query.template_type) {
        let template_type = TemplateType::parse(value).ok_or(StatusCode::BAD_REQUEST)?;
        narrow(templates.by_type(template_type));
    }
    if let Some(category) = non_blank(&query.category) {
        narrow(templates.by_category(category));
    }
    if let Some(author) = non_blank(&query.author) {
        narrow(templates.by_author(author));
    }

    Ok(Json(json!({ "templates": found })))
}

async fn featured_templates(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "templates": state.catalog.templates.featured() }))
}

async fn popular_templates(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "templates": state.catalog.templates.popular() }))
}

async fn top_rated_templates(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "templates": state.catalog.templates.top_rated() }))
}

async fn template_collections(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "collections": state.catalog.templates.collections() }))
}

async fn template_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "categories": state.catalog.templates.categories() }))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MarketplaceTemplate>, StatusCode> {
    state.catalog.templates.get_by_id(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn template_reviews(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    if state.catalog.templates.get_by_id(&id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "reviews": state.catalog.templates.reviews_for(&id) })))
}
