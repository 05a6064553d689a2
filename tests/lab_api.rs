//! Integration tests for the laboratory endpoints

mod common;

use axum::http::StatusCode;
use common::{default_app, get_json, post_json, post_text};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn blank_inputs_are_rejected() {
    let app = default_app();

    let (status, body) = post_text(&app, "/api/lab/analyze", json!({ "prompt": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Prompt is required");

    let (status, body) = post_text(&app, "/api/lab/workflows/generate", json!({ "description": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Workflow description is required");

    let (status, body) = post_text(&app, "/api/lab/experiments", json!({ "basePrompt": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Experiment name is required");
}

#[tokio::test]
async fn analyze_and_optimize_a_login_form() {
    let app = default_app();

    let (status, analysis) = post_json(&app, "/api/lab/analyze", json!({ "prompt": "build a login form" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["wordCount"], 4);
    assert_eq!(analysis["complexity"], "Basic");

    let (status, result) = post_json(
        &app,
        "/api/lab/optimize",
        json!({ "prompt": "build a login form", "targetTool": "v0" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(result["optimizedPrompt"].as_str().unwrap().contains("Requirements:"));
    let confidence = result["confidence"].as_u64().unwrap();
    assert!((30..=95).contains(&confidence));
    assert_eq!(result["analysis"]["wordCount"], 4);
}

#[tokio::test]
async fn simulations_cover_every_model() {
    let app = default_app();

    let (_, models) = get_json(&app, "/api/lab/models").await;
    let model_count = models["models"].as_array().unwrap().len();
    assert_eq!(model_count, 4);

    let (status, all) = post_json(&app, "/api/lab/simulate/all", json!({ "prompt": "create a react dashboard" })).await;
    assert_eq!(status, StatusCode::OK);
    let simulations = all["simulations"].as_array().unwrap();
    assert_eq!(simulations.len(), model_count);
    for simulation in simulations {
        assert!(simulation["confidence"].as_u64().unwrap() <= 95);
    }

    // Unknown models fall back to the first profile
    let (status, single) = post_json(
        &app,
        "/api/lab/simulate",
        json!({ "prompt": "create a react dashboard", "model": "gpt-17" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["model"], simulations[0]["model"]);
}

#[tokio::test]
async fn generated_workflow_is_consistent() {
    let app = default_app();
    let (status, generated) = post_json(
        &app,
        "/api/lab/workflows/generate",
        json!({ "description": "send a slack message when a new github issue is created" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let analysis = &generated["analysis"];
    assert_eq!(analysis["detectedCategory"], "notifications");
    let integrations = analysis["requiredIntegrations"].as_array().unwrap();
    assert!(integrations.contains(&json!("slack")));
    assert!(integrations.contains(&json!("github")));

    let workflow = &generated["workflow"];
    let nodes = workflow["nodes"].as_array().unwrap();
    assert_eq!(workflow["nodeCount"], json!(nodes.len()));
    let node_ids: Vec<&str> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
    for edge in workflow["connections"].as_array().unwrap() {
        assert!(node_ids.contains(&edge["from"].as_str().unwrap()));
        assert!(node_ids.contains(&edge["to"].as_str().unwrap()));
    }
    let rendered = serde_json::to_string(nodes).unwrap();
    assert!(!rendered.contains("{{SLACK") && !rendered.contains("{{TRIGGER"));
    assert_eq!(generated["templateUsed"], json!(["Webhook to Notification"]));
}

#[tokio::test]
async fn experiment_lifecycle() {
    let app = default_app();

    let (status, experiment) = post_json(
        &app,
        "/api/lab/experiments",
        json!({ "name": "Login copy", "basePrompt": "write a login form" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(experiment["variations"].as_array().unwrap().len(), 3);
    assert_eq!(experiment["results"], json!([]));

    let (status, extended) = post_json(
        &app,
        "/api/lab/experiments/variations",
        json!({
            "experiment": experiment,
            "name": "Playful",
            "prompt": "write a playful login form",
            "parameters": { "style": "creative", "tone": "innovative" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let variations = extended["variations"].as_array().unwrap();
    assert_eq!(variations.len(), 4);
    assert_eq!(variations[3]["id"], "variation-4");

    let (status, ran) = post_json(&app, "/api/lab/experiments/run", json!({ "experiment": extended })).await;
    assert_eq!(status, StatusCode::OK);
    let results: &Vec<Value> = ran["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    for result in results {
        let response_time = result["metrics"]["responseTime"].as_u64().unwrap();
        assert!((2000..=3000).contains(&response_time));
    }
}

#[tokio::test]
async fn prompt_templates_can_be_filled() {
    let app = default_app();

    let (_, templates) = get_json(&app, "/api/lab/templates").await;
    assert_eq!(templates["templates"].as_array().unwrap().len(), 4);

    let (status, filled) = post_json(
        &app,
        "/api/lab/templates/component-creation/fill",
        json!({ "values": { "COMPONENT_TYPE": "a modal" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filled["prompt"], "Create a React component for a modal that {FUNCTIONALITY}");
    assert_eq!(filled["unfilled"], json!(["FUNCTIONALITY"]));

    let (status, body) = post_text(&app, "/api/lab/templates/ghost/fill", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Unknown prompt template: ghost");
}
