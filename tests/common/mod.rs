//! Shared helpers for HTTP integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::stream;
use http_body_util::BodyExt;
use promptlab::{
    build_router,
    catalog::Catalog,
    chat::{provider::chunk_stream, ChunkStream, CompletionProvider, CompletionRequest, ProviderError},
    lab::WorkflowGenerator,
    AppState,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Provider replying with fixed text chunks, recording every request
pub struct ScriptedProvider {
    pub chunks: Vec<String>,
    pub fail: bool,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn replying(chunks: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, ProviderError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(ProviderError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }

        let mut events: Vec<Result<Vec<u8>, ProviderError>> = self
            .chunks
            .iter()
            .map(|chunk| {
                let event = serde_json::json!({ "choices": [{ "delta": { "content": chunk } }] });
                Ok(format!("data: {}\n\n", event).into_bytes())
            })
            .collect();
        events.push(Ok(b"data: [DONE]\n\n".to_vec()));
        Ok(chunk_stream(stream::iter(events)))
    }
}

pub fn test_app(provider: Arc<ScriptedProvider>) -> Router {
    let catalog = Catalog::from_seed().expect("seed catalog");
    let generator = WorkflowGenerator::embedded().expect("template library");
    build_router(AppState::new(catalog, generator, provider))
}

pub fn default_app() -> Router {
    test_app(ScriptedProvider::replying(&["Hello", " there"]))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    (status, bytes)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = send(app, Method::GET, uri, None).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, bytes) = send(app, Method::POST, uri, Some(body)).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn post_text(app: &Router, uri: &str, body: Value) -> (StatusCode, String) {
    let (status, bytes) = send(app, Method::POST, uri, Some(body)).await;
    (status, String::from_utf8(bytes).expect("utf-8 body"))
}

/// POST a raw body, optionally without any content type
pub async fn post_raw(app: &Router, uri: &str, body: &str, content_type: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
}
