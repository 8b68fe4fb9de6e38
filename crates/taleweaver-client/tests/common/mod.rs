//! Shared helpers for HTTP client integration tests.
#![allow(dead_code)]

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use taleweaver_client::{ClientConfig, HttpStoryApi};
use taleweaver_core::api::CompleteStoryResponse;
use taleweaver_test_support::{StoryBuilder, pirate_story, summary};
use tokio::net::TcpListener;

#[derive(Debug, Deserialize)]
struct CreateBody {
    theme: String,
}

#[derive(Debug, Deserialize)]
struct Window {
    skip: usize,
    limit: usize,
}

fn catalog() -> Vec<CompleteStoryResponse> {
    let mut stories = vec![pirate_story()];
    stories.extend((2..=8).map(|i| {
        StoryBuilder::new(&format!("s{i}"), &format!("Story {i}"))
            .node("n0", "Once upon a time")
            .build()
    }));
    stories
}

async fn create_story(Json(body): Json<CreateBody>) -> (StatusCode, Json<Value>) {
    if body.theme == "forbidden" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "theme rejected" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "job_id": "j1", "status": "pending" })),
    )
}

async fn job_status(Path(job_id): Path<String>) -> (StatusCode, Json<Value>) {
    match job_id.as_str() {
        "j1" => (StatusCode::OK, Json(json!({ "status": "processing" }))),
        "j2" => (
            StatusCode::OK,
            Json(json!({ "status": "completed", "story_id": 1, "error": null })),
        ),
        "boom" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "database unavailable" })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Job not found" })),
        ),
    }
}

async fn complete_story(Path(story_id): Path<String>) -> (StatusCode, Json<Value>) {
    match catalog().into_iter().find(|story| story.id.as_str() == story_id) {
        Some(story) => (StatusCode::OK, Json(serde_json::to_value(story).unwrap())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Story not found" })),
        ),
    }
}

async fn list_stories(Query(window): Query<Window>) -> Json<Value> {
    let page: Vec<_> = catalog()
        .iter()
        .skip(window.skip)
        .take(window.limit)
        .map(summary)
        .collect();
    Json(serde_json::to_value(page).unwrap())
}

async fn count_stories() -> Json<Value> {
    Json(json!({ "count": catalog().len() }))
}

async fn garbage() -> &'static str {
    "definitely not json"
}

/// The stub story service, mounted under `/api` like the real one.
pub fn stub_router() -> Router {
    let api = Router::new()
        .route("/stories/create", post(create_story))
        .route("/stories/count", get(count_stories))
        .route("/stories", get(list_stories))
        .route("/stories/{story_id}/complete", get(complete_story))
        .route("/jobs/{job_id}", get(job_status))
        .route("/garbage/jobs/{job_id}", get(garbage));
    Router::new().nest("/api", api)
}

/// Serve the stub on an ephemeral port and return a client pointed at it.
pub async fn spawn_stub() -> HttpStoryApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_router()).await.unwrap();
    });

    let config = ClientConfig::new(&format!("http://{addr}/api")).unwrap();
    HttpStoryApi::new(&config).unwrap()
}

/// A client whose base URL points at a path that serves non-JSON bodies.
pub async fn spawn_garbage_stub() -> HttpStoryApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_router()).await.unwrap();
    });

    let config = ClientConfig::new(&format!("http://{addr}/api/garbage")).unwrap();
    HttpStoryApi::new(&config).unwrap()
}
