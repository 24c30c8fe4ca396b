//! HTTP tests for the directory API, driven through the router without a
//! network listener.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use handle_directory::testing::FailingStore;
use handle_directory::DirectoryConfig;
use serde_json::{json, Value};
use server_core::server::{build_app, AppState};
use tower::util::ServiceExt; // for `oneshot`

fn setup_app() -> (Router, AppState) {
    let state = AppState::in_memory(DirectoryConfig::default());
    (build_app(state.clone(), &[]), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn submit(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/directory/submissions", body))
        .await
        .unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_store_status() {
    let (app, _) = setup_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["status"], "ok");
}

#[tokio::test]
async fn health_is_unavailable_when_store_fails() {
    let state = AppState::new(Arc::new(FailingStore::new("down")), DirectoryConfig::default());
    let app = build_app(state, &[]);
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn submission_creates_then_updates() {
    let (app, _) = setup_app();

    let (status, body) = submit(
        &app,
        json!({"platform": "instagram", "handle": "@Nike", "name": "Nike Inc."}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["record"]["handle"], "nike");
    assert_eq!(body["record"]["canonical_name"], "Nike");

    let (status, body) = submit(&app, json!({"platform": "instagram", "handle": "NIKE"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "updated");
    assert_eq!(body["record"]["canonical_name"], "Nike");
}

#[tokio::test]
async fn invalid_handle_is_unprocessable() {
    let (app, _) = setup_app();
    let (status, body) = submit(
        &app,
        json!({"platform": "instagram", "handle": "not a handle!"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("instagram"));
}

// =============================================================================
// Query surface
// =============================================================================

#[tokio::test]
async fn query_groups_across_platforms() {
    let (app, _) = setup_app();
    submit(&app, json!({"platform": "instagram", "handle": "nike", "name": "Nike"})).await;
    submit(&app, json!({"platform": "twitter_x", "handle": "nike", "name": "Nike Inc."})).await;
    submit(&app, json!({"platform": "tiktok", "handle": "nike"})).await;

    let response = app
        .oneshot(get("/api/directory?query=nike&limit=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mode"], "search");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["canonical_name"], "Nike");
    assert_eq!(results[0]["usage_count"], 3);
}

#[tokio::test]
async fn query_validation_rejects_bad_input() {
    let (app, _) = setup_app();
    for uri in [
        "/api/directory",
        "/api/directory?query=a",
        "/api/directory?query=nike&limit=0",
        "/api/directory?query=nike&limit=101",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }

    let response = app
        .oneshot(get("/api/directory?query=nike&limit=100"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn suggest_mode_resolves_partial_handles() {
    let (app, _) = setup_app();
    submit(
        &app,
        json!({"platform": "twitter_x", "handle": "elonmusk", "name": "Elon Musk"}),
    )
    .await;

    let response = app
        .oneshot(get("/api/directory?query=%40elonm&mode=suggest"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mode"], "suggest");
    assert_eq!(body["results"][0]["canonical_name"], "Elon Musk");
}

#[tokio::test]
async fn brand_mode_returns_handles_per_platform() {
    let (app, _) = setup_app();
    submit(&app, json!({"platform": "instagram", "handle": "teslamotors", "name": "Tesla"})).await;
    submit(&app, json!({"platform": "twitter_x", "handle": "tesla", "name": "Tesla"})).await;

    let response = app
        .oneshot(get("/api/directory?query=tesla&mode=brand"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mode"], "brand");
    assert_eq!(
        body["handles"],
        json!({"instagram": "teslamotors", "twitter_x": "tesla"})
    );
}

#[tokio::test]
async fn store_outage_is_service_unavailable() {
    let state = AppState::new(Arc::new(FailingStore::new("timeout")), DirectoryConfig::default());
    let app = build_app(state, &[]);
    let response = app.oneshot(get("/api/directory?query=nike")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Directory store unavailable");
}

// =============================================================================
// Imports
// =============================================================================

#[tokio::test]
async fn import_reports_summary() {
    let (app, _) = setup_app();
    let text = "Nike - @nike\nhttps://www.tiktok.com/@nike\nnothing to see here\n";
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/directory/imports",
            json!({"text": text}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["created"], 2);
    assert_eq!(body["skipped"], 1);
}

#[tokio::test]
async fn table_import_uses_format_field() {
    let (app, state) = setup_app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/directory/imports",
            json!({"text": "platform,handle,name\ntelegram,durov,Pavel Durov", "format": "table"}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["created"], 1);

    let record = state
        .directory
        .find(handle_directory::Platform::Telegram, "durov")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.canonical_name.as_deref(), Some("Pavel Durov"));
}

// =============================================================================
// Moderation
// =============================================================================

#[tokio::test]
async fn verify_and_delete_records() {
    let (app, _) = setup_app();
    let (_, body) = submit(&app, json!({"platform": "instagram", "handle": "nike"})).await;
    let id = body["record"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/directory/records/{}/verified", id),
            json!({"verified": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["verified"], true);

    let delete = |app: Router| {
        let uri = format!("/api/directory/records/{}", id);
        async move {
            app.oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    };
    assert_eq!(delete(app.clone()).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(app).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_record_cannot_be_verified() {
    let (app, _) = setup_app();
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!(
                "/api/directory/records/{}/verified",
                handle_directory::RecordId::new()
            ),
            json!({"verified": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
