//! HTTP API Tests
//!
//! Drives the assembled router in-process with tower's `oneshot`,
//! backed by a tempfile file store: the full request path from routing
//! through the engines to disk and back.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use phasetrack::http_server::{HttpServer, HttpServerConfig};
use phasetrack::store::FileStore;

fn router(dir: &TempDir) -> Router {
    let store = FileStore::init(dir.path().join("records.json")).unwrap();
    HttpServer::new(HttpServerConfig::default(), Arc::new(store)).router()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json_body(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn seed(router: &Router) {
    let (status, _) = send(
        router,
        with_json_body(
            "POST",
            "/api/records",
            json!({
                "newPhase": {
                    "serialNo": 1,
                    "phase": "Design",
                    "status": "open",
                    "responsibleParty": "Alice",
                    "updateDate": "2024-03-01",
                    "subPhases": []
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        router,
        with_json_body(
            "POST",
            "/api/records",
            json!({
                "parentSerialNo": 1,
                "newPhase": {
                    "serialNo": 2,
                    "phase": "Design",
                    "status": "closed",
                    "responsibleParty": "Bob",
                    "updateDate": "2024-03-02",
                    "subPhases": []
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_get_records_returns_full_tree() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(&router, get("/api/records")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    seed(&router).await;

    let (status, body) = send(&router, get("/api/records")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["serialNo"], json!(1));
    assert_eq!(body[0]["subPhases"][0]["serialNo"], json!(2));
}

#[tokio::test]
async fn test_search_keeps_path_to_matching_child() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);
    seed(&router).await;

    let (status, body) = send(&router, get("/api/records/search?status=closed")).await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["serialNo"], json!(1));
    assert_eq!(records[0]["subPhases"].as_array().unwrap().len(), 1);
    assert_eq!(records[0]["subPhases"][0]["status"], json!("closed"));
}

#[tokio::test]
async fn test_search_with_blank_parameters_returns_everything() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);
    seed(&router).await;

    // A search form submits every input, filled or not.
    let (status, body) = send(
        &router,
        get("/api/records/search?serialNo=&phase=&status=&document=&responsibleParty=&updateDate="),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_record_returns_created_payload() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);

    let (status, body) = send(
        &router,
        with_json_body(
            "POST",
            "/api/records",
            json!({ "newPhase": { "serialNo": 9, "phase": "Rollout" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Phase added successfully");
    assert_eq!(body["newPhase"]["serialNo"], json!(9));
}

#[tokio::test]
async fn test_post_with_unknown_parent_is_404_and_leaves_store_alone() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);
    seed(&router).await;

    let (status, body) = send(
        &router,
        with_json_body(
            "POST",
            "/api/records",
            json!({ "parentSerialNo": 42, "newPhase": { "serialNo": 9 } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Parent phase not found" }));

    let (_, tree) = send(&router, get("/api/records")).await;
    assert_eq!(tree.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_put_updates_nested_record_and_echoes_payload() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);
    seed(&router).await;

    let (status, body) = send(
        &router,
        with_json_body("PUT", "/api/records/2", json!({ "status": "Done" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Phase updated successfully");
    assert_eq!(body["updatedData"], json!({ "status": "Done" }));

    let (_, tree) = send(&router, get("/api/records")).await;
    assert_eq!(tree[0]["subPhases"][0]["status"], json!("Done"));
    // Untouched fields survive the merge.
    assert_eq!(tree[0]["subPhases"][0]["responsibleParty"], json!("Bob"));
}

#[tokio::test]
async fn test_put_on_unknown_serial_is_still_a_success() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);
    seed(&router).await;

    let (status, body) = send(
        &router,
        with_json_body("PUT", "/api/records/99", json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Phase updated successfully");
}

#[tokio::test]
async fn test_delete_removes_subtree() {
    let dir = TempDir::new().unwrap();
    let router = router(&dir);
    seed(&router).await;

    let (status, body) = send(
        &router,
        Request::builder()
            .method("DELETE")
            .uri("/api/records/1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Phase deleted successfully");

    let (_, tree) = send(&router, get("/api/records")).await;
    assert_eq!(tree, json!([]));
}

#[tokio::test]
async fn test_backend_failure_is_a_generic_500() {
    let dir = TempDir::new().unwrap();
    // Store pointed at a document that was never initialized.
    let store = FileStore::new(dir.path().join("missing.json"));
    let router = HttpServer::new(HttpServerConfig::default(), Arc::new(store)).router();

    let (status, body) = send(&router, get("/api/records")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch records" }));
}
