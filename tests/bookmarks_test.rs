//! Integration tests for the HTTP surface
//!
//! This test file covers:
//! - handlers/bookmark.rs (CRUD and search)
//! - handlers/metadata.rs (input validation)
//! - handlers/health.rs
//! - handlers/pages.rs (web UI rendering)
//! - router wiring (CORS, fallbacks, static files)

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use helio::{create_api_router, create_router, AppState, Config, DataFile, StorePool};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

struct TestApp {
    server: TestServer,
    data_path: PathBuf,
    _dir: TempDir,
}

fn test_state(dir: &TempDir, static_dir: Option<PathBuf>) -> (AppState, PathBuf) {
    let data_path = dir.path().join("bookmarks.json");
    let (store, _handle) = StorePool::new(DataFile::new(&data_path));
    let config = Config {
        data_path: data_path.clone(),
        server_port: 5174,
        static_dir,
        ..Default::default()
    };
    let state = AppState {
        store,
        config: Arc::new(config),
    };
    (state, data_path)
}

fn create_test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let (state, data_path) = test_state(&dir, None);
    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        data_path,
        _dir: dir,
    }
}

async fn create_bookmark(server: &TestServer, body: Value) -> Value {
    let response = server.post("/api/bookmarks").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

// ============================================================================
// Bookmark CRUD
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_bookmark() {
    let app = create_test_app();

    let created = create_bookmark(
        &app.server,
        json!({
            "url": "https://example.com",
            "title": "Example",
            "tags": "a, b",
            "notes": ""
        }),
    )
    .await;

    assert_eq!(created["url"], "https://example.com");
    assert_eq!(created["tags"], json!(["a", "b"]));
    assert!(created.get("notes").is_none());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["id"].as_str().unwrap();
    let response = app.server.get(&format!("/api/bookmarks/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), created);

    // Persisted as a versioned document
    let raw = std::fs::read_to_string(&app.data_path).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["bookmarks"][0]["id"], created["id"]);
}

#[tokio::test]
async fn test_create_requires_url_and_title() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/bookmarks")
        .json(&json!({ "url": "https://example.com" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let response = app
        .server
        .post("/api/bookmarks")
        .json(&json!({ "url": "   ", "title": "Blank url" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let list = app.server.get("/api/bookmarks").await.json::<Value>();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_rejects_invalid_json() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/bookmarks")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Invalid JSON" }));
}

#[tokio::test]
async fn test_json_body_accepted_without_content_type() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/bookmarks")
        .bytes(r#"{"url": "https://example.com", "title": "Plain curl"}"#.into())
        .await;
    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    assert_eq!(created["title"], "Plain curl");

    let response = app
        .server
        .put(&format!("/api/bookmarks/{}", created["id"].as_str().unwrap()))
        .bytes(r#"{"notes": "added later"}"#.into())
        .content_type("text/plain")
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["notes"], "added later");
}

#[tokio::test]
async fn test_newest_bookmark_is_listed_first() {
    let app = create_test_app();

    create_bookmark(&app.server, json!({ "url": "https://one.example", "title": "One" })).await;
    create_bookmark(&app.server, json!({ "url": "https://two.example", "title": "Two" })).await;

    let list = app.server.get("/api/bookmarks").await.json::<Value>();
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Two", "One"]);
}

#[tokio::test]
async fn test_get_unknown_bookmark() {
    let app = create_test_app();

    let response = app.server.get("/api/bookmarks/does-not-exist").await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>(), json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_partial_update() {
    let app = create_test_app();
    let created = create_bookmark(
        &app.server,
        json!({
            "url": "https://example.com",
            "title": "Example",
            "notes": "keep me",
            "description": "drop me"
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .put(&format!("/api/bookmarks/{}", id))
        .json(&json!({ "title": "Renamed", "description": "", "tags": ["x", " y ", ""] }))
        .await;
    response.assert_status_ok();

    let updated = response.json::<Value>();
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["url"], "https://example.com");
    assert_eq!(updated["notes"], "keep me");
    assert!(updated.get("description").is_none());
    assert_eq!(updated["tags"], json!(["x", "y"]));
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(updated["updatedAt"].as_str().unwrap() >= created["updatedAt"].as_str().unwrap());
}

#[tokio::test]
async fn test_update_validation_and_missing() {
    let app = create_test_app();
    let created =
        create_bookmark(&app.server, json!({ "url": "https://example.com", "title": "Example" }))
            .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .put(&format!("/api/bookmarks/{}", id))
        .json(&json!({ "title": "  " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Title is required" }));

    app.server
        .put("/api/bookmarks/missing")
        .json(&json!({ "title": "Anything" }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_update_rejects_invalid_json() {
    let app = create_test_app();
    let created =
        create_bookmark(&app.server, json!({ "url": "https://example.com", "title": "Example" }))
            .await;
    let path = format!("/api/bookmarks/{}", created["id"].as_str().unwrap());

    let response = app
        .server
        .put(&path)
        .bytes("{bad".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Invalid JSON" }));

    // Unchanged
    let current = app.server.get(&path).await.json::<Value>();
    assert_eq!(current, created);
}

#[tokio::test]
async fn test_update_with_empty_tags_clears_them() {
    let app = create_test_app();
    let created = create_bookmark(
        &app.server,
        json!({ "url": "https://example.com", "title": "Example", "tags": ["a", "b"] }),
    )
    .await;
    let path = format!("/api/bookmarks/{}", created["id"].as_str().unwrap());

    let response = app.server.put(&path).json(&json!({ "tags": "" })).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["tags"], json!([]));
}

#[tokio::test]
async fn test_delete_bookmark() {
    let app = create_test_app();
    let created =
        create_bookmark(&app.server, json!({ "url": "https://example.com", "title": "Example" }))
            .await;
    let path = format!("/api/bookmarks/{}", created["id"].as_str().unwrap());

    let response = app.server.delete(&path).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "ok": true }));

    app.server.delete(&path).await.assert_status_not_found();
    app.server.get(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn test_search_with_query() {
    let app = create_test_app();
    create_bookmark(
        &app.server,
        json!({ "url": "https://tokio.rs", "title": "Tokio", "tags": ["async"] }),
    )
    .await;
    create_bookmark(
        &app.server,
        json!({ "url": "https://docs.rs", "title": "Docs", "siteName": "Docs.rs" }),
    )
    .await;

    let hits = app
        .server
        .get("/api/bookmarks")
        .add_query_param("q", "ASYNC")
        .await
        .json::<Value>();
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["title"], "Tokio");

    let hits = app
        .server
        .get("/api/bookmarks")
        .add_query_param("q", "docs.rs")
        .await
        .json::<Value>();
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let all = app
        .server
        .get("/api/bookmarks")
        .add_query_param("q", "   ")
        .await
        .json::<Value>();
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_corrupt_data_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let data_path = dir.path().join("bookmarks.json");
    std::fs::write(&data_path, "{ this is not json").unwrap();

    let (state, _) = test_state(&dir, None);
    let server = TestServer::new(create_api_router(state)).unwrap();

    let list = server.get("/api/bookmarks").await.json::<Value>();
    assert_eq!(list, json!([]));
    assert_eq!(
        std::fs::read_to_string(&data_path).unwrap(),
        "{ this is not json"
    );
}

// ============================================================================
// Metadata, health, routing
// ============================================================================

#[tokio::test]
async fn test_metadata_requires_url() {
    let app = create_test_app();

    let response = app.server.get("/api/metadata").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    app.server
        .get("/api/metadata")
        .add_query_param("url", "exa mple.com")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let response = app.server.get("/api/health").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["ok"], true);
    assert_eq!(body["port"], 5174);
}

#[tokio::test]
async fn test_cors_headers() {
    let app = create_test_app();

    let response = app
        .server
        .get("/api/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn test_unknown_routes() {
    let app = create_test_app();
    app.server.get("/api/nope").await.assert_status_not_found();

    let dir = tempdir().unwrap();
    let (state, _) = test_state(&dir, None);
    let api_only = TestServer::new(create_api_router(state)).unwrap();
    api_only.get("/").await.assert_status_not_found();
}

#[tokio::test]
async fn test_static_dir_fallback() {
    let dir = tempdir().unwrap();
    let static_dir = dir.path().join("public");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<p>spa shell</p>").unwrap();
    std::fs::write(static_dir.join("app.js"), "console.log('hi');").unwrap();

    let (state, _) = test_state(&dir, Some(static_dir));
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.get("/app.js").await;
    response.assert_status_ok();
    assert!(response.text().contains("console.log"));

    let response = server.get("/some/client/route").await;
    response.assert_status_ok();
    assert!(response.text().contains("spa shell"));
}

// ============================================================================
// Web UI
// ============================================================================

#[tokio::test]
async fn test_index_page_lists_bookmarks() {
    let app = create_test_app();

    let response = app.server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("No bookmarks yet."));

    create_bookmark(
        &app.server,
        json!({ "url": "https://example.com", "title": "Example Page", "tags": ["demo"] }),
    )
    .await;

    let body = app.server.get("/").await.text();
    assert!(body.contains("Example Page"));
    assert!(body.contains("https://example.com"));
    assert!(body.contains("demo"));

    let body = app
        .server
        .get("/")
        .add_query_param("q", "nothing-matches")
        .await
        .text();
    assert!(body.contains("No bookmarks match"));
}

#[tokio::test]
async fn test_all_page_paginates() {
    let app = create_test_app();
    for i in 1..=13 {
        create_bookmark(
            &app.server,
            json!({ "url": format!("https://site{}.example", i), "title": format!("Site {}", i) }),
        )
        .await;
    }

    let response = app.server.get("/all").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Showing 1-12 of 13"));
    assert!(body.contains("Page 1 of 2"));
    // Newest first
    assert!(body.contains("Site 13"));

    let body = app
        .server
        .get("/all")
        .add_query_param("page", "9")
        .await
        .text();
    assert!(body.contains("Showing 13-13 of 13"));
    assert!(body.contains("Page 2 of 2"));
    assert!(body.contains("Site 1<"));

    let body = app
        .server
        .get("/all")
        .add_query_param("page", "not-a-number")
        .await
        .text();
    assert!(body.contains("Page 1 of 2"));
}
