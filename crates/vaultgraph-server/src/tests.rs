//! Route tests driven through the router with `oneshot`

use std::fs;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use vaultgraph_indexer::{FsStore, GraphIndex};

use crate::{router::create_router, Credentials, ServerConfig, ServerState};

struct Fixture {
    _vault: TempDir,
    _static_dir: TempDir,
    vault_path: std::path::PathBuf,
    app: Router,
}

fn fixture(credentials: Option<Credentials>) -> Fixture {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join("a.md"), "see [[b]] and [[folder/]]").unwrap();
    fs::create_dir_all(vault.path().join("folder")).unwrap();
    fs::write(vault.path().join("folder/c.md"), "[[a|Home]]").unwrap();
    fs::create_dir_all(vault.path().join(".obsidian")).unwrap();
    fs::write(vault.path().join(".obsidian/app.md"), "[[a]]").unwrap();

    let static_dir = TempDir::new().unwrap();
    fs::write(static_dir.path().join("index.html"), "<html>client</html>").unwrap();
    fs::write(static_dir.path().join("app.js"), "console.log('hi')").unwrap();

    let index = Arc::new(GraphIndex::new(FsStore::new(vault.path())));
    index.build().unwrap();

    let config = ServerConfig {
        credentials,
        static_dir: static_dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let app = create_router(Arc::new(ServerState::new(index, config)));

    Fixture {
        vault_path: vault.path().to_path_buf(),
        _vault: vault,
        _static_dir: static_dir,
        app,
    }
}

fn open_fixture() -> Fixture {
    fixture(None)
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_body(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_is_public() {
    let fx = fixture(Some(Credentials::new("admin", "secret")));
    let (status, json) = send_json(&fx.app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_api_requires_credentials() {
    let fx = fixture(Some(Credentials::new("admin", "secret")));

    let response = fx.app.clone().oneshot(get("/api/graph")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"Knowledge Base\""
    );

    let wrong = Request::builder()
        .uri("/api/graph")
        .header(header::AUTHORIZATION, basic("admin", "nope"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&fx.app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let right = Request::builder()
        .uri("/api/graph")
        .header(header::AUTHORIZATION, basic("admin", "secret"))
        .body(Body::empty())
        .unwrap();
    let (status, json) = send_json(&fx.app, right).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_static_files_are_public() {
    let fx = fixture(Some(Credentials::new("admin", "secret")));

    let (status, body) = send(&fx.app, get("/app.js")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('hi')");
}

#[tokio::test]
async fn test_unknown_paths_fall_back_to_index() {
    let fx = open_fixture();

    let (status, body) = send(&fx.app, get("/notes/some/route")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>client</html>");

    let (status, body) = send(&fx.app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>client</html>");
}

#[tokio::test]
async fn test_graph_route() {
    let fx = open_fixture();
    let (status, json) = send_json(&fx.app, get("/api/graph")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a.md", "folder/", "folder/c.md"]);
    assert_eq!(json["nodes"][1]["type"], "directory");
    assert_eq!(json["edges"][0]["source"], "a.md");
    assert_eq!(json["edges"][0]["target"], "b.md");
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_backlinks_route() {
    let fx = open_fixture();

    let (status, json) = send_json(&fx.app, get("/api/backlinks/a.md")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["path"], "a.md");
    assert_eq!(json["backlinks"], serde_json::json!(["folder/c.md"]));

    let (_, json) = send_json(&fx.app, get("/api/backlinks/folder/")).await;
    assert_eq!(json["path"], "folder/");
    assert_eq!(json["backlinks"], serde_json::json!(["a.md"]));

    let (_, json) = send_json(&fx.app, get("/api/backlinks/nobody.md")).await;
    assert_eq!(json["backlinks"], serde_json::json!([]));
}

#[tokio::test]
async fn test_list_files_skips_hidden() {
    let fx = open_fixture();
    let (status, json) = send_json(&fx.app, get("/api/files")).await;

    assert_eq!(status, StatusCode::OK);
    let paths: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["a.md", "folder", "folder/c.md"]);
    assert_eq!(json[1]["isDir"], true);
}

#[tokio::test]
async fn test_read_document_includes_html_and_links() {
    let fx = open_fixture();
    let (status, json) = send_json(&fx.app, get("/api/files/folder/c.md")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["path"], "folder/c.md");
    assert_eq!(json["content"], "[[a|Home]]");
    assert_eq!(json["html"], "<p><a href=\"a.md\">Home</a></p>\n");
    assert_eq!(json["links"][0]["target"], "a");
    assert_eq!(json["links"][0]["alias"], "Home");
    assert_eq!(json["links"][0]["isDirectory"], false);
}

#[tokio::test]
async fn test_read_non_document_is_plain() {
    let fx = open_fixture();
    fs::write(fx.vault_path.join("notes.txt"), "[[a]]").unwrap();

    let (status, json) = send_json(&fx.app, get("/api/files/notes.txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"], "[[a]]");
    assert!(json.get("html").is_none());
    assert!(json.get("links").is_none());
}

#[tokio::test]
async fn test_read_errors() {
    let fx = open_fixture();

    let (status, _) = send(&fx.app, get("/api/files/missing.md")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&fx.app, get("/api/files/%2E%2E/outside.md")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&fx.app, get("/api/files/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_write_rebuilds_graph() {
    let fx = open_fixture();

    let (status, json) = send_json(
        &fx.app,
        with_body(Method::PUT, "/api/files/new/d.md", r#"{"content":"[[a]] [[b]]"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(
        fs::read_to_string(fx.vault_path.join("new/d.md")).unwrap(),
        "[[a]] [[b]]"
    );

    let (_, json) = send_json(&fx.app, get("/api/backlinks/a.md")).await;
    assert_eq!(json["backlinks"], serde_json::json!(["folder/c.md", "new/d.md"]));

    let (status, _) = send(
        &fx.app,
        with_body(Method::POST, "/api/files/b.md", r#"{"content":"now real"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send_json(&fx.app, get("/api/graph")).await;
    let ids: Vec<_> = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a.md", "b.md", "folder/", "folder/c.md", "new/d.md"]);
}

#[tokio::test]
async fn test_write_rejects_bad_requests() {
    let fx = open_fixture();

    let (status, _) = send(&fx.app, with_body(Method::PUT, "/api/files/x.md", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&fx.app, with_body(Method::PUT, "/api/files/x.md", r#"{"text":"x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &fx.app,
        with_body(Method::PUT, "/api/files/%2E%2E/x.md", r#"{"content":"x"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!fx.vault_path.join("x.md").exists());
}

#[tokio::test]
async fn test_delete_rebuilds_graph() {
    let fx = open_fixture();
    let delete = || {
        Request::builder()
            .method(Method::DELETE)
            .uri("/api/files/folder/c.md")
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&fx.app, delete()).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send_json(&fx.app, get("/api/backlinks/a.md")).await;
    assert_eq!(json["backlinks"], serde_json::json!([]));

    let (status, _) = send(&fx.app, delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_route() {
    let fx = open_fixture();

    let (status, json) = send_json(&fx.app, get("/api/search?q=SEE")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["path"], "a.md");
    assert_eq!(json[0]["title"], "a");
    assert_eq!(json[0]["snippet"], "see [[b]] and [[folder/]]");

    let (status, _) = send(&fx.app, get("/api/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&fx.app, get("/api/search?q=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
