//! Integration tests for the course site server.
//!
//! Tests use the Axum `Router` directly via `tower::ServiceExt` against a
//! temporary directory, without binding a TCP port.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use energyai_core::site::build_router;
use tower::ServiceExt;

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>EnergyAI Academy</h1>").unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css").join("style.css"), "body {}").unwrap();
    std::fs::write(dir.path().join("data.bin"), [0u8, 1, 2]).unwrap();
    dir
}

async fn get(dir: &tempfile::TempDir, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = build_router(dir.path().to_path_buf())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes.to_vec())
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = site();
    let (status, content_type, body) = get(&dir, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html"));
    assert_eq!(body, b"<h1>EnergyAI Academy</h1>");
}

#[tokio::test]
async fn test_nested_file_gets_its_content_type() {
    let dir = site();
    let (status, content_type, body) = get(&dir, "/css/style.css?v=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/css"));
    assert_eq!(body, b"body {}");
}

#[tokio::test]
async fn test_unknown_extension_is_octet_stream() {
    let dir = site();
    let (status, content_type, body) = get(&dir, "/data.bin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(body, vec![0u8, 1, 2]);
}

#[tokio::test]
async fn test_missing_file_is_404_page() {
    let dir = site();
    let (status, _, body) = get(&dir, "/missing.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"<h1>404 Not Found</h1>");
}

#[tokio::test]
async fn test_parent_directory_is_rejected() {
    let dir = site();
    let (status, _, body) = get(&dir, "/../index.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"<h1>404 Not Found</h1>");
}

#[tokio::test]
async fn test_directory_read_is_500_page() {
    let dir = site();
    let (status, _, body) = get(&dir, "/css").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"<h1>500 Internal Server Error</h1>");
}
