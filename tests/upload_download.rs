//! End-to-end upload and download through the router

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use uploader_server::config::Config;
use uploader_server::routes;
use uploader_server::state::AppState;
use uploader_server::transfer::CipherKey;

const BOUNDARY: &str = "X-UPLOADER-BOUNDARY";
const SECRET: &str = "y0UMayUpL0Ad";

fn config(root: &TempDir, buffer_size: usize, cipher: Option<CipherKey>) -> Config {
    let mut config = Config::default();
    config.storage.root = root.path().to_path_buf();
    config.storage.buffer_size = buffer_size;
    config.auth.upload_cookie = SECRET.to_string();
    config.cipher = cipher;
    config
}

fn app(config: Config) -> Router {
    routes::app(AppState::new(config).unwrap())
}

/// Multipart body builder; each part is (field name, file name, content)
fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn test_upload_then_download() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let body = multipart(&[
        ("uploadCookie", None, SECRET.as_bytes()),
        ("theFile", Some("hello.txt"), b"hello".as_slice()),
    ]);
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(page.contains("<p>ok</p>"));

    assert_eq!(std::fs::read(root.path().join("hello.txt")).unwrap(), b"hello");

    let response = app.oneshot(get("/download/hello.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "5");
    assert_eq!(body_bytes(response).await, b"hello");
}

#[tokio::test]
async fn test_file_before_token_is_rejected() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let body = multipart(&[
        ("theFile", Some("early.txt"), b"too soon".as_slice()),
        ("uploadCookie", None, SECRET.as_bytes()),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!root.path().join("early.txt").exists());
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let body = multipart(&[
        ("uploadCookie", None, b"y0UMayUpL0Ae".as_slice()),
        ("theFile", Some("a.txt"), b"data".as_slice()),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"], "unauthorized");
    assert!(!root.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_encrypted_round_trip() {
    let root = TempDir::new().unwrap();
    let cipher = CipherKey::new([7u8; 32], [9u8; 16]);
    let app = app(config(&root, 64, Some(cipher)));
    let data = pattern(10_000);

    let body = multipart(&[
        ("uploadCookie", None, SECRET.as_bytes()),
        ("theFile", Some("blob.bin"), data.as_slice()),
    ]);
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored_path = root.path().join("blob.bin");
    let stored = std::fs::read(&stored_path).unwrap();
    assert_eq!(stored.len(), data.len());
    assert_ne!(stored, data);

    let response = app.clone().oneshot(get("/download/blob.bin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, data);

    // No integrity tag: a flipped byte still serves, just wrong
    let mut corrupted = stored;
    corrupted[100] ^= 0xff;
    std::fs::write(&stored_path, &corrupted).unwrap();

    let response = app.oneshot(get("/download/blob.bin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = body_bytes(response).await;
    assert_eq!(served.len(), data.len());
    assert_ne!(served, data);
}

#[tokio::test]
async fn test_download_missing_object() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let response = app.oneshot(get("/download/nothing.txt")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_traversal_is_rejected() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let response = app.oneshot(get("/download/..%2Fsecret")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_traversal_is_rejected() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let body = multipart(&[
        ("uploadCookie", None, SECRET.as_bytes()),
        ("theFile", Some("../escape.txt"), b"data".as_slice()),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!root.path().parent().unwrap().join("escape.txt").exists());
}

#[tokio::test]
async fn test_large_upload_with_small_buffer() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 16, None));
    let data = pattern(50_000);

    let body = multipart(&[
        ("uploadCookie", None, SECRET.as_bytes()),
        ("theFile", Some("large.bin"), data.as_slice()),
    ]);
    let response = app.clone().oneshot(upload_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(std::fs::read(root.path().join("large.bin")).unwrap(), data);

    let response = app.oneshot(get("/download/large.bin")).await.unwrap();
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "50000");
    assert_eq!(body_bytes(response).await, data);
}

#[tokio::test]
async fn test_upload_beyond_default_body_limit() {
    // axum rejects bodies over 2 MB unless the limit is lifted
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));
    let data = pattern(3 * 1024 * 1024);

    let body = multipart(&[
        ("uploadCookie", None, SECRET.as_bytes()),
        ("theFile", Some("big.bin"), data.as_slice()),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(page.contains("<p>ok</p>"));
    assert_eq!(std::fs::read(root.path().join("big.bin")).unwrap(), data);
}

#[tokio::test]
async fn test_multiple_files_and_plain_fields() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let body = multipart(&[
        ("uploadCookie", None, SECRET.as_bytes()),
        ("comment", None, b"ignored".as_slice()),
        ("theFile", Some("one.txt"), b"first".as_slice()),
        ("theFile", Some("two.txt"), b"second".as_slice()),
    ]);
    let response = app.oneshot(upload_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(std::fs::read(root.path().join("one.txt")).unwrap(), b"first");
    assert_eq!(std::fs::read(root.path().join("two.txt")).unwrap(), b"second");
    assert!(!root.path().join("comment").exists());
}

#[tokio::test]
async fn test_upload_form() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let response = app.oneshot(get("/upload")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(page.contains(r#"name="uploadCookie""#));
    assert!(page.contains(r#"name="theFile""#));
    assert!(!page.contains(SECRET));
}

#[tokio::test]
async fn test_health() {
    let root = TempDir::new().unwrap();
    let app = app(config(&root, 8192, None));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "uploader-server");
    assert_eq!(health["storage_reachable"], true);
    assert_eq!(health["encryption_at_rest"], false);
}

#[tokio::test]
async fn test_health_reports_missing_root() {
    let root = TempDir::new().unwrap();
    let cipher = CipherKey::new([7u8; 32], [9u8; 16]);
    let app = app(config(&root, 8192, Some(cipher)));
    std::fs::remove_dir_all(root.path()).unwrap();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["storage_reachable"], false);
    assert_eq!(health["encryption_at_rest"], true);
}
