//! Integration tests for the download module.
//!
//! These tests verify the full download flow with mock HTTP servers.

use std::path::Path;

use scimon_core::download::{DEFAULT_FILENAME, DownloadError, HttpClient, MAX_FILENAME_BYTES};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

async fn mount_file(server: &MockServer, route: &str, status: u16, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"%PDF-1.4\nfake paper body\n%%EOF";
    mount_file(&server, "/pdf/xyz123.pdf", 200, content).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client builds");
    let url = format!("{}/pdf/xyz123.pdf", server.uri());
    let file_path = client
        .download_to_file(&url, temp_dir.path())
        .await
        .expect("download should succeed");

    assert_eq!(file_path, temp_dir.path().join("xyz123.pdf"));
    assert_eq!(std::fs::read(&file_path).expect("read file"), content);
}

#[tokio::test]
async fn test_download_creates_missing_directories() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/pdf/a.pdf", 200, b"pdf").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("papers/2024/new");

    let client = HttpClient::new().expect("client builds");
    let file_path = client
        .download_to_file(&format!("{}/pdf/a.pdf", server.uri()), &target)
        .await
        .expect("download should succeed");

    assert!(target.is_dir());
    assert_eq!(file_path.parent(), Some(target.as_path()));
}

#[tokio::test]
async fn test_download_overwrites_existing_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/pdf/a.pdf", 200, b"new content").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(temp_dir.path().join("a.pdf"), b"old content that is longer").unwrap();

    let client = HttpClient::new().expect("client builds");
    let file_path = client
        .download_to_file(&format!("{}/pdf/a.pdf", server.uri()), temp_dir.path())
        .await
        .expect("download should succeed");

    assert_eq!(std::fs::read(file_path).unwrap(), b"new content");
}

#[tokio::test]
async fn test_download_percent_encoded_name_is_decoded() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/pdf/my%20paper.pdf", 200, b"pdf").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client builds");
    let file_path = client
        .download_to_file(
            &format!("{}/pdf/my%20paper.pdf", server.uri()),
            temp_dir.path(),
        )
        .await
        .expect("download should succeed");

    assert_eq!(file_path, temp_dir.path().join("my paper.pdf"));
}

#[tokio::test]
async fn test_download_trailing_slash_uses_default_name() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/pdf/", 200, b"pdf").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client builds");
    let file_path = client
        .download_to_file(&format!("{}/pdf/", server.uri()), temp_dir.path())
        .await
        .expect("download should succeed");

    assert_eq!(file_path, temp_dir.path().join(DEFAULT_FILENAME));
}

#[tokio::test]
async fn test_download_overlong_segment_is_shortened() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let segment = format!("{}.pdf", "a".repeat(300));
    mount_file(&server, &format!("/pdf/{segment}"), 200, b"long name").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client builds");
    let file_path = client
        .download_to_file(&format!("{}/pdf/{segment}", server.uri()), temp_dir.path())
        .await
        .expect("download should succeed");

    let name = file_path.file_name().unwrap().to_str().unwrap();
    assert!(name.len() <= MAX_FILENAME_BYTES, "name too long: {}", name.len());
    assert!(name.ends_with(".pdf"));
    assert_eq!(std::fs::read(&file_path).unwrap(), b"long name");
}

#[tokio::test]
async fn test_download_http_error_creates_no_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/pdf/missing.pdf", 404, b"gone").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client builds");
    let err = client
        .download_to_file(
            &format!("{}/pdf/missing.pdf", server.uri()),
            temp_dir.path(),
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, DownloadError::HttpStatus { status: 404, .. }),
        "unexpected error: {err:?}"
    );
    assert!(!temp_dir.path().join("missing.pdf").exists());
}

#[tokio::test]
async fn test_download_invalid_url_rejected_before_filesystem() {
    let client = HttpClient::new().expect("client builds");
    let err = client
        .download_to_file("::not a url::", Path::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::InvalidUrl { .. }));
}
