//! Integration tests for the HTTP client and retry policy.
//!
//! These tests verify fetch behavior against mock HTTP servers.

use std::time::Duration;

use khpt_core::{DownloadError, HttpClient, RetryPolicy, fetch_with_retry};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_attempts,
        Duration::from_millis(5),
        Duration::from_millis(20),
        2.0,
    )
}

#[tokio::test]
async fn test_get_text_returns_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pst/list.do"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>목록</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let body = client
        .get_text(&format!("{}/pst/list.do", mock_server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(body, "<html>목록</html>");
}

#[tokio::test]
async fn test_get_text_non_success_status_is_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let result = client
        .get_text(&format!("{}/missing", mock_server.uri()))
        .await;
    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_download_writes_full_content_and_no_partial_file() {
    let content = b"%PDF-1.4 fake exam paper bytes";
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/atchFile/FileDown.do"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("63회 한국사_문제지(심화).pdf");

    let client = HttpClient::new();
    let bytes = client
        .download_to_file(&format!("{}/atchFile/FileDown.do", mock_server.uri()), &target)
        .await
        .expect("download should succeed");

    assert_eq!(bytes, content.len() as u64);
    assert_eq!(std::fs::read(&target).expect("should read file"), content);

    // The in-flight .part file must be gone after finalization
    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .expect("should list dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty(), "partial file left behind: {leftovers:?}");
}

#[tokio::test]
async fn test_download_error_status_leaves_no_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("doc.pdf");

    let client = HttpClient::new();
    let result = client
        .download_to_file(&format!("{}/gone", mock_server.uri()), &target)
        .await;

    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 410, .. })
    ));
    assert!(!target.exists());
}

#[tokio::test]
async fn test_download_rejects_invalid_url() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = HttpClient::new();

    let result = client
        .download_to_file("definitely-not-a-url", &temp_dir.path().join("x.pdf"))
        .await;
    assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
}

#[tokio::test]
async fn test_download_to_nonexistent_directory_is_io_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"content".to_vec()))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let result = client
        .download_to_file(
            &format!("{}/file.pdf", mock_server.uri()),
            std::path::Path::new("/this/path/does/not/exist/file.pdf"),
        )
        .await;
    assert!(matches!(result, Err(DownloadError::Io { .. })));
}

#[tokio::test]
async fn test_fetch_with_retry_recovers_from_transient_server_errors() {
    let mock_server = MockServer::start().await;

    // First two requests fail with 503, the third succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let url = format!("{}/flaky", mock_server.uri());
    let body = fetch_with_retry(&fast_retry(3), || client.get_text(&url))
        .await
        .expect("third attempt should succeed");
    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn test_fetch_with_retry_gives_up_after_budget() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/always-down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let url = format!("{}/always-down", mock_server.uri());
    let result = fetch_with_retry(&fast_retry(2), || client.get_text(&url)).await;
    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_fetch_with_retry_does_not_retry_client_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new();
    let url = format!("{}/forbidden", mock_server.uri());
    let result = fetch_with_retry(&fast_retry(5), || client.get_text(&url)).await;
    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 404, .. })
    ));
}
