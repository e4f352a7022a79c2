//! Integration tests for the Confluence attachment upload using wiremock

use camino::Utf8PathBuf;
use sonarcloud_report::reports::AttachmentUploader;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE_PATH: &str = "/wiki/rest/api/content/123456/child/attachment";

// base64("bot@acme.io:k3y")
const EXPECTED_AUTH: &str = "Basic Ym90QGFjbWUuaW86azN5";

fn uploader_for(server: &MockServer) -> AttachmentUploader {
    let base = Url::parse(&server.uri()).expect("valid mock server URL");
    AttachmentUploader::new(&base, "123456", "bot@acme.io", "k3y").expect("Failed to create uploader")
}

async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(PAGE_PATH))
        .and(header("authorization", EXPECTED_AUTH))
        .and(header("x-atlassian-token", "no-check"))
        .and(body_string_contains("name=\"minorEdit\""))
        .and(body_string_contains("filename=\"report.csv\""))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_ok() {
    let server = MockServer::start().await;
    mount_status(&server, 200).await;

    uploader_for(&server)
        .upload("report.csv", b"Project,Branch\n".to_vec())
        .await
        .expect("upload should succeed");
}

#[tokio::test]
async fn test_upload_created() {
    let server = MockServer::start().await;
    mount_status(&server, 201).await;

    uploader_for(&server)
        .upload("report.csv", b"Project,Branch\n".to_vec())
        .await
        .expect("upload should succeed");
}

#[tokio::test]
async fn test_upload_forbidden_fails() {
    let server = MockServer::start().await;
    mount_status(&server, 403).await;

    let error = uploader_for(&server)
        .upload("report.csv", b"Project,Branch\n".to_vec())
        .await
        .unwrap_err();

    assert!(error.to_string().contains("403"));
}

#[tokio::test]
async fn test_upload_no_content_fails() {
    // Only 200 and 201 count as a published attachment
    let server = MockServer::start().await;
    mount_status(&server, 204).await;

    let result = uploader_for(&server).upload("report.csv", Vec::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_upload_file_sends_contents() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PAGE_PATH))
        .and(body_string_contains("filename=\"sonarcloud_2024-03-05_10-15-00.csv\""))
        .and(body_string_contains("acme_api,main"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = Utf8PathBuf::from_path_buf(dir.path().join("sonarcloud_2024-03-05_10-15-00.csv")).unwrap();
    std::fs::write(&file, "Project,Branch\nacme_api,main\n").unwrap();

    uploader_for(&server).upload_file(&file).await.expect("upload should succeed");
}

#[tokio::test]
async fn test_upload_missing_file_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = Utf8PathBuf::from_path_buf(dir.path().join("missing.csv")).unwrap();

    assert!(uploader_for(&server).upload_file(&file).await.is_err());
}
