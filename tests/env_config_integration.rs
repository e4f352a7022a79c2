//! Runs the built binary with its configuration supplied through environment variables

use serde_json::json;
use std::process::{Command, Output};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG_VARS: [&str; 7] = [
    "SONARCLOUD_ORG",
    "SONARCLOUD_TOKEN",
    "SONARCLOUD_URL",
    "CONFLUENCE_PAGEID",
    "CONFLUENCE_ORG_URL",
    "CONFLUENCE_API_KEY",
    "CONFLUENCE_USERNAME",
];

async fn run_binary(env: Vec<(&'static str, String)>, args: Vec<String>) -> Output {
    tokio::task::spawn_blocking(move || {
        let mut command = Command::new(env!("CARGO_BIN_EXE_sonarcloud-report"));
        for var in CONFIG_VARS {
            let _ = command.env_remove(var);
        }
        let _ = command.env_remove("RUST_LOG").envs(env).args(args);
        command.output().expect("Failed to run sonarcloud-report")
    })
    .await
    .unwrap()
}

fn full_env(sonar: &MockServer) -> Vec<(&'static str, String)> {
    vec![
        ("SONARCLOUD_ORG", "acme".to_string()),
        ("SONARCLOUD_TOKEN", "sq-token".to_string()),
        ("SONARCLOUD_URL", sonar.uri()),
        ("CONFLUENCE_PAGEID", "42".to_string()),
        ("CONFLUENCE_ORG_URL", "https://acme.atlassian.net".to_string()),
        ("CONFLUENCE_API_KEY", "k3y".to_string()),
        ("CONFLUENCE_USERNAME", "bot@acme.io".to_string()),
    ]
}

fn local_args(output_dir: &std::path::Path) -> Vec<String> {
    [
        "--skip-upload",
        "--project",
        "alpha",
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--log-level",
        "none",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_configuration_from_environment() {
    let sonar = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/project_branches/list"))
        .and(query_param("project", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "branches": [{
                "name": "main",
                "isMain": true,
                "status": { "qualityGateStatus": "OK", "bugs": 2, "vulnerabilities": 0, "codeSmells": 1 },
                "analysisDate": "2024-03-05T10:15:00+0000"
            }]
        })))
        .expect(1)
        .mount(&sonar)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/project_pull_requests/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pullRequests": [] })))
        .mount(&sonar)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = run_binary(full_env(&sonar), local_args(dir.path())).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let report = std::fs::read_to_string(stdout.trim()).unwrap();
    assert!(report.contains("alpha,main,,OK,2,0,1,05-03-2024,"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_environment_value_is_fatal() {
    let sonar = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sonar)
        .await;

    let env = full_env(&sonar)
        .into_iter()
        .filter(|(name, _)| *name != "CONFLUENCE_API_KEY")
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let output = run_binary(env, local_args(dir.path())).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--confluence-api-key"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
