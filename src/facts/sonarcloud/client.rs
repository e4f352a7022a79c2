//! SonarCloud API client
//!
//! Minimal client for the three read-only endpoints the report needs: project
//! search, branch listing, and pull request listing.

use crate::facts::{FetchError, MetricsSource};
use core::time::Duration;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "sonarcloud";

/// Public SonarCloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sonarcloud.io";

/// Largest page size accepted by the project search endpoint.
const PROJECT_PAGE_SIZE: u32 = 500;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Every project task shares one connection pool.
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 100;

/// A project of the organization, as returned by `api/projects/search`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(rename = "pageIndex")]
    page_index: u32,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ProjectSearchResponse {
    paging: Paging,
    #[serde(default)]
    components: Vec<Project>,
}

/// A branch of a project, as returned by `api/project_branches/list`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub analysis_date: Option<String>,
    #[serde(default)]
    pub status: BranchStatus,
}

/// Quality verdict and issue counts of a branch's latest analysis.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BranchStatus {
    #[serde(default)]
    pub quality_gate_status: String,
    #[serde(default)]
    pub bugs: u64,
    #[serde(default)]
    pub vulnerabilities: u64,
    #[serde(default)]
    pub code_smells: u64,
}

#[derive(Debug, Deserialize)]
struct BranchListResponse {
    #[serde(default)]
    branches: Vec<Branch>,
}

/// A pull request of a project, as returned by `api/project_pull_requests/list`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    pub key: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Contributor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestListResponse {
    #[serde(default)]
    pull_requests: Vec<PullRequest>,
}

/// SonarCloud API client scoped to a single organization.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: Url,
    organization: String,
}

impl Client {
    /// Create a client authenticating with `token` against `base_url`.
    pub fn new(organization: impl Into<String>, token: &str, base_url: Url) -> crate::Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}"))?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder()
            .user_agent("sonarcloud-report")
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .build()?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            organization: organization.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url.join(path).map_err(|e| FetchError::Failed(e.into()))
    }

    /// Issue a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        log::debug!(target: LOG_TARGET, "GET {url} {query:?}");

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let resp = resp.error_for_status().map_err(FetchError::from_transport)?;

        // Read the whole body first so a connection cut mid-body surfaces as a
        // truncated document rather than a generic decode error.
        let body = resp.bytes().await.map_err(FetchError::from_transport)?;
        serde_json::from_slice(&body).map_err(FetchError::from_decode)
    }
}

/// Make `base_url` a directory so joined endpoints keep a sub-path such as `/sonarqube`.
fn with_trailing_slash(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

impl MetricsSource for Client {
    async fn list_projects(&self) -> Result<Vec<Project>, FetchError> {
        let page_size = PROJECT_PAGE_SIZE.to_string();
        let mut projects = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_str = page.to_string();
            let response: ProjectSearchResponse = self
                .get_json(
                    "api/projects/search",
                    &[("organization", self.organization.as_str()), ("p", page_str.as_str()), ("ps", page_size.as_str())],
                )
                .await?;

            log::debug!(
                target: LOG_TARGET,
                "project page {} returned {} of {} projects",
                response.paging.page_index,
                response.components.len(),
                response.paging.total
            );

            let page_was_empty = response.components.is_empty();
            projects.extend(response.components);

            if page_was_empty || projects.len() as u64 >= response.paging.total {
                return Ok(projects);
            }

            page += 1;
        }
    }

    async fn list_branches(&self, project: &str) -> Result<Vec<Branch>, FetchError> {
        let response: BranchListResponse = self.get_json("api/project_branches/list", &[("project", project)]).await?;
        Ok(response.branches)
    }

    async fn list_pull_requests(&self, project: &str) -> Result<Vec<PullRequest>, FetchError> {
        let response: PullRequestListResponse = self
            .get_json("api/project_pull_requests/list", &[("project", project)])
            .await?;
        Ok(response.pull_requests)
    }
}
