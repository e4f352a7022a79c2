use super::FetchError;
use super::sonarcloud::{Branch, Project, PullRequest};

/// Read access to the quality metrics of an organization's projects.
///
/// Implemented by [`sonarcloud::Client`](super::sonarcloud::Client) for the real
/// service. The collector only depends on this trait, so tests can drive it with
/// canned data.
pub trait MetricsSource: Send + Sync {
    /// List every project of the organization.
    fn list_projects(&self) -> impl Future<Output = Result<Vec<Project>, FetchError>> + Send;

    /// List the branches of `project`, including their latest analysis status.
    fn list_branches(&self, project: &str) -> impl Future<Output = Result<Vec<Branch>, FetchError>> + Send;

    /// List the pull requests of `project`, most recent first.
    fn list_pull_requests(&self, project: &str) -> impl Future<Output = Result<Vec<PullRequest>, FetchError>> + Send;
}
