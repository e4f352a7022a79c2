use super::sonarcloud::Project;
use super::{FetchError, MetricsSource, RetryPolicy, Row, RowAggregator, Throttler};
use crate::Result;
use futures_util::future::join_all;
use ohno::IntoAppError;
use std::collections::HashSet;
use std::sync::Arc;

const LOG_TARGET: &str = " collector";

/// Default number of projects fetched at the same time.
pub const DEFAULT_MAX_CONCURRENT_PROJECTS: usize = 16;

/// Gathers one [`Row`] per project from a [`MetricsSource`].
///
/// Each project is fetched in its own task. A project whose data cannot be
/// fetched is logged and skipped; it never fails the whole collection.
#[derive(Debug)]
pub struct Collector<S> {
    source: Arc<S>,
    retry: RetryPolicy,
    throttler: Arc<Throttler>,
}

impl<S: MetricsSource + 'static> Collector<S> {
    pub fn new(source: S, retry: RetryPolicy, max_concurrent: usize) -> Self {
        Self {
            source: Arc::new(source),
            retry,
            throttler: Throttler::new(max_concurrent),
        }
    }

    /// Keys of every project in the organization.
    ///
    /// Without a project list there is nothing to report, so this fails instead
    /// of degrading.
    pub async fn project_keys(&self) -> Result<Vec<String>> {
        let projects = self
            .retry
            .run("listing projects", "organization", || self.source.list_projects())
            .await
            .into_app_err("listing SonarCloud projects")?;

        log::info!(target: LOG_TARGET, "Found {} project(s)", projects.len());
        Ok(projects.into_iter().map(|Project { key, .. }| key).collect())
    }

    /// Fetch the main-branch row of every project in `projects`.
    ///
    /// Duplicate keys are fetched once. Rows come back in completion order.
    pub async fn collect(&self, projects: impl IntoIterator<Item = String>) -> Vec<Row> {
        let aggregator = Arc::new(RowAggregator::new());

        let mut seen = HashSet::new();
        let tasks: Vec<_> = projects
            .into_iter()
            .filter(|project| seen.insert(project.clone()))
            .map(|project| {
                let source = Arc::clone(&self.source);
                let throttler = Arc::clone(&self.throttler);
                let aggregator = Arc::clone(&aggregator);
                let retry = self.retry;

                tokio::spawn(async move {
                    let _permit = throttler.acquire().await;
                    match fetch_project(source.as_ref(), retry, &project).await {
                        Ok(Some(row)) => aggregator.push(row),
                        Ok(None) => log::info!(target: LOG_TARGET, "Project '{project}' has no main branch, skipping"),
                        Err(e) => log::warn!(target: LOG_TARGET, "Could not fetch project '{project}', skipping: {e}"),
                    }
                })
            })
            .collect();

        let launched = tasks.len();
        for result in join_all(tasks).await {
            if let Err(e) = result {
                log::error!(target: LOG_TARGET, "Project task did not complete: {e}");
            }
        }

        let rows = aggregator.take();
        log::info!(target: LOG_TARGET, "Collected {} row(s) from {launched} project(s)", rows.len());
        rows
    }
}

/// Build the row of a single project, or `None` if it has no main branch.
async fn fetch_project<S: MetricsSource>(source: &S, retry: RetryPolicy, project: &str) -> Result<Option<Row>, FetchError> {
    let branches = retry
        .run("listing branches", project, || source.list_branches(project))
        .await?;

    let Some(main_branch) = branches.into_iter().find(|b| b.is_main) else {
        return Ok(None);
    };

    let pull_requests = retry
        .run("listing pull requests", project, || source.list_pull_requests(project))
        .await?;

    Ok(Some(Row::from_main_branch(project, &main_branch, pull_requests.first())))
}
