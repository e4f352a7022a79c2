use super::sonarcloud::{Branch, PullRequest};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "       row";

/// Layout of `analysisDate` values returned by SonarCloud, e.g. `2024-03-05T10:15:00+0000`.
const ANALYSIS_DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Layout of the analysis date in the report, e.g. `05-03-2024`.
const ANALYSIS_DATE_OUTPUT_FORMAT: &str = "%d-%m-%Y";

/// Column names of the report, in order.
pub const HEADER: [&str; 9] = [
    "Project",
    "Branch",
    "Contributors",
    "QualityGateStatus",
    "Bugs",
    "Vulnerabilities",
    "CodeSmells",
    "AnalysisDate",
    "URL",
];

/// One project's main-branch snapshot, the unit of the report.
///
/// Serialized field names match [`HEADER`]. Missing optional values are empty
/// strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    pub project: String,
    pub branch: String,
    #[serde(rename = "Contributors")]
    pub contributor: String,
    pub quality_gate_status: String,
    pub bugs: u64,
    pub vulnerabilities: u64,
    pub code_smells: u64,
    pub analysis_date: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl Row {
    /// Flatten a project's main branch and its most recent pull request into a row.
    #[must_use]
    pub fn from_main_branch(project: &str, branch: &Branch, latest_pull_request: Option<&PullRequest>) -> Self {
        let contributor = latest_pull_request
            .and_then(|pr| pr.contributors.first())
            .map(|c| c.name.clone())
            .unwrap_or_default();

        let url = latest_pull_request.and_then(|pr| pr.url.clone()).unwrap_or_default();

        Self {
            project: project.to_string(),
            branch: branch.name.clone(),
            contributor,
            quality_gate_status: branch.status.quality_gate_status.clone(),
            bugs: branch.status.bugs,
            vulnerabilities: branch.status.vulnerabilities,
            code_smells: branch.status.code_smells,
            analysis_date: normalize_analysis_date(project, branch.analysis_date.as_deref()),
            url,
        }
    }
}

/// Reformat an analysis timestamp as `DD-MM-YYYY`.
///
/// Missing, empty, and `"null"` values become an empty string. So does anything
/// that does not parse, after logging a warning.
#[must_use]
pub fn normalize_analysis_date(project: &str, raw: Option<&str>) -> String {
    let raw = match raw {
        None | Some("" | "null") => return String::new(),
        Some(raw) => raw,
    };

    match DateTime::parse_from_str(raw, ANALYSIS_DATE_INPUT_FORMAT) {
        Ok(date) => date.format(ANALYSIS_DATE_OUTPUT_FORMAT).to_string(),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Ignoring invalid analysis date '{raw}' of project '{project}': {e}");
            String::new()
        }
    }
}
