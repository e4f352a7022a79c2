use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::facts::sonarcloud::Client;
use crate::facts::{Collector, DEFAULT_MAX_CONCURRENT_PROJECTS, RetryPolicy};
use crate::reports::{AttachmentUploader, write_csv_file};
use crate::{Host, Result};
use camino::Utf8PathBuf;
use chrono::Local;
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use core::num::NonZeroUsize;
use core::time::Duration;
use std::io::Write;

const LOG_TARGET: &str = "    report";

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "sonarcloud-report", version, about, long_about = None)]
#[command(styles = CLAP_STYLES)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: Config,

    /// Only report these projects instead of every project of the organization
    #[arg(long = "project", value_name = "KEY")]
    pub projects: Vec<String>,

    /// Directory where the CSV report is written
    #[arg(long, value_name = "PATH", default_value = ".", help_heading = "Report Output")]
    pub output_dir: Utf8PathBuf,

    /// Write the CSV report without uploading it to Confluence
    #[arg(long, help_heading = "Report Output")]
    pub skip_upload: bool,

    /// Maximum number of projects fetched at the same time
    #[arg(long, value_name = "N", default_value_t = NonZeroUsize::new(DEFAULT_MAX_CONCURRENT_PROJECTS).unwrap_or(NonZeroUsize::MIN))]
    pub max_concurrency: NonZeroUsize,

    /// Attempts per SonarCloud request when the connection drops
    #[arg(long, value_name = "N", default_value_t = RetryPolicy::default().max_attempts())]
    pub retry_attempts: u32,

    /// Base delay between attempts, multiplied by the attempt number
    #[arg(long, value_name = "MILLISECONDS", default_value_t = 1000)]
    pub retry_backoff_ms: u64,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

impl ReportArgs {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_millis(self.retry_backoff_ms))
    }
}

/// Collect every project's main-branch metrics, write them as CSV, and publish the file.
///
/// Per-project failures only shrink the report. Listing the projects, writing
/// the file, and uploading it are fatal.
pub async fn process_report<H: Host>(host: &mut H, args: &ReportArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = &args.config;
    log::debug!(target: LOG_TARGET, "Configuration: {config:?}");

    let client = Client::new(&config.sonarcloud_org, &config.sonarcloud_token, config.sonarcloud_url.clone())?;

    let uploader = if args.skip_upload {
        None
    } else {
        Some(AttachmentUploader::new(
            &config.confluence_org_url,
            &config.confluence_page_id,
            &config.confluence_username,
            &config.confluence_api_key,
        )?)
    };

    let collector = Collector::new(client, args.retry_policy(), args.max_concurrency.get());

    let projects = if args.projects.is_empty() {
        collector.project_keys().await?
    } else {
        args.projects.clone()
    };

    let mut rows = collector.collect(projects).await;
    rows.sort_by(|a, b| a.project.cmp(&b.project));

    let path = write_csv_file(&args.output_dir, &rows, &Local::now())?;
    log::info!(target: LOG_TARGET, "Wrote {} row(s) to '{path}'", rows.len());

    if let Some(uploader) = uploader {
        uploader.upload_file(&path).await?;
    }

    let _ = writeln!(host.output(), "{path}");
    Ok(())
}
