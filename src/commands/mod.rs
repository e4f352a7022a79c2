//! Command-line interface and orchestration for sonarcloud-report
//!
//! A run is a single batch: parse the configuration, collect one row per
//! project from SonarCloud, write the rows to a timestamped CSV file, and attach
//! that file to a Confluence page.
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap, with every
//! required setting also accepted from an environment variable, and hands the
//! result to `process_report`:
//!
//! 1. Initialize logging
//! 2. Resolve the project keys (explicit `--project` list or the whole organization)
//! 3. Collect rows concurrently using the facts module
//! 4. Sort rows by project and write the CSV report
//! 5. Upload the report unless `--skip-upload` is given
//!
//! Configuration problems are reported before any request is made.

mod common;
mod config;
mod host;
mod report;
mod run;

pub use common::LogLevel;
pub use config::Config;
pub use host::Host;
pub use report::{ReportArgs, process_report};
pub use run::run;
