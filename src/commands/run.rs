//! Command dispatch logic for sonarcloud-report

use super::{ReportArgs, process_report};
use crate::{Host, Result};
use clap::Parser;
use std::io::Write;

/// Parse command-line arguments and run the report
///
/// This function parses the command-line arguments, falling back to environment
/// variables for the configuration, and executes the report. It's designed to be
/// called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, if the project list cannot
/// be retrieved, or if the report cannot be written or uploaded
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let args = match ReportArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = write!(host.error(), "{}", e.render());
            return Err(ohno::app_err!("invalid command line or configuration"));
        }
        Err(e) => {
            // --help and --version
            let _ = write!(host.output(), "{}", e.render());
            return Ok(());
        }
    };

    process_report(host, &args).await
}
