//! Publishes SonarCloud main-branch metrics as a CSV attachment on a Confluence page.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use sonarcloud_report::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host bound to the real process streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
