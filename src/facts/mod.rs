//! Data collection from SonarCloud
//!
//! This module turns an organization's projects into report rows. The
//! [`Collector`] fans out one task per project over a [`MetricsSource`],
//! limits how many run at once with a [`Throttler`], retries dropped
//! connections according to a [`RetryPolicy`], and gathers the results in a
//! [`RowAggregator`].
//!
//! # Failure Model
//!
//! Every read returns a [`FetchError`] that is either transient (the connection
//! dropped, or the body was cut short) or permanent. Transient failures are
//! retried with a linear backoff; once retries are exhausted, or on any
//! permanent failure, the affected project is logged and left out of the
//! report. Only the initial project listing is fatal.

mod collector;
mod fetch_error;
mod metrics_source;
mod retry;
mod row;
mod row_aggregator;
pub mod sonarcloud;
mod throttler;

pub use collector::{Collector, DEFAULT_MAX_CONCURRENT_PROJECTS};
pub use fetch_error::FetchError;
pub use metrics_source::MetricsSource;
pub use retry::RetryPolicy;
pub use row::{HEADER, Row, normalize_analysis_date};
pub use row_aggregator::RowAggregator;
pub use throttler::Throttler;
