#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for sonarcloud-report
//!
//! Collects the main-branch quality metrics of every project in a SonarCloud
//! organization, flattens them into one row per project, and publishes the rows
//! as a CSV attachment on a Confluence page.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, configuration, and orchestration
//! - [`facts`]: SonarCloud client and concurrent per-project collection
//! - [`reports`]: CSV generation and attachment upload

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod facts;
pub mod reports;

pub use crate::commands::{Host, run};
