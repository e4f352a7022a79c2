mod client;

pub use client::{Branch, BranchStatus, Client, Contributor, DEFAULT_BASE_URL, Project, PullRequest};
