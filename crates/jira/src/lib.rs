//! Jira REST API client for the Terraform provider.
//!
//! This crate provides:
//! - Client configuration from provider attributes or `JIRA_*` environment variables
//! - An authenticated request helper with typed error classification
//! - Wire models for the Jira REST v2 resources the provider manages
//! - Typed helpers for issues, comments, transitions, links and JQL search
//!
//! # Example
//!
//! ```no_run
//! use jira::{ClientConfig, JiraClient};
//!
//! # async fn example() -> Result<(), jira::JiraError> {
//! let client = JiraClient::new(ClientConfig::from_env()?)?;
//! let issue = client.get_issue("PROJ-1").await?;
//! println!("Issue: {}", issue.key);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every API call can fail

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod issues;
pub mod models;

pub use client::JiraClient;
pub use config::{Auth, ClientConfig};
pub use error::{JiraError, Result};
pub use reqwest::Method;
