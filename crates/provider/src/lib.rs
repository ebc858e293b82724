//! Terraform provider core for Jira.
//!
//! This crate provides:
//! - A declarative attribute [`Schema`] with validation and plan diffs
//! - [`ResourceData`], the per-operation view over config and prior state
//! - The [`Resource`] and [`DataSource`] traits and every `jira_*` handler
//! - A [`Provider`] registry that configures an authenticated [`jira::JiraClient`]
//!
//! # Example
//!
//! ```no_run
//! use provider::{Provider, ResourceData};
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Provider::new();
//! let config = json!({ "url": "https://jira.example.com", "pat_token": "secret" });
//! let client = provider.configure(config.as_object().cloned().unwrap_or_default())?;
//!
//! let resource = provider.resource("jira_group").expect("registered");
//! let input = json!({ "name": "developers" });
//! let mut d = ResourceData::from_config(
//!     &resource.schema(),
//!     input.as_object().cloned().unwrap_or_default(),
//! );
//! resource.create(&client, &mut d).await?;
//! println!("Created group {}", d.id());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every handler talks to Jira

pub mod custom_fields;
pub mod data_sources;
pub mod diff;
pub mod provider;
pub mod resource;
pub mod resource_data;
pub mod resources;
pub mod schema;
pub mod transitions;

pub use provider::Provider;
pub use resource::{DataSource, Resource};
pub use resource_data::ResourceData;
pub use schema::{Attribute, AttributeType, Schema, SchemaError};
