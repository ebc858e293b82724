//! Provider schema, configuration and the resource registry.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use jira::config::{
    custom_header, ENV_CUSTOM_AUTH_HEADER_KEY, ENV_CUSTOM_AUTH_HEADER_VALUE, ENV_PASSWORD,
    ENV_PAT_TOKEN, ENV_URL, ENV_USER,
};
use jira::{Auth, ClientConfig, JiraClient};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::data_sources::{FieldDataSource, JqlDataSource, ProjectCategoryDataSource};
use crate::resource::{DataSource, Resource};
use crate::resource_data::ResourceData;
use crate::resources::{
    CommentResource, ComponentResource, CustomFieldResource, FilterResource,
    GroupMembershipResource, GroupResource, IssueLinkResource, IssueLinkTypeResource,
    IssueResource, IssueTypeResource, IssueTypeSchemeResource, ProjectCategoryResource,
    ProjectMembershipResource, ProjectResource, RoleResource, UserResource, WebhookResource,
};
use crate::schema::{Attribute, Schema};

/// The Jira provider: its configuration schema and every resource and
/// data source it serves.
pub struct Provider {
    resources: HashMap<&'static str, Arc<dyn Resource>>,
    data_sources: HashMap<&'static str, Arc<dyn DataSource>>,
}

impl Provider {
    /// Create a provider with every resource and data source registered.
    #[must_use]
    pub fn new() -> Self {
        let mut provider = Self {
            resources: HashMap::new(),
            data_sources: HashMap::new(),
        };

        let resources: Vec<Arc<dyn Resource>> = vec![
            Arc::new(CommentResource),
            Arc::new(ComponentResource),
            Arc::new(CustomFieldResource::default()),
            Arc::new(FilterResource),
            Arc::new(GroupResource),
            Arc::new(GroupMembershipResource),
            Arc::new(IssueResource),
            Arc::new(IssueLinkResource),
            Arc::new(IssueLinkTypeResource),
            Arc::new(IssueTypeResource),
            Arc::new(IssueTypeSchemeResource),
            Arc::new(ProjectResource),
            Arc::new(ProjectCategoryResource),
            Arc::new(ProjectMembershipResource),
            Arc::new(RoleResource),
            Arc::new(UserResource),
            Arc::new(WebhookResource),
        ];
        for resource in resources {
            provider.register_resource(resource);
        }

        let data_sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(FieldDataSource::default()),
            Arc::new(JqlDataSource),
            Arc::new(ProjectCategoryDataSource),
        ];
        for data_source in data_sources {
            provider.register_data_source(data_source);
        }

        provider
    }

    pub fn register_resource(&mut self, resource: Arc<dyn Resource>) {
        self.resources.insert(resource.name(), resource);
    }

    pub fn register_data_source(&mut self, data_source: Arc<dyn DataSource>) {
        self.data_sources.insert(data_source.name(), data_source);
    }

    /// Provider-level attributes, each falling back to its `JIRA_*` variable.
    #[must_use]
    pub fn schema() -> Schema {
        Schema::new()
            .attr(
                "url",
                Attribute::string()
                    .required()
                    .env_default(ENV_URL)
                    .description("Base url of the JIRA instance."),
            )
            .attr(
                "user",
                Attribute::string()
                    .optional()
                    .env_default(ENV_USER)
                    .description("User to be used"),
            )
            .attr(
                "password",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .env_default(ENV_PASSWORD)
                    .description("Password/API Key of the user"),
            )
            .attr(
                "pat_token",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .env_default(ENV_PAT_TOKEN)
                    .description("PAT token of the user"),
            )
            .attr(
                "custom_auth_header_key",
                Attribute::string()
                    .optional()
                    .env_default(ENV_CUSTOM_AUTH_HEADER_KEY)
                    .description("Set a custom header key"),
            )
            .attr(
                "custom_auth_header_value",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .env_default(ENV_CUSTOM_AUTH_HEADER_VALUE)
                    .description("Set the value for the custom header"),
            )
    }

    /// Validate provider attributes and build an authenticated client.
    #[instrument(skip_all)]
    pub fn configure(&self, attributes: Map<String, Value>) -> Result<JiraClient> {
        let schema = Self::schema();
        schema.validate(&attributes).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow!("invalid provider configuration: {}", messages.join("; "))
        })?;

        let d = ResourceData::from_config(&schema, attributes);
        let config = client_config(&d)?;
        info!(url = %config.base_url, "Creating Jira client");

        JiraClient::new(config).context("creating jira client failed")
    }

    #[must_use]
    pub fn resource(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.resources.get(name).cloned()
    }

    #[must_use]
    pub fn data_source(&self, name: &str) -> Option<Arc<dyn DataSource>> {
        self.data_sources.get(name).cloned()
    }

    /// Registered resource type names, sorted.
    #[must_use]
    pub fn resource_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered data source type names, sorted.
    #[must_use]
    pub fn data_source_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.data_sources.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

fn client_config(d: &ResourceData) -> Result<ClientConfig> {
    let owned = |key: &str| d.get_ok(key).and_then(Value::as_str).map(ToString::to_string);

    let auth = Auth::resolve(owned("user"), owned("password"), owned("pat_token"));
    let header = custom_header(
        owned("custom_auth_header_key"),
        owned("custom_auth_header_value"),
    )?;

    Ok(ClientConfig {
        base_url: d.get_str("url").to_string(),
        auth,
        custom_header: header,
    })
}
