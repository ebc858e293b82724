//! `jira_project`: projects, optionally created from a shared configuration.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{NumericId, Project, ProjectRequest, SharedConfigurationProject};
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::{info, instrument};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct ProjectResource;

/// Scheme lookups read back into state, as (attribute, endpoint suffix).
const SCHEMES: [(&str, &str); 3] = [
    ("issue_security_scheme", "issuesecuritylevelscheme"),
    ("notification_scheme", "notificationscheme"),
    ("permission_scheme", "permissionscheme"),
];

fn project_request(d: &ResourceData) -> ProjectRequest {
    ProjectRequest {
        key: d.get_str("key").to_string(),
        name: d.get_str("name").to_string(),
        project_type_key: d.get_str("project_type_key").to_string(),
        project_template_key: d.get_str("project_template_key").to_string(),
        description: d.get_str("description").to_string(),
        lead: d.get_str("lead").to_string(),
        lead_account_id: d.get_str("lead_account_id").to_string(),
        url: d.get_str("url").to_string(),
        assignee_type: d.get_str("assignee_type").to_string(),
        avatar_id: d.get_i64("avatar_id"),
        issue_security_scheme: d.get_i64("issue_security_scheme"),
        permission_scheme: d.get_i64("permission_scheme"),
        notification_scheme: d.get_i64("notification_scheme"),
        category_id: d.get_i64("category_id"),
    }
}

/// ID of a scheme attached to the project, `None` when Jira has none.
async fn scheme_id(client: &JiraClient, project_id: &str, scheme: &str) -> Result<Option<i64>> {
    match client
        .get::<NumericId>(&endpoints::project_scheme(project_id, scheme))
        .await
    {
        Ok(found) => Ok(Some(found.id)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e).with_context(|| format!("getting {scheme} failed")),
    }
}

async fn put_project(client: &JiraClient, d: &ResourceData) -> Result<()> {
    let _: Value = client
        .put(&endpoints::item(endpoints::PROJECT, d.id()), &project_request(d))
        .await
        .context("updating jira project failed")?;
    Ok(())
}

#[async_trait]
impl Resource for ProjectResource {
    fn name(&self) -> &'static str {
        "jira_project"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("project_id", Attribute::int().computed())
            .attr("key", Attribute::string().required())
            .attr("name", Attribute::string().required())
            .attr(
                "shared_configuration_project_id",
                Attribute::int()
                    .optional()
                    .force_new()
                    .description("Create the project sharing this project's configuration"),
            )
            .attr("project_type_key", Attribute::string().optional())
            .attr("project_template_key", Attribute::string().optional())
            .attr("description", Attribute::string().optional())
            .attr("lead", Attribute::string().optional())
            .attr("lead_account_id", Attribute::string().optional())
            .attr("url", Attribute::string().optional())
            .attr("assignee_type", Attribute::string().optional().default_value("UNASSIGNED"))
            .attr("avatar_id", Attribute::int().optional())
            .attr("issue_security_scheme", Attribute::int().optional())
            .attr("permission_scheme", Attribute::int().optional())
            .attr("notification_scheme", Attribute::int().optional())
            .attr("category_id", Attribute::int().optional())
    }

    /// A shared-configuration create only takes key, name and lead; the
    /// remaining attributes are applied by a follow-up update.
    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let shared_id = d.get_i64("shared_configuration_project_id");

        if shared_id == 0 {
            let created: NumericId = client
                .post(endpoints::PROJECT, &project_request(d))
                .await
                .context("creating jira project failed")?;
            d.set_id(created.id.to_string());
        } else {
            let request = ProjectRequest {
                key: d.get_str("key").to_string(),
                name: d.get_str("name").to_string(),
                lead: d.get_str("lead").to_string(),
                lead_account_id: d.get_str("lead_account_id").to_string(),
                ..ProjectRequest::default()
            };
            let created: SharedConfigurationProject = client
                .post(&endpoints::project_with_shared_configuration(shared_id), &request)
                .await
                .context("creating jira project with shared configuration failed")?;
            d.set_id(created.project_id.to_string());

            put_project(client, d).await?;
        }

        info!(id = %d.id(), key = %d.get_str("key"), "Created project");
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let id = d.id().to_string();
        let project: Project = client
            .get(&endpoints::item(endpoints::PROJECT, &id))
            .await
            .context("getting jira project failed")?;

        let lead = project.lead.unwrap_or_default();
        let category_id = project
            .project_category
            .and_then(|c| c.id.parse::<i64>().ok())
            .unwrap_or_default();

        d.set("project_id", id.parse::<i64>().unwrap_or_default());
        d.set("key", project.key);
        d.set("name", project.name);
        d.set("description", project.description);
        d.set("lead", lead.name);
        d.set("lead_account_id", lead.account_id);
        d.set("url", project.url);
        d.set("assignee_type", project.assignee_type);
        d.set("category_id", category_id);

        for (attribute, scheme) in SCHEMES {
            let value = scheme_id(client, &id, scheme).await?;
            d.set(attribute, value);
        }
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        put_project(client, d).await?;
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::PROJECT, d.id()))
            .await
            .context("deleting jira project failed")
    }
}
