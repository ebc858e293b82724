//! `jira_project_category`: categories that group projects.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::ProjectCategory;
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::instrument;

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct ProjectCategoryResource;

fn category_request(d: &ResourceData) -> ProjectCategory {
    ProjectCategory {
        id: String::new(),
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
    }
}

/// Copy a category into state; shared with the `jira_project_category` data source.
pub(crate) fn set_category_state(category: ProjectCategory, d: &mut ResourceData) {
    d.set_id(category.id);
    d.set("name", category.name);
    d.set("description", category.description);
}

#[async_trait]
impl Resource for ProjectCategoryResource {
    fn name(&self) -> &'static str {
        "jira_project_category"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let created: ProjectCategory = client
            .post(endpoints::PROJECT_CATEGORY, &category_request(d))
            .await
            .context("creating project category failed")?;

        set_category_state(created, d);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let category: ProjectCategory = client
            .get(&endpoints::item(endpoints::PROJECT_CATEGORY, d.id()))
            .await
            .context("getting project category failed")?;

        set_category_state(category, d);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let _: Value = client
            .put(
                &endpoints::item(endpoints::PROJECT_CATEGORY, d.id()),
                &category_request(d),
            )
            .await
            .context("updating project category failed")?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::PROJECT_CATEGORY, d.id()))
            .await
            .context("deleting project category failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
