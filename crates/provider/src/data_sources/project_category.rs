//! Data source `jira_project_category`: a project category by ID.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::ProjectCategory;
use jira::{endpoints, JiraClient};
use tracing::instrument;

use crate::resource::DataSource;
use crate::resource_data::ResourceData;
use crate::resources::project_category::set_category_state;
use crate::schema::{Attribute, Schema};

pub struct ProjectCategoryDataSource;

#[async_trait]
impl DataSource for ProjectCategoryDataSource {
    fn name(&self) -> &'static str {
        "jira_project_category"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "project_id",
                Attribute::string()
                    .required()
                    .description("ID of the project category"),
            )
            .attr("name", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
    }

    #[instrument(skip_all, fields(project_id = %d.get_str("project_id")))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let category: ProjectCategory = client
            .get(&endpoints::item(
                endpoints::PROJECT_CATEGORY,
                d.get_str("project_id"),
            ))
            .await
            .context("getting project category failed")?;

        set_category_state(category, d);
        Ok(())
    }
}
