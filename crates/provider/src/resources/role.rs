//! `jira_role`: global project roles.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::Role;
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::instrument;

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct RoleResource;

fn role_request(d: &ResourceData) -> Role {
    Role {
        id: 0,
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
    }
}

fn set_role_state(role: Role, d: &mut ResourceData) {
    d.set_id(role.id.to_string());
    d.set("name", role.name);
    d.set("description", role.description);
}

#[async_trait]
impl Resource for RoleResource {
    fn name(&self) -> &'static str {
        "jira_role"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let created: Role = client
            .post(endpoints::ROLE, &role_request(d))
            .await
            .context("creating role failed")?;

        set_role_state(created, d);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let role: Role = client
            .get(&endpoints::item(endpoints::ROLE, d.id()))
            .await
            .context("getting role failed")?;

        set_role_state(role, d);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let _: Value = client
            .put(&endpoints::item(endpoints::ROLE, d.id()), &role_request(d))
            .await
            .context("updating role failed")?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::ROLE, d.id()))
            .await
            .context("deleting role failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
