//! `jira_group`: groups, identified by name.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::Group;
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::instrument;

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct GroupResource;

#[async_trait]
impl Resource for GroupResource {
    fn name(&self) -> &'static str {
        "jira_group"
    }

    fn schema(&self) -> Schema {
        Schema::new().attr("name", Attribute::string().required().force_new())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let group = Group {
            name: d.get_str("name").to_string(),
        };
        let _: Value = client
            .post(endpoints::GROUP, &group)
            .await
            .context("creating jira group failed")?;

        d.set_id(group.name);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let id = d.id().to_string();
        let _: Value = client
            .get_with_query(endpoints::GROUP_MEMBER, &[("groupname", id.as_str())])
            .await
            .context("getting jira group failed")?;

        d.set("name", id);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete_with_query(endpoints::GROUP, &[("groupname", d.get_str("name"))])
            .await
            .context("deleting jira group failed")
    }
}
