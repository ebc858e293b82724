//! `jira_issue_link_type`: link type with its inward and outward phrasing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::IssueLinkType;
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::instrument;

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct IssueLinkTypeResource;

fn link_type_request(d: &ResourceData) -> IssueLinkType {
    IssueLinkType {
        id: String::new(),
        name: d.get_str("name").to_string(),
        inward: d.get_str("inward").to_string(),
        outward: d.get_str("outward").to_string(),
    }
}

#[async_trait]
impl Resource for IssueLinkTypeResource {
    fn name(&self) -> &'static str {
        "jira_issue_link_type"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("inward", Attribute::string().required())
            .attr("outward", Attribute::string().required())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let created: IssueLinkType = client
            .post(endpoints::ISSUE_LINK_TYPE, &link_type_request(d))
            .await
            .context("creating issue link type failed")?;

        d.set_id(created.id);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let link_type: IssueLinkType = client
            .get(&endpoints::item(endpoints::ISSUE_LINK_TYPE, d.id()))
            .await
            .context("getting issue link type failed")?;

        d.set("name", link_type.name);
        d.set("inward", link_type.inward);
        d.set("outward", link_type.outward);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let _: Value = client
            .put(
                &endpoints::item(endpoints::ISSUE_LINK_TYPE, d.id()),
                &link_type_request(d),
            )
            .await
            .context("updating issue link type failed")?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::ISSUE_LINK_TYPE, d.id()))
            .await
            .context("deleting issue link type failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
