//! `jira_issue_link`: a typed link between two issues.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{IssueKeyRef, IssueLink, IssueLinkTypeRef};
use jira::{endpoints, JiraClient};
use tracing::{info, instrument};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct IssueLinkResource;

#[async_trait]
impl Resource for IssueLinkResource {
    fn name(&self) -> &'static str {
        "jira_issue_link"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("inward_key", Attribute::string().required().force_new())
            .attr("outward_key", Attribute::string().required().force_new())
            .attr(
                "link_type",
                Attribute::string()
                    .required()
                    .force_new()
                    .description("ID of the issue link type"),
            )
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let link = IssueLink {
            id: String::new(),
            link_type: IssueLinkTypeRef {
                id: d.get_str("link_type").to_string(),
            },
            inward_issue: IssueKeyRef {
                key: d.get_str("inward_key").to_string(),
            },
            outward_issue: IssueKeyRef {
                key: d.get_str("outward_key").to_string(),
            },
        };

        let id = client
            .create_issue_link(&link)
            .await
            .context("creating issue link failed")?;
        info!(id = %id, "Created issue link");

        d.set_id(id);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let link: IssueLink = client
            .get(&endpoints::item(endpoints::ISSUE_LINK, d.id()))
            .await
            .context("getting issue link failed")?;

        d.set("inward_key", link.inward_issue.key);
        d.set("outward_key", link.outward_issue.key);
        d.set("link_type", link.link_type.id);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::ISSUE_LINK, d.id()))
            .await
            .context("deleting issue link failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
