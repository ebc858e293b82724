//! `jira_issue_type`: standard and sub-task issue types.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{IssueType, IssueTypeRequest};
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct IssueTypeResource;

fn kind(is_subtask: bool) -> &'static str {
    if is_subtask {
        "subtask"
    } else {
        "standard"
    }
}

async fn put_issue_type(client: &JiraClient, d: &ResourceData) -> Result<()> {
    // The type cannot change after creation, so updates leave it out.
    let request = IssueTypeRequest {
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
        kind: String::new(),
        avatar_id: d.get_i64("avatar_id"),
    };
    let _: Value = client
        .put(&endpoints::item(endpoints::ISSUE_TYPE, d.id()), &request)
        .await
        .context("updating issue type failed")?;
    Ok(())
}

#[async_trait]
impl Resource for IssueTypeResource {
    fn name(&self) -> &'static str {
        "jira_issue_type"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr("is_subtask", Attribute::bool().optional().default_value(false))
            .attr("avatar_id", Attribute::int().optional())
    }

    /// Jira ignores the avatar on create, so it is applied by a follow-up update.
    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let request = IssueTypeRequest {
            name: d.get_str("name").to_string(),
            description: d.get_str("description").to_string(),
            kind: kind(d.get_bool("is_subtask")).to_string(),
            avatar_id: 0,
        };
        let created: IssueType = client
            .post(endpoints::ISSUE_TYPE, &request)
            .await
            .context("creating issue type failed")?;
        d.set_id(created.id);

        if d.get_i64("avatar_id") > 0 {
            debug!(id = %d.id(), "Applying issue type avatar");
            put_issue_type(client, d).await?;
        }

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let issue_type: IssueType = client
            .get(&endpoints::item(endpoints::ISSUE_TYPE, d.id()))
            .await
            .context("getting issue type failed")?;

        d.set("name", issue_type.name);
        d.set("description", issue_type.description);
        d.set("is_subtask", issue_type.subtask);
        d.set("avatar_id", issue_type.avatar_id);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        put_issue_type(client, d).await?;
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::ISSUE_TYPE, d.id()))
            .await
            .context("deleting issue type failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
