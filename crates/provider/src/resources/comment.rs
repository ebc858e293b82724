//! `jira_comment`: a comment on an issue.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::JiraClient;
use tracing::{instrument, warn};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct CommentResource;

#[async_trait]
impl Resource for CommentResource {
    fn name(&self) -> &'static str {
        "jira_comment"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("body", Attribute::string().required())
            .attr("issue_key", Attribute::string().required().force_new())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let comment = client
            .add_comment(d.get_str("issue_key"), d.get_str("body"))
            .await
            .context("creating jira comment failed")?;

        d.set_id(comment.id);
        self.read(client, d).await
    }

    /// Comments are found through their issue; a comment missing from it is gone.
    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let issue = client
            .get_issue(d.get_str("issue_key"))
            .await
            .context("getting jira issue failed")?;

        let comment = issue
            .fields
            .comment
            .unwrap_or_default()
            .comments
            .into_iter()
            .find(|c| c.id == d.id());

        match comment {
            Some(comment) => d.set("body", comment.body),
            None => {
                warn!(id = %d.id(), "Comment no longer exists");
                d.clear_id();
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let comment = client
            .update_comment(d.get_str("issue_key"), d.id(), d.get_str("body"))
            .await
            .context("updating jira comment failed")?;

        d.set_id(comment.id);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete_comment(d.get_str("issue_key"), d.id())
            .await
            .context("deleting jira comment failed")
    }
}
