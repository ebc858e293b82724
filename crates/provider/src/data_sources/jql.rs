//! Data source `jira_jql`: keys of every issue matching a JQL query.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::JiraClient;
use tracing::instrument;

use crate::resource::DataSource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct JqlDataSource;

#[async_trait]
impl DataSource for JqlDataSource {
    fn name(&self) -> &'static str {
        "jira_jql"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("jql", Attribute::string().required())
            .attr("issue_keys", Attribute::string_list().computed())
    }

    #[instrument(skip_all)]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let jql = d.get_str("jql").to_string();
        let keys = client
            .search_issue_keys(&jql)
            .await
            .context("searching jira issues failed")?;

        d.set_id(jql);
        d.set("issue_keys", keys);
        Ok(())
    }
}
