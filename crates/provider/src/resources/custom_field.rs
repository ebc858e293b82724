//! `jira_custom_field`: create-only custom field definitions.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use jira::models::{CustomFieldRequest, Field};
use jira::{endpoints, JiraClient};
use tracing::{debug, info, instrument};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

/// Custom field resource.
///
/// A freshly created field can take a moment to show up in the field list,
/// so create polls the read a bounded number of times.
#[derive(Debug, Clone)]
pub struct CustomFieldResource {
    pub read_attempts: u32,
    pub read_interval: Duration,
}

impl Default for CustomFieldResource {
    fn default() -> Self {
        Self {
            read_attempts: 5,
            read_interval: Duration::from_millis(200),
        }
    }
}

async fn find_field(client: &JiraClient, id: &str) -> Result<Field> {
    let fields = client
        .list_fields()
        .await
        .context("getting jira fields failed")?;
    fields
        .into_iter()
        .find(|field| field.id == id)
        .ok_or_else(|| anyhow!("Custom Field {id} not found"))
}

#[async_trait]
impl Resource for CustomFieldResource {
    fn name(&self) -> &'static str {
        "jira_custom_field"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required().force_new())
            .attr("type", Attribute::string().required().force_new())
            .attr("description", Attribute::string().optional().force_new())
            .attr("searcher_key", Attribute::string().required().force_new())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let request = CustomFieldRequest {
            name: d.get_str("name").to_string(),
            description: d.get_str("description").to_string(),
            kind: d.get_str("type").to_string(),
            searcher_key: d.get_str("searcher_key").to_string(),
        };
        let created: Field = client
            .post(endpoints::FIELD, &request)
            .await
            .context("creating custom field failed")?;
        info!(id = %created.id, "Created custom field");
        d.set_id(created.id);

        let mut attempt = 1;
        loop {
            match self.read(client, d).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= self.read_attempts => return Err(e),
                Err(e) => {
                    debug!(attempt, error = %e, "Custom field not readable yet");
                    attempt += 1;
                    tokio::time::sleep(self.read_interval).await;
                }
            }
        }
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let field = find_field(client, d.id()).await?;
        debug!(id = %field.id, "Read custom field");
        d.set("name", field.name);
        Ok(())
    }

    async fn delete(&self, _client: &JiraClient, _d: &mut ResourceData) -> Result<()> {
        bail!("There is no way to delete a custom field via REST API")
    }
}
