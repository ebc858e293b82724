//! Data source `jira_field`: look up a field by its display name.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use jira::models::Field;
use jira::JiraClient;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::resource::DataSource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

/// Field lookup.
///
/// The field list is fetched once per instance and reused for every
/// lookup after that.
#[derive(Debug, Default)]
pub struct FieldDataSource {
    fields: OnceCell<Vec<Field>>,
}

impl FieldDataSource {
    async fn fields(&self, client: &JiraClient) -> Result<&[Field]> {
        let fields = self
            .fields
            .get_or_try_init(|| async {
                debug!("Fetching jira field list");
                client.list_fields().await
            })
            .await
            .context("fetching jira fields failed")?;
        Ok(fields.as_slice())
    }
}

#[async_trait]
impl DataSource for FieldDataSource {
    fn name(&self) -> &'static str {
        "jira_field"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("clause_names", Attribute::string_list().computed())
            .attr("custom", Attribute::bool().computed())
            .attr("id", Attribute::string().computed())
            .attr("key", Attribute::string().computed())
            .attr("navigable", Attribute::bool().computed())
            .attr("searchable", Attribute::bool().computed())
    }

    #[instrument(skip_all, fields(name = %d.get_str("name")))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let name = d.get_str("name").to_string();
        let field = self
            .fields(client)
            .await?
            .iter()
            .find(|field| field.name == name)
            .cloned()
            .ok_or_else(|| anyhow!("field with name '{name}' not found"))?;

        d.set_id(field.id.clone());
        d.set("clause_names", field.clause_names);
        d.set("custom", field.custom);
        d.set("id", field.id);
        d.set("key", field.key);
        d.set("navigable", field.navigable);
        d.set("searchable", field.searchable);
        Ok(())
    }
}
