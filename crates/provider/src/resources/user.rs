//! `jira_user`: users, identified by their key.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::User;
use jira::{endpoints, JiraClient};
use tracing::{info, instrument};

use crate::diff;
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct UserResource;

#[async_trait]
impl Resource for UserResource {
    fn name(&self) -> &'static str {
        "jira_user"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required().force_new())
            .attr("email", Attribute::string().required().force_new())
            .attr(
                "display_name",
                Attribute::string()
                    .optional()
                    .force_new()
                    .diff_suppress(diff::username_fallback)
                    .description("Defaults to the user name"),
            )
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let name = d.get_str("name").to_string();
        let display_name = match d.get_str("display_name") {
            "" => name.clone(),
            display_name => display_name.to_string(),
        };

        let user = User {
            key: String::new(),
            name,
            email_address: d.get_str("email").to_string(),
            display_name,
        };
        let created: User = client
            .post(endpoints::USER, &user)
            .await
            .context("creating jira user failed")?;
        info!(key = %created.key, "Created user");

        d.set_id(created.key);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let key = d.id().to_string();
        let user: User = client
            .get_with_query(endpoints::USER, &[("key", key.as_str())])
            .await
            .context("getting jira user failed")?;

        d.set("name", user.name);
        d.set("display_name", user.display_name);
        d.set("email", user.email_address);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete_with_query(endpoints::USER, &[("key", d.id())])
            .await
            .context("deleting jira user failed")
    }
}
