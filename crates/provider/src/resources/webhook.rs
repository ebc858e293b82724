//! `jira_webhook`: webhooks with an optional JQL filter.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{Webhook, WebhookFilters};
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::instrument;

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct WebhookResource;

fn webhook_request(d: &ResourceData) -> Webhook {
    Webhook {
        self_url: String::new(),
        name: d.get_str("name").to_string(),
        url: d.get_str("url").to_string(),
        events: d.get_string_list("events"),
        filters: WebhookFilters {
            jql: d.get_str("jql").to_string(),
        },
        exclude_body: d.get_bool("exclude_body"),
    }
}

/// The ID is the last segment of the webhook's `self` link.
fn set_webhook_state(webhook: Webhook, d: &mut ResourceData) {
    let id = endpoints::last_segment(&webhook.self_url);
    if !id.is_empty() {
        d.set_id(id);
    }
    d.set("name", webhook.name);
    d.set("url", webhook.url);
    d.set("events", webhook.events);
    d.set("exclude_body", webhook.exclude_body);
    d.set("jql", webhook.filters.jql);
}

#[async_trait]
impl Resource for WebhookResource {
    fn name(&self) -> &'static str {
        "jira_webhook"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("url", Attribute::string().required())
            .attr("jql", Attribute::string().optional().default_value(""))
            .attr("events", Attribute::string_list().optional())
            .attr("exclude_body", Attribute::bool().optional().default_value(false))
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let created: Webhook = client
            .post(endpoints::WEBHOOK, &webhook_request(d))
            .await
            .context("creating webhook failed")?;

        set_webhook_state(created, d);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let webhook: Webhook = client
            .get(&endpoints::item(endpoints::WEBHOOK, d.id()))
            .await
            .context("getting webhook failed")?;

        set_webhook_state(webhook, d);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let _: Value = client
            .put(&endpoints::item(endpoints::WEBHOOK, d.id()), &webhook_request(d))
            .await
            .context("updating webhook failed")?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::WEBHOOK, d.id()))
            .await
            .context("deleting webhook failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
