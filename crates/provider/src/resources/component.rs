//! `jira_component`: project components.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{Component, ComponentRequest};
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::diff;
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

const ASSIGNEE_TYPES: [&str; 4] = [
    "project_default",
    "component_lead",
    "project_lead",
    "unassigned",
];

pub struct ComponentResource;

fn validate_assignee_type(value: &Value) -> std::result::Result<(), String> {
    let kind = value.as_str().unwrap_or_default().to_lowercase();
    if ASSIGNEE_TYPES.contains(&kind.as_str()) {
        Ok(())
    } else {
        Err("assigneeType needs to be one of project_default, component_lead, project_lead or unassigned".to_string())
    }
}

/// Jira expects the assignee type upper-cased.
fn component_request(d: &ResourceData) -> ComponentRequest {
    ComponentRequest {
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
        project: d.get_str("project_key").to_string(),
        assignee_type: d.get_str("assignee_type").to_uppercase(),
        lead_user_name: d.get_str("lead").to_string(),
    }
}

#[async_trait]
impl Resource for ComponentResource {
    fn name(&self) -> &'static str {
        "jira_component"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr(
                "assignee_type",
                Attribute::string()
                    .optional()
                    .default_value("project_default")
                    .validate(validate_assignee_type)
                    .diff_suppress(diff::case_insensitive),
            )
            .attr("lead", Attribute::string().optional())
            .attr("project_key", Attribute::string().required().force_new())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let created: Component = client
            .post(endpoints::COMPONENT, &component_request(d))
            .await
            .context("creating component failed")?;

        d.set_id(created.id);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let component: Component = match client
            .get(&endpoints::item(endpoints::COMPONENT, d.id()))
            .await
        {
            Ok(component) => component,
            Err(e) if e.is_not_found() => {
                warn!(id = %d.id(), "Component no longer exists");
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e).context("getting component failed"),
        };

        d.set_id(component.id);
        d.set("name", component.name);
        d.set("description", component.description);
        d.set("project_key", component.project);
        d.set("assignee_type", component.assignee_type);
        d.set("lead", component.lead.map(|lead| lead.name).unwrap_or_default());
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let _: Value = client
            .put(&endpoints::item(endpoints::COMPONENT, d.id()), &component_request(d))
            .await
            .context("updating component failed")?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::COMPONENT, d.id()))
            .await
            .context("deleting component failed")
    }

    fn importable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn test_assignee_type_validation_ignores_case() {
        assert!(validate_assignee_type(&json!("PROJECT_LEAD")).is_ok());
        assert!(validate_assignee_type(&json!("component_lead")).is_ok());
        assert!(validate_assignee_type(&json!("nobody")).is_err());
    }

    #[test]
    fn test_request_upper_cases_assignee_type() {
        let config: Map<String, Value> = json!({"name": "Backend", "project_key": "PROJ"})
            .as_object()
            .cloned()
            .unwrap();
        let d = ResourceData::from_config(&ComponentResource.schema(), config);
        let request = component_request(&d);
        assert_eq!(request.assignee_type, "PROJECT_DEFAULT");
        assert_eq!(request.project, "PROJ");
        assert!(request.lead_user_name.is_empty());
    }
}
