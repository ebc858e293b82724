//! `jira_issue`: issues with custom fields and workflow transitions.

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{Issue, IssueFields, NamedRef, ParentRef, ProjectRef, UserRef};
use jira::JiraClient;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::custom_fields::{render_custom_fields, to_wire};
use crate::diff;
use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};
use crate::transitions;

pub struct IssueResource;

#[async_trait]
impl Resource for IssueResource {
    fn name(&self) -> &'static str {
        "jira_issue"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "assignee",
                Attribute::string()
                    .optional()
                    .diff_suppress(diff::case_insensitive),
            )
            .attr(
                "reporter",
                Attribute::string()
                    .optional()
                    .diff_suppress(diff::unset_or_case_insensitive),
            )
            .attr("fields", Attribute::string_map().optional())
            .attr("issue_type", Attribute::string().required())
            .attr("description", Attribute::string().optional().default_value(""))
            .attr("labels", Attribute::string_list().optional())
            .attr("summary", Attribute::string().required())
            .attr("project_key", Attribute::string().required())
            .attr("parent", Attribute::string().optional().force_new())
            .attr(
                "state",
                Attribute::string()
                    .optional()
                    .diff_suppress(diff::unset_or_equal),
            )
            .attr(
                "state_transitions",
                Attribute::string_map()
                    .optional()
                    .description("Status ID to a JSON array of transition IDs leading to `state`"),
            )
            .attr(
                "delete_transitions",
                Attribute::string_map()
                    .optional()
                    .description("Status ID to a JSON array of transition IDs run instead of deleting"),
            )
            .attr("issue_key", Attribute::string().computed())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let fields = IssueFields {
            summary: Some(d.get_str("summary").to_string()),
            description: non_empty(d.get_str("description")),
            issue_type: Some(NamedRef {
                name: d.get_str("issue_type").to_string(),
            }),
            project: Some(ProjectRef {
                key: d.get_str("project_key").to_string(),
            }),
            assignee: non_empty(d.get_str("assignee")).map(UserRef::named),
            reporter: non_empty(d.get_str("reporter")).map(UserRef::named),
            parent: non_empty(d.get_str("parent")).map(|id| ParentRef {
                id,
                key: String::new(),
            }),
            labels: Some(d.get_string_list("labels")).filter(|l| !l.is_empty()),
            custom: to_wire(&d.get_string_map("fields")),
            ..IssueFields::default()
        };

        let created = client
            .create_issue(fields)
            .await
            .context("creating jira issue failed")?;
        info!(id = %created.id, key = %created.key, "Created issue");

        let issue = client
            .get_issue(&created.id)
            .await
            .context("getting jira issue failed")?;
        apply_state(client, d, &issue).await?;

        d.set_id(issue.id);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let issue = match client.get_issue(d.id()).await {
            Ok(issue) => issue,
            Err(e) if e.is_not_found() => {
                warn!(id = %d.id(), "Issue no longer exists");
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e).context("getting jira issue failed"),
        };

        let fields = issue.fields;
        if let Some(assignee) = fields.assignee {
            d.set("assignee", assignee.name);
        }
        if let Some(reporter) = fields.reporter {
            d.set("reporter", reporter.name);
        }
        if let Some(parent) = fields.parent {
            d.set("parent", parent.key);
        }

        if d.get_ok("fields").is_some() {
            let rendered = render_custom_fields(&d.get_string_map("fields"), &fields.custom);
            let rendered: Map<String, Value> = rendered
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            d.set("fields", rendered);
        }

        match fields.labels {
            Some(labels) if !labels.is_empty() => d.set("labels", labels),
            _ => d.set("labels", Value::Null),
        }

        d.set(
            "issue_type",
            fields.issue_type.map(|t| t.name).unwrap_or_default(),
        );
        if let Some(description) = fields.description.filter(|s| !s.is_empty()) {
            d.set("description", description);
        }
        d.set("summary", fields.summary.unwrap_or_default());
        d.set("project_key", fields.project.map(|p| p.key).unwrap_or_default());
        d.set("issue_key", issue.key);
        d.set("state", fields.status.map(|s| s.id).unwrap_or_default());

        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let mut fields = IssueFields::default();

        if d.has_change("issue_type") {
            fields.issue_type = Some(NamedRef {
                name: d.get_str("issue_type").to_string(),
            });
        }
        if d.has_change("description") {
            fields.description = Some(d.get_str("description").to_string());
        }
        if d.has_change("summary") {
            fields.summary = Some(d.get_str("summary").to_string());
        }
        if d.has_change("project_key") {
            fields.project = Some(ProjectRef {
                key: d.get_str("project_key").to_string(),
            });
        }
        if d.has_change("assignee") {
            fields.assignee = non_empty(d.get_str("assignee")).map(UserRef::named);
        }
        if d.has_change("reporter") {
            fields.reporter = non_empty(d.get_str("reporter")).map(UserRef::named);
        }
        if d.has_change("labels") {
            fields.labels = Some(d.get_string_list("labels"));
        }
        if d.has_change("fields") {
            fields.custom = to_wire(&d.get_string_map("fields"));
        }

        let id = d.id().to_string();
        client
            .update_issue(&id, fields)
            .await
            .context("updating jira issue failed")?;

        let issue = client
            .get_issue(&id)
            .await
            .context("getting jira issue failed")?;
        apply_state(client, d, &issue).await?;

        d.set_id(issue.id);
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let id = d.id().to_string();
        let delete_transitions = d.get_string_map("delete_transitions");

        if delete_transitions.is_empty() {
            return client
                .delete_issue(&id)
                .await
                .context("deleting jira issue failed");
        }

        let issue = match client.get_issue(&id).await {
            Ok(issue) => issue,
            Err(e) if e.is_not_found() => {
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e).context("getting jira issue failed"),
        };

        let sequence =
            transitions::sequence_for("delete_transitions", &delete_transitions, issue.status_id())?;
        transitions::walk(client, &id, &sequence)
            .await
            .context("transitioning on delete for jira issue failed")
    }

    fn importable(&self) -> bool {
        true
    }
}

/// Walk `state_transitions` from the issue's current status when `state`
/// asks for a different one.
async fn apply_state(client: &JiraClient, d: &ResourceData, issue: &Issue) -> Result<()> {
    let Some(desired) = d.get_ok("state").and_then(Value::as_str) else {
        return Ok(());
    };
    let current = issue.status_id();
    if current == desired {
        return Ok(());
    }

    let state_transitions = d.get_string_map("state_transitions");
    if state_transitions.is_empty() {
        return Ok(());
    }

    let sequence = transitions::sequence_for("state_transitions", &state_transitions, current)?;
    transitions::walk(client, &issue.id, &sequence).await
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema() {
        let schema = IssueResource.schema();
        assert!(schema.get("summary").unwrap().required);
        assert!(schema.get("parent").unwrap().force_new);
        assert!(schema.get("issue_key").unwrap().is_computed_only());
        assert!(schema.get("state").unwrap().diff_suppress.is_some());
        assert!(IssueResource.importable());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("alice"), Some("alice".to_string()));
    }
}
