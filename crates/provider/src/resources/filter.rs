//! `jira_filter`: saved JQL filters and their share permissions.

use std::hash::{Hash, Hasher};

use anyhow::{Context, Result};
use async_trait::async_trait;
use jira::models::{Filter, FilterRequest, SharePermission, SharePermissionRequest};
use jira::{endpoints, JiraClient};
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

const PERMISSION_TYPES: [&str; 5] = ["global", "group", "project", "project_role", "authenticated"];

pub struct FilterResource;

/// One share permission block.
///
/// Equality and hashing ignore the server-assigned `id`, so configured
/// blocks match the ones read back from Jira.
#[derive(Debug, Clone, Default, Eq)]
pub struct Permission {
    pub kind: String,
    pub project_id: String,
    pub project_role_id: String,
    pub group_name: String,
    pub id: String,
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.project_id == other.project_id
            && self.project_role_id == other.project_role_id
            && self.group_name == other.group_name
    }
}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.project_id.hash(state);
        self.project_role_id.hash(state);
        self.group_name.hash(state);
    }
}

impl Permission {
    fn from_block(block: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            block
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            kind: text("type"),
            project_id: text("project_id"),
            project_role_id: text("project_role_id"),
            group_name: text("group_name"),
            id: text("id"),
        }
    }

    /// Normalize a permission as Jira reports it.
    fn from_share(share: &SharePermission) -> Self {
        let kind = if share.kind == "loggedin" {
            "authenticated".to_string()
        } else {
            share.kind.clone()
        };
        Self {
            kind,
            project_id: share.project.as_ref().map(|p| p.id.clone()).unwrap_or_default(),
            project_role_id: share
                .role
                .as_ref()
                .map(|r| nonzero(r.id))
                .unwrap_or_default(),
            group_name: share.group.as_ref().map(|g| g.name.clone()).unwrap_or_default(),
            id: nonzero(share.id),
        }
    }

    fn to_block(&self) -> Value {
        json!({
            "type": self.kind,
            "project_id": self.project_id,
            "project_role_id": self.project_role_id,
            "group_name": self.group_name,
            "id": self.id,
        })
    }

    fn to_request(&self) -> SharePermissionRequest {
        SharePermissionRequest {
            kind: self.kind.clone(),
            project_id: self.project_id.clone(),
            group: self.group_name.clone(),
            project_role_id: self.project_role_id.clone(),
        }
    }
}

fn nonzero(id: i64) -> String {
    if id == 0 {
        String::new()
    } else {
        id.to_string()
    }
}

fn permissions(value: &Value) -> Vec<Permission> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .map(Permission::from_block)
            .collect(),
        _ => Vec::new(),
    }
}

/// Members of `a` that are not in `b`.
fn difference<'a>(a: &'a [Permission], b: &[Permission]) -> Vec<&'a Permission> {
    a.iter().filter(|p| !b.contains(p)).collect()
}

fn validate_permission_type(value: &Value) -> std::result::Result<(), String> {
    match value.as_str() {
        Some(kind) if PERMISSION_TYPES.contains(&kind) => Ok(()),
        _ => Err(
            "type needs to be one of global, group, project, project_role or authenticated"
                .to_string(),
        ),
    }
}

fn filter_request(d: &ResourceData) -> FilterRequest {
    FilterRequest {
        name: d.get_str("name").to_string(),
        description: d.get_str("description").to_string(),
        jql: d.get_str("jql").to_string(),
        favourite: d.get_bool("favourite"),
    }
}

fn set_filter_state(filter: Filter, d: &mut ResourceData) {
    let blocks: Vec<Value> = filter
        .share_permissions
        .iter()
        .map(|share| Permission::from_share(share).to_block())
        .collect();

    d.set_id(filter.id);
    d.set("name", filter.name);
    d.set("description", filter.description);
    d.set("jql", filter.jql);
    d.set("favourite", filter.favourite);
    d.set("permissions", blocks);
}

async fn add_permissions(client: &JiraClient, filter_id: &str, added: &[&Permission]) -> Result<()> {
    let endpoint = endpoints::filter_permissions(filter_id);
    for permission in added {
        let _: Value = client
            .post(&endpoint, &permission.to_request())
            .await
            .with_context(|| format!("adding {} permission to filter {filter_id} failed", permission.kind))?;
    }
    Ok(())
}

async fn revoke_permissions(client: &JiraClient, filter_id: &str, removed: &[&Permission]) -> Result<()> {
    for permission in removed {
        client
            .delete(&endpoints::filter_permission(filter_id, &permission.id))
            .await
            .with_context(|| format!("revoking permission {} of filter {filter_id} failed", permission.id))?;
    }
    Ok(())
}

#[async_trait]
impl Resource for FilterResource {
    fn name(&self) -> &'static str {
        "jira_filter"
    }

    fn schema(&self) -> Schema {
        let permission = Schema::new()
            .attr(
                "type",
                Attribute::string().required().validate(validate_permission_type),
            )
            .attr("project_id", Attribute::string().optional())
            .attr("project_role_id", Attribute::string().optional())
            .attr("group_name", Attribute::string().optional())
            .attr("id", Attribute::string().computed());

        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr("jql", Attribute::string().required())
            .attr("favourite", Attribute::bool().optional().default_value(false))
            .attr("permissions", Attribute::block_set(permission).optional())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let configured = permissions(d.get("permissions"));

        let filter: Filter = client
            .post(endpoints::FILTER, &filter_request(d))
            .await
            .context("creating jira filter failed")?;
        let filter_id = filter.id.clone();
        set_filter_state(filter, d);

        let added: Vec<&Permission> = configured.iter().collect();
        add_permissions(client, &filter_id, &added).await?;
        debug!(filter_id = %filter_id, permissions = added.len(), "Created filter");

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let filter: Filter = client
            .get(&endpoints::item(endpoints::FILTER, d.id()))
            .await
            .context("getting jira filter failed")?;
        set_filter_state(filter, d);
        Ok(())
    }

    /// Permissions change before the filter itself; a PUT first races in Jira.
    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let id = d.id().to_string();

        if self.schema().has_change(d, "permissions") {
            let (old, new) = d.get_change("permissions");
            let (old, new) = (permissions(&old), permissions(&new));

            revoke_permissions(client, &id, &difference(&old, &new)).await?;
            add_permissions(client, &id, &difference(&new, &old)).await?;
        }

        let _: Value = client
            .put(&endpoints::item(endpoints::FILTER, &id), &filter_request(d))
            .await
            .context("updating jira filter failed")?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::FILTER, d.id()))
            .await
            .context("deleting jira filter failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
