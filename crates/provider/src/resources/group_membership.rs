//! `jira_group_membership`: a user's membership in a group.
//!
//! The ID is `username:group`.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use jira::models::{Group, UserGroups};
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::instrument;

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct GroupMembershipResource;

fn membership_id(username: &str, group: &str) -> String {
    format!("{username}:{group}")
}

/// Split an ID at its first `:`; group names may contain colons.
fn parse_membership_id(id: &str) -> Result<(&str, &str)> {
    id.split_once(':')
        .ok_or_else(|| anyhow!("invalid group membership id '{id}', expected username:group"))
}

#[async_trait]
impl Resource for GroupMembershipResource {
    fn name(&self) -> &'static str {
        "jira_group_membership"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("username", Attribute::string().required().force_new())
            .attr("group", Attribute::string().required().force_new())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let username = d.get_str("username").to_string();
        let group = d.get_str("group").to_string();

        let _: Value = client
            .post_with_query(
                endpoints::GROUP_USER,
                &[("groupname", group.as_str())],
                &Group {
                    name: username.clone(),
                },
            )
            .await
            .context("adding user to jira group failed")?;

        d.set_id(membership_id(&username, &group));
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let id = d.id().to_string();
        let (username, group) = parse_membership_id(&id)?;

        let user: UserGroups = client
            .get_with_query(endpoints::USER, &[("username", username), ("expand", "groups")])
            .await
            .context("getting jira user groups failed")?;

        d.set("username", username);
        d.set("group", group);

        if !user.groups.items.iter().any(|g| g.name == group) {
            bail!("Cannot find group {group}");
        }
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete_with_query(
                endpoints::GROUP_USER,
                &[("username", d.get_str("username")), ("groupname", d.get_str("group"))],
            )
            .await
            .context("removing user from jira group failed")
    }

    fn importable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_id_round_trip() {
        let id = membership_id("jdoe", "team:backend");
        assert_eq!(parse_membership_id(&id).unwrap(), ("jdoe", "team:backend"));
    }

    #[test]
    fn test_malformed_id_is_rejected() {
        assert!(parse_membership_id("jdoe").is_err());
    }
}
