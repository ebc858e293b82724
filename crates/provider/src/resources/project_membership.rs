//! `jira_project_membership`: a user or group holding a role in a project.
//!
//! The ID is the role actor's numeric ID.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use jira::models::{ProjectRole, RoleActor, RoleActorsRequest, ACTOR_TYPE_GROUP, ACTOR_TYPE_USER};
use jira::{endpoints, JiraClient};
use tracing::{instrument, warn};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

pub struct ProjectMembershipResource;

/// Who the membership is for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Member {
    User(String),
    Group(String),
}

impl Member {
    fn from_data(d: &ResourceData) -> Result<Self> {
        match (d.get_str("username"), d.get_str("group")) {
            ("", "") => bail!("Neither username nor group is set"),
            (username, "") => Ok(Self::User(username.to_string())),
            ("", group) => Ok(Self::Group(group.to_string())),
            _ => bail!("only one of username or group may be set"),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::User(name) | Self::Group(name) => name,
        }
    }

    fn actor_type(&self) -> &'static str {
        match self {
            Self::User(_) => ACTOR_TYPE_USER,
            Self::Group(_) => ACTOR_TYPE_GROUP,
        }
    }

    fn request(&self) -> RoleActorsRequest {
        match self {
            Self::User(name) => RoleActorsRequest {
                user: vec![name.clone()],
                group: Vec::new(),
            },
            Self::Group(name) => RoleActorsRequest {
                user: Vec::new(),
                group: vec![name.clone()],
            },
        }
    }

    fn query(&self) -> (&'static str, &str) {
        match self {
            Self::User(name) => ("user", name),
            Self::Group(name) => ("group", name),
        }
    }

    fn matches(&self, actor: &RoleActor) -> bool {
        actor.name == self.name() && (actor.actor_type.is_empty() || actor.actor_type == self.actor_type())
    }
}

fn role_endpoint(d: &ResourceData) -> String {
    endpoints::project_role(d.get_str("project_key"), d.get_i64("role_id"))
}

#[async_trait]
impl Resource for ProjectMembershipResource {
    fn name(&self) -> &'static str {
        "jira_project_membership"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("project_key", Attribute::string().required().force_new())
            .attr("role_id", Attribute::int().required().force_new())
            .attr(
                "username",
                Attribute::string()
                    .optional()
                    .force_new()
                    .conflicts_with(&["group"]),
            )
            .attr(
                "group",
                Attribute::string()
                    .optional()
                    .force_new()
                    .conflicts_with(&["username"]),
            )
    }

    /// The role's full actor list comes back; the new actor is the one
    /// matching the requested name.
    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let member = Member::from_data(d)?;

        let role: ProjectRole = client
            .post(&role_endpoint(d), &member.request())
            .await
            .context("adding project role actor failed")?;

        let actor = role
            .actors
            .iter()
            .find(|actor| member.matches(actor))
            .ok_or_else(|| anyhow!("role actor {} missing from response", member.name()))?;

        d.set_id(actor.id.to_string());
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let role: ProjectRole = client
            .get(&role_endpoint(d))
            .await
            .context("getting project role failed")?;

        let actor = role
            .actors
            .into_iter()
            .find(|actor| actor.id.to_string() == d.id());

        match actor {
            Some(actor) if actor.actor_type == ACTOR_TYPE_USER => d.set("username", actor.name),
            Some(actor) if actor.actor_type == ACTOR_TYPE_GROUP => d.set("group", actor.name),
            Some(_) => {}
            None => {
                warn!(id = %d.id(), "Project role actor no longer exists");
                d.clear_id();
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let Ok(member) = Member::from_data(d) else {
            return Ok(());
        };

        let (key, value) = member.query();
        client
            .delete_with_query(&role_endpoint(d), &[(key, value)])
            .await
            .context("removing project role actor failed")
    }

    fn importable(&self) -> bool {
        true
    }
}
