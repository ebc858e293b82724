//! `jira_issue_type_scheme`: issue type schemes and the projects using them.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use jira::models::{
    CreatedId, IssueTypeScheme, IssueTypeSchemeItemPage, IssueTypeSchemePage,
    Project, ProjectAssociationRequest,
};
use jira::{endpoints, JiraClient};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::resource::Resource;
use crate::resource_data::ResourceData;
use crate::schema::{Attribute, Schema};

/// Page size when listing a scheme's issue type mappings.
const MAPPING_PAGE_SIZE: usize = 200;

pub struct IssueTypeSchemeResource;

/// Issue type IDs mapped to a scheme, following `isLast` across pages.
async fn list_issue_type_ids(client: &JiraClient, scheme_id: &str) -> Result<Vec<String>> {
    let max_results = MAPPING_PAGE_SIZE.to_string();
    let mut ids = Vec::new();
    let mut start_at = 0usize;

    loop {
        let start = start_at.to_string();
        let page: IssueTypeSchemeItemPage = client
            .get_with_query(
                endpoints::ISSUE_TYPE_SCHEME_MAPPING,
                &[
                    ("startAt", start.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("issueTypeSchemeId", scheme_id),
                ],
            )
            .await?;

        let fetched = page.values.len();
        for item in page.values {
            if !ids.contains(&item.issue_type_id) {
                ids.push(item.issue_type_id);
            }
        }
        start_at += fetched;

        if page.is_last || fetched == 0 {
            break;
        }
    }

    Ok(ids)
}

async fn set_project_associations(client: &JiraClient, scheme_id: &str, project_ids: Vec<String>) -> Result<()> {
    let _: Value = client
        .put(
            &endpoints::issue_type_scheme_associations(scheme_id),
            &ProjectAssociationRequest {
                ids_or_keys: project_ids,
            },
        )
        .await
        .context("setting issue type scheme project associations failed")?;
    Ok(())
}

#[async_trait]
impl Resource for IssueTypeSchemeResource {
    fn name(&self) -> &'static str {
        "jira_issue_type_scheme"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required().force_new())
            .attr("description", Attribute::string().optional())
            .attr("issue_type_ids", Attribute::string_set().required().force_new())
            .attr("project_ids", Attribute::string_set().required().force_new())
            .attr("default_issue_type_id", Attribute::string().optional())
    }

    #[instrument(skip_all)]
    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let scheme = IssueTypeScheme {
            id: String::new(),
            name: d.get_str("name").to_string(),
            description: d.get_str("description").to_string(),
            issue_type_ids: d.get_string_list("issue_type_ids"),
            default_issue_type_id: d.get_str("default_issue_type_id").to_string(),
        };

        let created: CreatedId = client
            .post(endpoints::ISSUE_TYPE_SCHEME, &scheme)
            .await
            .context("creating issue type scheme failed")?;
        if created.id.is_empty() {
            bail!("new issue type scheme id was not returned");
        }
        info!(id = %created.id, "Created issue type scheme");

        d.set_id(created.id);
        set_project_associations(client, d.id(), d.get_string_list("project_ids")).await?;

        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let id = d.id().to_string();
        let page: IssueTypeSchemePage = client
            .get_with_query(endpoints::ISSUE_TYPE_SCHEME, &[("id", id.as_str())])
            .await
            .context("getting issue type scheme failed")?;

        let scheme = match (page.total, page.values.into_iter().next()) {
            (1, Some(scheme)) => scheme,
            (total, _) => bail!("getting issue type scheme {id} failed: expected 1 result, got {total}"),
        };

        let issue_type_ids = list_issue_type_ids(client, &id)
            .await
            .context("getting issue type scheme items failed")?;

        let projects: Vec<Project> = client
            .get(&endpoints::issue_type_scheme_associations(&id))
            .await
            .context("getting issue type scheme associated projects failed")?;
        let project_ids: Vec<String> = projects.into_iter().map(|p| p.id).collect();

        debug!(
            name = %scheme.name,
            issue_types = issue_type_ids.len(),
            projects = project_ids.len(),
            "Read issue type scheme"
        );

        d.set("name", scheme.name);
        d.set("description", scheme.description);
        d.set("default_issue_type_id", scheme.default_issue_type_id);
        d.set("issue_type_ids", issue_type_ids);
        d.set("project_ids", project_ids);
        Ok(())
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn update(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        let scheme = IssueTypeScheme {
            id: String::new(),
            name: d.get_str("name").to_string(),
            description: d.get_str("description").to_string(),
            issue_type_ids: Vec::new(),
            default_issue_type_id: d.get_str("default_issue_type_id").to_string(),
        };
        let _: Value = client
            .put(&endpoints::item(endpoints::ISSUE_TYPE_SCHEME, d.id()), &scheme)
            .await
            .context("updating issue type scheme failed")?;

        set_project_associations(client, d.id(), d.get_string_list("project_ids")).await?;
        self.read(client, d).await
    }

    #[instrument(skip_all, fields(id = %d.id()))]
    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        client
            .delete(&endpoints::item(endpoints::ISSUE_TYPE_SCHEME, d.id()))
            .await
            .context("deleting issue type scheme failed")
    }
}
