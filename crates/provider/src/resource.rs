//! Resource and data source traits.

use anyhow::{bail, Result};
use async_trait::async_trait;
use jira::JiraClient;

use crate::resource_data::ResourceData;
use crate::schema::Schema;

/// A Terraform-managed Jira entity.
///
/// Handlers read attributes from `d`, call Jira and write the resulting
/// state back into `d`. A read that clears the ID tells the host the
/// entity no longer exists.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Terraform type name, e.g. `jira_issue`.
    fn name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()>;

    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()>;

    /// Update in place. Resources whose attributes are all force-new keep
    /// this default, since the host replaces them instead.
    async fn update(&self, _client: &JiraClient, _d: &mut ResourceData) -> Result<()> {
        bail!("{} does not support in-place updates", self.name())
    }

    async fn delete(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()>;

    fn importable(&self) -> bool {
        false
    }

    /// Import by ID, which for every importable resource is a plain read.
    async fn import(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()> {
        if !self.importable() {
            bail!("{} does not support import", self.name());
        }
        self.read(client, d).await?;
        if d.is_gone() {
            bail!("{} not found", self.name());
        }
        Ok(())
    }
}

/// A read-only lookup.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Terraform type name, e.g. `jira_jql`.
    fn name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, client: &JiraClient, d: &mut ResourceData) -> Result<()>;
}
