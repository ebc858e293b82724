//! Issue, comment, transition, link and search operations.

use tracing::{debug, instrument};

use crate::client::JiraClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{
    Comment, CreatedIssue, Field, Issue, IssueFields, IssueLink, IssueRequest, SearchPage,
    TransitionRef, TransitionRequest,
};

/// Page size used when walking JQL search results.
pub const SEARCH_PAGE_SIZE: usize = 50;

impl JiraClient {
    // =========================================================================
    // Issue Operations
    // =========================================================================

    /// Get an issue by ID or key
    #[instrument(skip(self))]
    pub async fn get_issue(&self, id_or_key: &str) -> Result<Issue> {
        self.get(&endpoints::item(endpoints::ISSUE, id_or_key)).await
    }

    /// Create an issue, returning its ID and key
    #[instrument(skip(self, fields))]
    pub async fn create_issue(&self, fields: IssueFields) -> Result<CreatedIssue> {
        let created: CreatedIssue = self
            .post(endpoints::ISSUE, &IssueRequest { fields })
            .await?;
        debug!(id = %created.id, key = %created.key, "Created issue");
        Ok(created)
    }

    /// Update the given fields of an issue
    #[instrument(skip(self, fields))]
    pub async fn update_issue(&self, id_or_key: &str, fields: IssueFields) -> Result<()> {
        self.put(
            &endpoints::item(endpoints::ISSUE, id_or_key),
            &IssueRequest { fields },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_issue(&self, id_or_key: &str) -> Result<()> {
        self.delete(&endpoints::item(endpoints::ISSUE, id_or_key)).await
    }

    /// Invoke a workflow transition on an issue
    #[instrument(skip(self))]
    pub async fn transition_issue(&self, id_or_key: &str, transition_id: &str) -> Result<()> {
        let body = TransitionRequest {
            transition: TransitionRef {
                id: transition_id.to_string(),
            },
        };
        self.post(&endpoints::issue_transitions(id_or_key), &body).await
    }

    // =========================================================================
    // Comment Operations
    // =========================================================================

    #[instrument(skip(self, body))]
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<Comment> {
        let comment = Comment {
            id: String::new(),
            body: body.to_string(),
        };
        self.post(&endpoints::issue_comments(issue_key), &comment).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_comment(
        &self,
        issue_key: &str,
        comment_id: &str,
        body: &str,
    ) -> Result<Comment> {
        let comment = Comment {
            id: comment_id.to_string(),
            body: body.to_string(),
        };
        self.put(&endpoints::issue_comment(issue_key, comment_id), &comment)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, issue_key: &str, comment_id: &str) -> Result<()> {
        self.delete(&endpoints::issue_comment(issue_key, comment_id))
            .await
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Create an issue link and return the ID from its `Location` header
    #[instrument(skip(self, link))]
    pub async fn create_issue_link(&self, link: &IssueLink) -> Result<String> {
        let location = self.post_for_location(endpoints::ISSUE_LINK, link).await?;
        Ok(endpoints::last_segment(&location).to_string())
    }

    // =========================================================================
    // Search and fields
    // =========================================================================

    /// Collect the keys of every issue matching a JQL query
    #[instrument(skip(self))]
    pub async fn search_issue_keys(&self, jql: &str) -> Result<Vec<String>> {
        let page_size = SEARCH_PAGE_SIZE.to_string();
        let mut keys = Vec::new();
        let mut start_at = 0usize;

        loop {
            let start = start_at.to_string();
            let page: SearchPage = self
                .get_with_query(
                    endpoints::SEARCH,
                    &[
                        ("jql", jql),
                        ("startAt", start.as_str()),
                        ("maxResults", page_size.as_str()),
                        ("fields", "key"),
                    ],
                )
                .await?;

            let fetched = page.issues.len();
            keys.extend(page.issues.into_iter().map(|issue| issue.key));
            start_at += fetched;

            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        debug!(count = keys.len(), "JQL search finished");
        Ok(keys)
    }

    /// List every system and custom field
    #[instrument(skip(self))]
    pub async fn list_fields(&self) -> Result<Vec<Field>> {
        self.get(endpoints::FIELD).await
    }
}
