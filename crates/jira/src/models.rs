//! Jira REST v2 wire models.
//!
//! Request types skip empty members so partial updates only send what
//! changed. Response types default every member so sparse payloads decode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =========================================================================
// Issues
// =========================================================================

/// Issue as returned by `GET rest/api/2/issue/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, rename = "self", skip_serializing_if = "String::is_empty")]
    pub self_url: String,
    #[serde(default)]
    pub fields: IssueFields,
}

impl Issue {
    /// Current workflow status ID, empty when the payload has none.
    #[must_use]
    pub fn status_id(&self) -> &str {
        self.fields.status.as_ref().map_or("", |s| s.id.as_str())
    }
}

/// Issue fields.
///
/// Members Jira does not model here (custom fields in particular) are kept
/// in `custom` with their original JSON types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "issuetype", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentPage>,
    #[serde(flatten)]
    pub custom: Map<String, Value>,
}

/// Body of issue create/update calls.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRequest {
    pub fields: IssueFields,
}

/// Response of `POST rest/api/2/issue`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_id: String,
}

impl UserRef {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub body: String,
}

/// Body of `POST rest/api/2/issue/{id}/transitions`.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRequest {
    pub transition: TransitionRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionRef {
    pub id: String,
}

/// One page of `GET rest/api/2/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub max_results: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: IssueLinkTypeRef,
    pub inward_issue: IssueKeyRef,
    pub outward_issue: IssueKeyRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLinkTypeRef {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueKeyRef {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLinkType {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inward: String,
    #[serde(default)]
    pub outward: String,
}

// =========================================================================
// Issue types and schemes
// =========================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub avatar_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subtask: bool,
    #[serde(default)]
    pub avatar_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeScheme {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue_type_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_issue_type_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeSchemePage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub max_results: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub values: Vec<IssueTypeScheme>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeSchemeItem {
    #[serde(default)]
    pub issue_type_scheme_id: String,
    #[serde(default)]
    pub issue_type_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeSchemeItemPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub max_results: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "default_true")]
    pub is_last: bool,
    #[serde(default)]
    pub values: Vec<IssueTypeSchemeItem>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAssociationRequest {
    pub ids_or_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedId {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

// =========================================================================
// Fields
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub navigable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub clause_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub searcher_key: String,
}

// =========================================================================
// Projects
// =========================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_type_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_template_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lead: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lead_account_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub assignee_type: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub avatar_id: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub issue_security_scheme: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub permission_scheme: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub notification_scheme: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub category_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lead: Option<UserRef>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub assignee_type: String,
    #[serde(default)]
    pub project_category: Option<ProjectCategory>,
}

/// Response of the shared-configuration project template call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedConfigurationProject {
    #[serde(default)]
    pub project_id: i64,
}

/// Any payload whose only interesting member is a numeric `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NumericId {
    #[serde(default, deserialize_with = "number_or_string")]
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCategory {
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

// =========================================================================
// Roles and memberships
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST rest/api/2/project/{key}/role/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleActorsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRole {
    #[serde(default)]
    pub actors: Vec<RoleActor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoleActor {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub actor_type: String,
}

pub const ACTOR_TYPE_USER: &str = "atlassian-user-role-actor";
pub const ACTOR_TYPE_GROUP: &str = "atlassian-group-role-actor";

// =========================================================================
// Users and groups
// =========================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: String,
}

/// User payload expanded with `expand=groups`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserGroups {
    #[serde(default)]
    pub groups: GroupItems,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupItems {
    #[serde(default)]
    pub items: Vec<Group>,
}

// =========================================================================
// Filters
// =========================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub name: String,
    pub description: String,
    pub jql: String,
    pub favourite: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub jql: String,
    #[serde(default)]
    pub favourite: bool,
    #[serde(default)]
    pub share_permissions: Vec<SharePermission>,
}

/// Share permission as returned inside a filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharePermission {
    #[serde(default)]
    pub id: i64,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub project: Option<IdRef>,
    #[serde(default)]
    pub group: Option<Group>,
    #[serde(default)]
    pub role: Option<RoleRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdRef {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRef {
    #[serde(default)]
    pub id: i64,
}

/// Body of `POST rest/api/2/filter/{id}/permission`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePermissionRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(rename = "groupname", skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_role_id: String,
}

// =========================================================================
// Components and webhooks
// =========================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRequest {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub project: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub assignee_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lead_user_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub assignee_type: String,
    #[serde(default)]
    pub lead: Option<UserRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookFilters {
    #[serde(
        default,
        rename = "issue-related-events-section",
        skip_serializing_if = "String::is_empty"
    )]
    pub jql: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    #[serde(default, rename = "self", skip_serializing_if = "String::is_empty")]
    pub self_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(default)]
    pub filters: WebhookFilters,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude_body: bool,
}

// =========================================================================
// serde helpers
// =========================================================================

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn default_true() -> bool {
    true
}

/// Jira is inconsistent about IDs: some endpoints send `"10000"`, others `10000`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom(format!("id {n} is not an integer"))),
        Value::String(s) if s.is_empty() => Ok(0),
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        _ => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_keeps_custom_fields_with_json_types() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "10001",
            "key": "PROJ-1",
            "fields": {
                "summary": "Broken build",
                "status": {"id": "3", "name": "In Progress"},
                "labels": null,
                "customfield_10010": {"value": "High", "id": "1"},
                "customfield_10011": 5.0,
                "customfield_10012": true
            }
        }))
        .unwrap();

        assert_eq!(issue.status_id(), "3");
        assert_eq!(issue.fields.labels, None);
        assert_eq!(issue.fields.custom["customfield_10010"]["value"], "High");
        assert_eq!(issue.fields.custom["customfield_10011"], json!(5.0));
        assert_eq!(issue.fields.custom["customfield_10012"], json!(true));
        assert!(!issue.fields.custom.contains_key("summary"));
    }

    #[test]
    fn test_issue_request_omits_unset_fields() {
        let mut fields = IssueFields {
            summary: Some("New summary".to_string()),
            ..IssueFields::default()
        };
        fields
            .custom
            .insert("customfield_1".to_string(), json!(["a", "b"]));

        let body = serde_json::to_value(IssueRequest { fields }).unwrap();
        assert_eq!(
            body,
            json!({"fields": {"summary": "New summary", "customfield_1": ["a", "b"]}})
        );
    }

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        let filter: Filter = serde_json::from_value(json!({"id": 10000, "name": "f"})).unwrap();
        assert_eq!(filter.id, "10000");
        let id: NumericId = serde_json::from_value(json!({"id": "10200"})).unwrap();
        assert_eq!(id.id, 10200);
        let category: ProjectCategory = serde_json::from_value(json!({"id": "7"})).unwrap();
        assert_eq!(category.id, "7");
    }

    #[test]
    fn test_webhook_filter_wire_name() {
        let webhook = Webhook {
            name: "hook".to_string(),
            url: "https://example.com/hook".to_string(),
            events: vec!["jira:issue_created".to_string()],
            filters: WebhookFilters {
                jql: "project = PROJ".to_string(),
            },
            ..Webhook::default()
        };
        let body = serde_json::to_value(&webhook).unwrap();
        assert_eq!(body["filters"]["issue-related-events-section"], "project = PROJ");
        assert!(body.get("excludeBody").is_none());
        assert!(body.get("self").is_none());
    }

    #[test]
    fn test_share_permission_request_wire_names() {
        let body = serde_json::to_value(SharePermissionRequest {
            kind: "group".to_string(),
            group: "jira-users".to_string(),
            ..SharePermissionRequest::default()
        })
        .unwrap();
        assert_eq!(body, json!({"type": "group", "groupname": "jira-users"}));
    }
}
