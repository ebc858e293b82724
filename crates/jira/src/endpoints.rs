//! REST endpoints, relative to the configured base URL.

pub const COMPONENT: &str = "rest/api/2/component";
pub const FIELD: &str = "rest/api/2/field";
pub const FILTER: &str = "rest/api/2/filter";
pub const GROUP: &str = "rest/api/2/group";
pub const GROUP_MEMBER: &str = "rest/api/2/group/member";
pub const GROUP_USER: &str = "rest/api/2/group/user";
pub const ISSUE: &str = "rest/api/2/issue";
pub const ISSUE_LINK: &str = "rest/api/2/issueLink";
pub const ISSUE_LINK_TYPE: &str = "rest/api/2/issueLinkType";
pub const ISSUE_TYPE: &str = "rest/api/2/issuetype";
pub const ISSUE_TYPE_SCHEME: &str = "rest/api/2/issuetypescheme";
pub const ISSUE_TYPE_SCHEME_MAPPING: &str = "rest/api/2/issuetypescheme/mapping";
pub const PROJECT: &str = "rest/api/2/project";
pub const PROJECT_CATEGORY: &str = "rest/api/2/projectCategory";
pub const ROLE: &str = "rest/api/2/role";
pub const SEARCH: &str = "rest/api/2/search";
pub const USER: &str = "rest/api/2/user";
pub const WEBHOOK: &str = "rest/webhooks/1.0/webhook";

/// `{base}/{id}` for a single resource.
#[must_use]
pub fn item(base: &str, id: impl std::fmt::Display) -> String {
    format!("{base}/{id}")
}

#[must_use]
pub fn project_with_shared_configuration(project_id: i64) -> String {
    format!("rest/project-templates/1.0/createshared/{project_id}")
}

#[must_use]
pub fn project_role(project_key: &str, role_id: i64) -> String {
    format!("{PROJECT}/{project_key}/role/{role_id}")
}

/// Scheme lookups hanging off a project, e.g. `notificationscheme`.
#[must_use]
pub fn project_scheme(project_id: &str, scheme: &str) -> String {
    format!("{PROJECT}/{project_id}/{scheme}")
}

#[must_use]
pub fn filter_permissions(filter_id: &str) -> String {
    format!("{FILTER}/{filter_id}/permission")
}

#[must_use]
pub fn filter_permission(filter_id: &str, permission_id: &str) -> String {
    format!("{FILTER}/{filter_id}/permission/{permission_id}")
}

#[must_use]
pub fn issue_type_scheme_associations(scheme_id: &str) -> String {
    format!("{ISSUE_TYPE_SCHEME}/{scheme_id}/associations")
}

#[must_use]
pub fn issue_comments(issue_key: &str) -> String {
    format!("{ISSUE}/{issue_key}/comment")
}

#[must_use]
pub fn issue_comment(issue_key: &str, comment_id: &str) -> String {
    format!("{ISSUE}/{issue_key}/comment/{comment_id}")
}

#[must_use]
pub fn issue_transitions(issue_id: &str) -> String {
    format!("{ISSUE}/{issue_id}/transitions")
}

/// Last path segment of a URL such as a `self` link or `Location` header.
#[must_use]
pub fn last_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        assert_eq!(item(ROLE, 10002), "rest/api/2/role/10002");
        assert_eq!(project_role("PROJ", 10100), "rest/api/2/project/PROJ/role/10100");
        assert_eq!(
            filter_permission("10000", "42"),
            "rest/api/2/filter/10000/permission/42"
        );
        assert_eq!(
            project_with_shared_configuration(10000),
            "rest/project-templates/1.0/createshared/10000"
        );
        assert_eq!(
            project_scheme("10000", "permissionscheme"),
            "rest/api/2/project/10000/permissionscheme"
        );
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(
            last_segment("https://jira.example.com/rest/webhooks/1.0/webhook/7"),
            "7"
        );
        assert_eq!(last_segment("https://jira.example.com/rest/api/2/issueLink/10001/"), "10001");
        assert_eq!(last_segment("/rest/api/2/issueLink/55?expand=x"), "55");
        assert_eq!(last_segment(""), "");
    }
}
