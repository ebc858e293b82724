//! Data sources against a mock Jira server.

mod common;

use common::{client_for, lookup};
use provider::data_sources::{FieldDataSource, JqlDataSource, ProjectCategoryDataSource};
use provider::DataSource;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_field_lookup_fetches_list_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "summary",
                "key": "summary",
                "name": "Summary",
                "custom": false,
                "navigable": true,
                "searchable": true,
                "clauseNames": ["summary"]
            },
            {
                "id": "customfield_10010",
                "key": "customfield_10010",
                "name": "Story Points",
                "custom": true,
                "navigable": true,
                "searchable": true,
                "clauseNames": ["cf[10010]", "Story Points"]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let data_source = FieldDataSource::default();

    let mut d = lookup(&data_source, json!({"name": "Story Points"}));
    data_source.read(&client, &mut d).await.unwrap();
    assert_eq!(d.id(), "customfield_10010");
    assert!(d.get_bool("custom"));
    assert_eq!(
        d.get_string_list("clause_names"),
        vec!["cf[10010]", "Story Points"]
    );

    let mut d = lookup(&data_source, json!({"name": "Summary"}));
    data_source.read(&client, &mut d).await.unwrap();
    assert_eq!(d.get_str("key"), "summary");

    let mut d = lookup(&data_source, json!({"name": "Epic Link"}));
    let err = data_source.read(&client, &mut d).await.unwrap_err();
    assert_eq!(err.to_string(), "field with name 'Epic Link' not found");
}

#[tokio::test]
async fn test_jql_collects_keys_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 0,
            "maxResults": 2,
            "total": 3,
            "issues": [{"id": "1", "key": "PROJ-1"}, {"id": "2", "key": "PROJ-2"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("startAt", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "startAt": 2,
            "maxResults": 2,
            "total": 3,
            "issues": [{"id": "3", "key": "PROJ-3"}]
        })))
        .mount(&server)
        .await;

    let data_source = JqlDataSource;
    let mut d = lookup(&data_source, json!({"jql": "project = PROJ"}));
    data_source.read(&client_for(&server), &mut d).await.unwrap();

    assert_eq!(d.id(), "project = PROJ");
    assert_eq!(
        d.get_string_list("issue_keys"),
        vec!["PROJ-1", "PROJ-2", "PROJ-3"]
    );
}

#[tokio::test]
async fn test_project_category_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/projectCategory/10000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10000,
            "name": "Internal",
            "description": "In-house tools"
        })))
        .mount(&server)
        .await;

    let data_source = ProjectCategoryDataSource;
    let mut d = lookup(&data_source, json!({"project_id": "10000"}));
    data_source.read(&client_for(&server), &mut d).await.unwrap();

    assert_eq!(d.id(), "10000");
    assert_eq!(d.get_str("name"), "Internal");
    assert_eq!(d.get_str("description"), "In-house tools");
}
