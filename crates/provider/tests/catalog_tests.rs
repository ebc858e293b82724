//! Project catalog resources against a mock Jira server.

mod common;

use std::time::Duration;

use common::{client_for, existing, planned};
use provider::resources::{
    ComponentResource, CustomFieldResource, ProjectCategoryResource, WebhookResource,
};
use provider::Resource;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_project_category_create_and_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/projectCategory"))
        .and(body_json(json!({"name": "Internal", "description": "In-house tools"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "self": "https://jira.example.com/rest/api/2/projectCategory/10000",
            "id": "10000",
            "name": "Internal",
            "description": "In-house tools"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/projectCategory/10000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "10000",
            "name": "Internal",
            "description": "In-house tools"
        })))
        .mount(&server)
        .await;

    let resource = ProjectCategoryResource;
    let mut d = planned(
        &resource,
        json!({"name": "Internal", "description": "In-house tools"}),
    );
    resource.create(&client_for(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "10000");
    assert_eq!(d.get_str("name"), "Internal");
}

#[tokio::test]
async fn test_component_sends_upper_cased_assignee_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/component"))
        .and(body_json(json!({
            "name": "Backend",
            "project": "PROJ",
            "assigneeType": "PROJECT_DEFAULT"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "10100"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/component/10100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "10100",
            "name": "Backend",
            "project": "PROJ",
            "assigneeType": "PROJECT_DEFAULT",
            "lead": {"name": "jdoe"}
        })))
        .mount(&server)
        .await;

    let resource = ComponentResource;
    let mut d = planned(&resource, json!({"name": "Backend", "project_key": "PROJ"}));
    resource.create(&client_for(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "10100");
    assert_eq!(d.get_str("assignee_type"), "PROJECT_DEFAULT");
    assert_eq!(d.get_str("lead"), "jdoe");
}

#[tokio::test]
async fn test_component_read_missing_clears_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/component/10100"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resource = ComponentResource;
    let mut d = existing(&resource, "10100", json!({"name": "Backend"}));
    resource.read(&client_for(&server), &mut d).await.unwrap();
    assert!(d.is_gone());
}

#[tokio::test]
async fn test_webhook_id_comes_from_self_link() {
    let server = MockServer::start().await;
    let webhook = json!({
        "self": "https://jira.example.com/rest/webhooks/1.0/webhook/7",
        "name": "ci",
        "url": "https://ci.example.com/hook",
        "events": ["jira:issue_created"],
        "filters": {"issue-related-events-section": "project = PROJ"},
        "excludeBody": true
    });
    Mock::given(method("POST"))
        .and(path("/rest/webhooks/1.0/webhook"))
        .respond_with(ResponseTemplate::new(201).set_body_json(webhook.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/webhooks/1.0/webhook/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(webhook))
        .mount(&server)
        .await;

    let resource = WebhookResource;
    let mut d = planned(
        &resource,
        json!({
            "name": "ci",
            "url": "https://ci.example.com/hook",
            "jql": "project = PROJ",
            "events": ["jira:issue_created"],
            "exclude_body": true
        }),
    );
    resource.create(&client_for(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "7");
    assert_eq!(d.get_str("jql"), "project = PROJ");
    assert!(d.get_bool("exclude_body"));
    assert_eq!(d.get_string_list("events"), vec!["jira:issue_created"]);
}

#[tokio::test]
async fn test_custom_field_create_polls_until_visible() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/field"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "customfield_10400",
            "name": "Severity",
            "custom": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "customfield_10400", "name": "Severity", "custom": true}
        ])))
        .mount(&server)
        .await;

    let resource = CustomFieldResource {
        read_attempts: 5,
        read_interval: Duration::from_millis(1),
    };
    let mut d = planned(
        &resource,
        json!({
            "name": "Severity",
            "type": "com.atlassian.jira.plugin.system.customfieldtypes:select",
            "searcher_key": "com.atlassian.jira.plugin.system.customfieldtypes:multiselectsearcher"
        }),
    );
    resource.create(&client_for(&server), &mut d).await.unwrap();
    assert_eq!(d.id(), "customfield_10400");
    assert_eq!(d.get_str("name"), "Severity");
}

#[tokio::test]
async fn test_custom_field_create_gives_up_after_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/api/2/field"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "customfield_10400"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/field"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let resource = CustomFieldResource {
        read_attempts: 3,
        read_interval: Duration::from_millis(1),
    };
    let mut d = planned(
        &resource,
        json!({"name": "Severity", "type": "text", "searcher_key": "textsearcher"}),
    );
    let err = resource.create(&client_for(&server), &mut d).await.unwrap_err();
    assert_eq!(err.to_string(), "Custom Field customfield_10400 not found");

    let err = resource
        .delete(&client_for(&server), &mut d)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no way to delete"));
}
