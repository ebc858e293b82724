//! Shared helpers for provider integration tests.

#![allow(dead_code)]

use jira::{Auth, ClientConfig, JiraClient};
use provider::{DataSource, Resource, ResourceData};
use serde_json::{Map, Value};
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> JiraClient {
    JiraClient::new(ClientConfig::new(server.uri(), Auth::Anonymous)).unwrap()
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("test input must be an object")
}

/// Resource data for a create, built from a JSON config.
pub fn planned(resource: &dyn Resource, config: Value) -> ResourceData {
    ResourceData::from_config(&resource.schema(), object(config))
}

/// Resource data for a read or delete of an existing object.
pub fn existing(resource: &dyn Resource, id: &str, state: Value) -> ResourceData {
    ResourceData::from_state(&resource.schema(), id, object(state))
}

/// Resource data for an update from `prior` state to `config`.
pub fn changed(resource: &dyn Resource, id: &str, prior: Value, config: Value) -> ResourceData {
    ResourceData::for_update(&resource.schema(), id, object(prior), object(config))
}

pub fn lookup(data_source: &dyn DataSource, config: Value) -> ResourceData {
    ResourceData::from_config(&data_source.schema(), object(config))
}
