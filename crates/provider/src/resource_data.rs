//! Attribute bag handed to resource and data source operations.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::schema::{AttributeType, Schema};

/// Resource ID plus attribute values for one operation.
///
/// Mirrors what the plugin host passes in: configuration for create,
/// configuration over prior state for update, and prior state for read,
/// delete and import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    values: Map<String, Value>,
    prior: Option<Map<String, Value>>,
}

impl ResourceData {
    /// Planned values for a create, with static and environment defaults applied.
    #[must_use]
    pub fn from_config(schema: &Schema, config: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            values: with_defaults(schema, config),
            prior: None,
        }
    }

    /// Planned values for an update.
    ///
    /// Computed attributes the configuration leaves unset keep their prior value.
    #[must_use]
    pub fn for_update(
        schema: &Schema,
        id: impl Into<String>,
        prior: Map<String, Value>,
        config: Map<String, Value>,
    ) -> Self {
        let mut values = with_defaults(schema, config);
        for (key, attribute) in schema.iter() {
            if !attribute.computed || values.get(key).is_some_and(|v| !v.is_null()) {
                continue;
            }
            if let Some(value) = prior.get(key) {
                values.insert(key.to_string(), value.clone());
            }
        }

        Self {
            id: id.into(),
            values,
            prior: Some(prior),
        }
    }

    /// Stored state for read, delete and import. Keys the schema does not
    /// declare are dropped.
    #[must_use]
    pub fn from_state(schema: &Schema, id: impl Into<String>, state: Map<String, Value>) -> Self {
        let values = state
            .into_iter()
            .filter(|(key, _)| schema.get(key).is_some())
            .collect();

        Self {
            id: id.into(),
            values,
            prior: None,
        }
    }

    /// An empty bag carrying only an ID, as for `terraform import`.
    #[must_use]
    pub fn for_import(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone so the host drops it from state.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Raw value, `Null` when unset.
    #[must_use]
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&Value::Null)
    }

    /// The value when it is set to something other than its zero value.
    #[must_use]
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !is_zero(v))
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).as_str().unwrap_or_default()
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).as_bool().unwrap_or_default()
    }

    #[must_use]
    pub fn get_i64(&self, key: &str) -> i64 {
        match self.get(key) {
            Value::Number(n) => n.as_i64().unwrap_or_default(),
            Value::String(s) => s.parse().unwrap_or_default(),
            _ => 0,
        }
    }

    #[must_use]
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        string_list(self.get(key))
    }

    #[must_use]
    pub fn get_string_map(&self, key: &str) -> BTreeMap<String, String> {
        string_map(self.get(key))
    }

    /// Nested blocks of a block set, each as its own attribute map.
    #[must_use]
    pub fn get_block_set(&self, key: &str) -> Vec<Map<String, Value>> {
        match self.get(key) {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // Changes
    // =========================================================================

    /// Whether the value differs from prior state. Always false outside updates.
    #[must_use]
    pub fn has_change(&self, key: &str) -> bool {
        let Some(prior) = &self.prior else {
            return false;
        };
        let old = prior.get(key).unwrap_or(&Value::Null);
        !same_value(old, self.get(key))
    }

    /// Prior and planned values of an attribute.
    #[must_use]
    pub fn get_change(&self, key: &str) -> (Value, Value) {
        let old = self
            .prior
            .as_ref()
            .and_then(|prior| prior.get(key))
            .cloned()
            .unwrap_or(Value::Null);
        (old, self.get(key).clone())
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Set an attribute. Setting `Null` removes it.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if value.is_null() {
            self.values.remove(key);
        } else {
            self.values.insert(key.to_string(), value);
        }
    }

    /// Attribute values to persist as state.
    #[must_use]
    pub fn state(&self) -> &Map<String, Value> {
        &self.values
    }

    #[must_use]
    pub fn into_state(self) -> (String, Map<String, Value>) {
        (self.id, self.values)
    }
}

fn with_defaults(schema: &Schema, mut config: Map<String, Value>) -> Map<String, Value> {
    config.retain(|_, v| !v.is_null());

    for (key, attribute) in schema.iter() {
        if config.contains_key(key) {
            continue;
        }

        let from_env = attribute.env_default.and_then(|var| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| env_value(&attribute.kind, v))
        });

        if let Some(value) = from_env.or_else(|| attribute.default.clone()) {
            config.insert(key.to_string(), value);
        }
    }

    config
}

fn env_value(kind: &AttributeType, raw: String) -> Value {
    match kind {
        AttributeType::Bool => raw.parse().map_or(Value::String(raw), Value::Bool),
        AttributeType::Int => raw.parse::<i64>().map_or(Value::String(raw), Value::from),
        _ => Value::String(raw),
    }
}

/// Terraform zero values: empty strings, false, 0 and empty collections.
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn same_value(old: &Value, new: &Value) -> bool {
    old == new || (is_zero(old) && is_zero(new))
}

pub(crate) fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(ToString::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn string_map(value: &Value) -> BTreeMap<String, String> {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
            .collect(),
        _ => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde_json::json;
    use serial_test::serial;

    fn schema() -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional().default_value(""))
            .attr("assignee_type", Attribute::string().optional().default_value("project_default"))
            .attr("url", Attribute::string().optional().env_default("TEST_RESOURCE_DATA_URL"))
            .attr("labels", Attribute::string_list().optional())
            .attr("fields", Attribute::string_map().optional())
            .attr("issue_key", Attribute::string().computed())
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_config_applies_defaults() {
        let d = ResourceData::from_config(&schema(), map(json!({"name": "n", "description": null})));
        assert_eq!(d.get_str("name"), "n");
        assert_eq!(d.get_str("description"), "");
        assert_eq!(d.get_str("assignee_type"), "project_default");
        assert!(d.get_ok("description").is_none());
        assert!(d.id().is_empty());
    }

    #[test]
    #[serial]
    fn test_env_default_wins_over_static_default() {
        std::env::set_var("TEST_RESOURCE_DATA_URL", "https://jira.example.com");
        let d = ResourceData::from_config(&schema(), Map::new());
        assert_eq!(d.get_str("url"), "https://jira.example.com");
        std::env::remove_var("TEST_RESOURCE_DATA_URL");

        let d = ResourceData::from_config(&schema(), Map::new());
        assert!(d.get_ok("url").is_none());
    }

    #[test]
    fn test_typed_getters() {
        let d = ResourceData::from_config(
            &schema(),
            map(json!({
                "labels": ["a", "b"],
                "fields": {"customfield_1": "x"},
                "count": "12"
            })),
        );
        assert_eq!(d.get_string_list("labels"), vec!["a", "b"]);
        assert_eq!(d.get_string_map("fields")["customfield_1"], "x");
        assert_eq!(d.get_i64("count"), 12);
        assert!(!d.get_bool("missing"));
        assert!(d.get_block_set("missing").is_empty());
    }

    #[test]
    fn test_update_tracks_changes_and_keeps_computed() {
        let prior = map(json!({"name": "old", "description": "", "issue_key": "PROJ-1"}));
        let d = ResourceData::for_update(&schema(), "10000", prior, map(json!({"name": "new"})));

        assert!(d.has_change("name"));
        assert!(!d.has_change("description"));
        assert!(!d.has_change("labels"));
        assert_eq!(d.get_str("issue_key"), "PROJ-1");
        assert_eq!(d.get_change("name"), (json!("old"), json!("new")));
    }

    #[test]
    fn test_from_state_drops_unknown_keys() {
        let d = ResourceData::from_state(&schema(), "1", map(json!({"name": "n", "stale": 1})));
        assert_eq!(d.state().len(), 1);
        assert!(!d.has_change("name"));
    }

    #[test]
    fn test_set_and_clear() {
        let mut d = ResourceData::for_import("10000");
        d.set("name", "n");
        d.set("labels", Value::Null);
        assert_eq!(d.get_str("name"), "n");
        assert!(!d.is_gone());

        d.clear_id();
        assert!(d.is_gone());
        let (id, state) = d.into_state();
        assert!(id.is_empty());
        assert_eq!(state["name"], "n");
    }
}
