//! Attribute schema declarations for resources, data sources and the provider.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::resource_data::{is_zero, ResourceData};

/// Decides whether a change from `old` to `new` should be ignored.
pub type DiffSuppressFn = fn(key: &str, old: &str, new: &str, d: &ResourceData) -> bool;

/// Checks a configured value, returning a message when it is invalid.
pub type ValidateFn = fn(value: &Value) -> Result<(), String>;

/// Attribute value types.
#[derive(Debug, Clone)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    StringList,
    StringSet,
    StringMap,
    /// Unordered set of nested blocks.
    BlockSet(Schema),
}

impl AttributeType {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null)
            | (Self::String, Value::String(_))
            | (Self::Bool, Value::Bool(_)) => true,
            (Self::Int, Value::Number(n)) => n.is_i64(),
            (Self::StringList | Self::StringSet, Value::Array(items)) => {
                items.iter().all(Value::is_string)
            }
            (Self::StringMap, Value::Object(map)) => map.values().all(Value::is_string),
            (Self::BlockSet(_), Value::Array(items)) => items.iter().all(Value::is_object),
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::StringList => "list of strings",
            Self::StringSet => "set of strings",
            Self::StringMap => "map of strings",
            Self::BlockSet(_) => "set of blocks",
        }
    }
}

/// A single attribute declaration.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Attribute {
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
    pub default: Option<Value>,
    pub env_default: Option<&'static str>,
    pub description: &'static str,
    pub diff_suppress: Option<DiffSuppressFn>,
    pub validate: Option<ValidateFn>,
    pub conflicts_with: &'static [&'static str],
}

impl Attribute {
    #[must_use]
    pub fn new(kind: AttributeType) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            env_default: None,
            description: "",
            diff_suppress: None,
            validate: None,
            conflicts_with: &[],
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::new(AttributeType::String)
    }

    #[must_use]
    pub fn bool() -> Self {
        Self::new(AttributeType::Bool)
    }

    #[must_use]
    pub fn int() -> Self {
        Self::new(AttributeType::Int)
    }

    #[must_use]
    pub fn string_list() -> Self {
        Self::new(AttributeType::StringList)
    }

    #[must_use]
    pub fn string_set() -> Self {
        Self::new(AttributeType::StringSet)
    }

    #[must_use]
    pub fn string_map() -> Self {
        Self::new(AttributeType::StringMap)
    }

    #[must_use]
    pub fn block_set(elem: Schema) -> Self {
        Self::new(AttributeType::BlockSet(elem))
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn env_default(mut self, var: &'static str) -> Self {
        self.env_default = Some(var);
        self
    }

    #[must_use]
    pub fn description(mut self, text: &'static str) -> Self {
        self.description = text;
        self
    }

    #[must_use]
    pub fn diff_suppress(mut self, f: DiffSuppressFn) -> Self {
        self.diff_suppress = Some(f);
        self
    }

    #[must_use]
    pub fn validate(mut self, f: ValidateFn) -> Self {
        self.validate = Some(f);
        self
    }

    #[must_use]
    pub fn conflicts_with(mut self, keys: &'static [&'static str]) -> Self {
        self.conflicts_with = keys;
        self
    }

    /// Computed with no way to set it from configuration.
    #[must_use]
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// Problems found while validating configuration against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("\"{0}\": required field is not set")]
    Missing(String),

    #[error("\"{key}\": expected {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("\"{key}\": {message}")]
    Invalid { key: String, message: String },

    #[error("\"{key}\": conflicts with {other}")]
    Conflict { key: String, other: String },

    #[error("\"{0}\": cannot be set, the value is computed")]
    ComputedOnly(String),

    #[error("\"{0}\": unsupported argument")]
    Unknown(String),
}

/// A change the host would have to apply for one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDiff {
    pub key: String,
    pub old: Value,
    pub new: Value,
    pub requires_new: bool,
}

/// Ordered attribute declarations.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute declaration.
    #[must_use]
    pub fn attr(mut self, key: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(key, attribute);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    /// Whether the host must replace the resource on any change.
    #[must_use]
    pub fn all_force_new(&self) -> bool {
        self.attributes
            .values()
            .filter(|a| !a.is_computed_only())
            .all(|a| a.force_new)
    }

    /// Validate raw configuration, collecting every problem found.
    pub fn validate(&self, config: &Map<String, Value>) -> Result<(), Vec<SchemaError>> {
        let mut errors = Vec::new();
        self.validate_into("", config, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_into(&self, prefix: &str, config: &Map<String, Value>, errors: &mut Vec<SchemaError>) {
        for key in config.keys() {
            if !self.attributes.contains_key(key.as_str()) {
                errors.push(SchemaError::Unknown(format!("{prefix}{key}")));
            }
        }

        for (key, attribute) in &self.attributes {
            let path = format!("{prefix}{key}");
            let value = config.get(*key).unwrap_or(&Value::Null);

            if value.is_null() {
                let has_fallback = attribute.default.is_some()
                    || attribute
                        .env_default
                        .is_some_and(|var| std::env::var(var).is_ok_and(|v| !v.is_empty()));
                if attribute.required && !has_fallback {
                    errors.push(SchemaError::Missing(path));
                }
                continue;
            }

            if attribute.is_computed_only() {
                errors.push(SchemaError::ComputedOnly(path));
                continue;
            }

            if !attribute.kind.accepts(value) {
                errors.push(SchemaError::WrongType {
                    key: path,
                    expected: attribute.kind.name(),
                });
                continue;
            }

            if let Some(validate) = attribute.validate {
                if let Err(message) = validate(value) {
                    errors.push(SchemaError::Invalid {
                        key: path.clone(),
                        message,
                    });
                }
            }

            for other in attribute.conflicts_with {
                if config.get(*other).is_some_and(|v| !v.is_null()) {
                    errors.push(SchemaError::Conflict {
                        key: path.clone(),
                        other: (*other).to_string(),
                    });
                }
            }

            if let (AttributeType::BlockSet(elem), Value::Array(blocks)) = (&attribute.kind, value) {
                for (index, block) in blocks.iter().enumerate() {
                    if let Value::Object(block) = block {
                        elem.validate_into(&format!("{path}.{index}."), block, errors);
                    }
                }
            }
        }
    }

    /// Whether an attribute changed between prior state and planned values,
    /// using the same comparison as [`Schema::diff`].
    #[must_use]
    pub fn has_change(&self, d: &ResourceData, key: &str) -> bool {
        let (old, new) = d.get_change(key);
        match self.get(key) {
            Some(attribute) => !values_equal(&attribute.kind, &old, &new),
            None => old != new,
        }
    }

    /// A nested block with computed-only and zero-valued members removed.
    fn normalize_block(&self, block: &Value) -> Value {
        let Value::Object(members) = block else {
            return block.clone();
        };
        Value::Object(
            members
                .iter()
                .filter(|(key, value)| {
                    !is_zero(value)
                        && !self
                            .get(key.as_str())
                            .is_some_and(Attribute::is_computed_only)
                })
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Compare prior state with planned values.
    ///
    /// Computed-only attributes are skipped, as are optional+computed
    /// attributes the configuration leaves unset. Diff-suppress functions see
    /// scalar values rendered as strings, with null as `""`.
    #[must_use]
    pub fn diff(&self, prior: &ResourceData, planned: &ResourceData) -> Vec<AttributeDiff> {
        let mut diffs = Vec::new();

        for (key, attribute) in &self.attributes {
            if attribute.is_computed_only() {
                continue;
            }

            let old = prior.get(key);
            let new = planned.get(key);
            if attribute.computed && new.is_null() {
                continue;
            }

            if values_equal(&attribute.kind, old, new) {
                continue;
            }

            if let Some(suppress) = attribute.diff_suppress {
                if let (Some(old_s), Some(new_s)) = (scalar_text(old), scalar_text(new)) {
                    if suppress(key, &old_s, &new_s, planned) {
                        continue;
                    }
                }
            }

            diffs.push(AttributeDiff {
                key: (*key).to_string(),
                old: old.clone(),
                new: new.clone(),
                requires_new: attribute.force_new,
            });
        }

        diffs
    }
}

/// Whether two values are the same for planning purposes.
///
/// Zero values equal unset ones. Sets ignore order, and block set elements
/// are compared without computed-only members or zero-valued ones.
fn values_equal(kind: &AttributeType, old: &Value, new: &Value) -> bool {
    if is_zero(old) && is_zero(new) {
        return true;
    }

    match (kind, old, new) {
        (AttributeType::StringSet, Value::Array(a), Value::Array(b)) => same_members(a, b),
        (AttributeType::BlockSet(elem), Value::Array(a), Value::Array(b)) => {
            let a: Vec<Value> = a.iter().map(|block| elem.normalize_block(block)).collect();
            let b: Vec<Value> = b.iter().map(|block| elem.normalize_block(block)).collect();
            same_members(&a, &b)
        }
        _ => old == new,
    }
}

fn same_members(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len()
        && a.iter().all(|item| b.contains(item))
        && b.iter().all(|item| a.contains(item))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr("project_key", Attribute::string().required().force_new())
            .attr(
                "assignee_type",
                Attribute::string()
                    .optional()
                    .default_value("project_default")
                    .validate(|v| match v.as_str() {
                        Some("project_default" | "unassigned") => Ok(()),
                        _ => Err("unsupported assignee type".to_string()),
                    })
                    .diff_suppress(|_, old, new, _| old.eq_ignore_ascii_case(new)),
            )
            .attr("username", Attribute::string().optional().conflicts_with(&["group"]))
            .attr("group", Attribute::string().optional().conflicts_with(&["username"]))
            .attr("issue_key", Attribute::string().computed())
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = map(json!({"name": "Backend", "project_key": "PROJ"}));
        assert!(sample().validate(&config).is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = map(json!({
            "description": 12,
            "assignee_type": "whoever",
            "username": "alice",
            "group": "devs",
            "issue_key": "PROJ-1",
            "bogus": true
        }));
        let errors = sample().validate(&config).unwrap_err();

        assert!(errors.contains(&SchemaError::Missing("name".to_string())));
        assert!(errors.contains(&SchemaError::Missing("project_key".to_string())));
        assert!(errors.contains(&SchemaError::WrongType {
            key: "description".to_string(),
            expected: "string"
        }));
        assert!(errors.contains(&SchemaError::Invalid {
            key: "assignee_type".to_string(),
            message: "unsupported assignee type".to_string()
        }));
        assert!(errors.contains(&SchemaError::Conflict {
            key: "username".to_string(),
            other: "group".to_string()
        }));
        assert!(errors.contains(&SchemaError::ComputedOnly("issue_key".to_string())));
        assert!(errors.contains(&SchemaError::Unknown("bogus".to_string())));
    }

    #[test]
    fn test_validate_nested_blocks() {
        let schema = Schema::new().attr(
            "permissions",
            Attribute::block_set(Schema::new().attr("type", Attribute::string().required()))
                .optional(),
        );
        let config = map(json!({"permissions": [{"type": "global"}, {}]}));
        let errors = schema.validate(&config).unwrap_err();
        assert_eq!(errors, vec![SchemaError::Missing("permissions.1.type".to_string())]);
    }

    #[test]
    fn test_diff_honours_suppression_and_force_new() {
        let schema = sample();
        let prior = ResourceData::from_state(
            &schema,
            "10000",
            map(json!({
                "name": "Backend",
                "project_key": "PROJ",
                "assignee_type": "PROJECT_DEFAULT",
                "issue_key": "PROJ-1"
            })),
        );
        let planned = ResourceData::from_config(
            &schema,
            map(json!({"name": "Backend services", "project_key": "OTHER"})),
        );

        let diffs = schema.diff(&prior, &planned);
        let keys: Vec<_> = diffs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "project_key"]);
        assert!(!diffs[0].requires_new);
        assert!(diffs[1].requires_new);
    }

    #[test]
    fn test_all_force_new() {
        let schema = Schema::new()
            .attr("name", Attribute::string().required().force_new())
            .attr("id", Attribute::string().computed());
        assert!(schema.all_force_new());
        assert!(!sample().all_force_new());
    }

    #[test]
    fn test_set_comparison_ignores_order() {
        let kind = AttributeType::StringSet;
        assert!(values_equal(&kind, &json!(["a", "b"]), &json!(["b", "a"])));
        assert!(values_equal(&kind, &Value::Null, &json!([])));
        assert!(!values_equal(&kind, &json!(["a"]), &json!(["a", "b"])));
    }

    #[test]
    fn test_zero_values_equal_unset() {
        assert!(values_equal(&AttributeType::String, &json!(""), &Value::Null));
        assert!(values_equal(&AttributeType::Int, &json!(0), &Value::Null));
        assert!(values_equal(&AttributeType::Bool, &Value::Null, &json!(false)));
        assert!(values_equal(&AttributeType::StringMap, &json!({}), &Value::Null));
        assert!(!values_equal(&AttributeType::String, &json!("x"), &Value::Null));
    }

    #[test]
    fn test_block_sets_ignore_computed_and_empty_members() {
        let kind = AttributeType::BlockSet(
            Schema::new()
                .attr("type", Attribute::string().required())
                .attr("group_name", Attribute::string().optional())
                .attr("id", Attribute::string().computed()),
        );
        let state = json!([
            {"type": "group", "group_name": "devs", "id": "10100"},
            {"type": "global", "group_name": "", "id": "10101"}
        ]);
        let config = json!([{"type": "global"}, {"type": "group", "group_name": "devs"}]);
        assert!(values_equal(&kind, &state, &config));

        let config = json!([{"type": "global"}, {"type": "group", "group_name": "ops"}]);
        assert!(!values_equal(&kind, &state, &config));
    }

    #[test]
    fn test_unchanged_config_has_no_diff() {
        let schema = sample().attr(
            "permissions",
            Attribute::block_set(
                Schema::new()
                    .attr("type", Attribute::string().required())
                    .attr("id", Attribute::string().computed()),
            )
            .optional(),
        );
        let prior = map(json!({
            "name": "Backend",
            "description": "",
            "project_key": "PROJ",
            "assignee_type": "project_default",
            "permissions": [{"type": "global", "id": "10100"}]
        }));
        let config = map(json!({
            "name": "Backend",
            "project_key": "PROJ",
            "permissions": [{"type": "global"}]
        }));
        let prior_data = ResourceData::from_state(&schema, "10000", prior.clone());
        let planned = ResourceData::for_update(&schema, "10000", prior, config);

        assert!(schema.diff(&prior_data, &planned).is_empty());
        assert!(!schema.has_change(&planned, "permissions"));
        assert!(!schema.has_change(&planned, "description"));
    }
}
