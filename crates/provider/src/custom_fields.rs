//! Custom field values that keep their JSON types.
//!
//! Configuration holds every custom field as a string. Strings that are
//! valid JSON travel to Jira as that JSON value; anything else is sent as a
//! plain JSON string. Reading back reverses this so configuration and state
//! compare equal when Jira hands the same value back.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Wire value for a configured custom field.
#[must_use]
pub fn parse_field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Wire values for every configured custom field.
#[must_use]
pub fn to_wire(fields: &BTreeMap<String, String>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, raw)| (key.clone(), parse_field_value(raw)))
        .collect()
}

/// Restrict `actual` to the shape of `configured`.
///
/// Objects keep only configured keys (missing ones become `null`), arrays
/// are walked pairwise up to the shorter length, and anything else takes
/// the actual value.
#[must_use]
pub fn extract_same_keys(configured: &Value, actual: &Value) -> Value {
    match (configured, actual) {
        (Value::Object(wanted), Value::Object(actual)) => Value::Object(
            wanted
                .keys()
                .map(|key| (key.clone(), actual.get(key).cloned().unwrap_or(Value::Null)))
                .collect(),
        ),
        (Value::Array(wanted), Value::Array(actual)) => Value::Array(
            wanted
                .iter()
                .zip(actual)
                .map(|(w, a)| extract_same_keys(w, a))
                .collect(),
        ),
        _ => actual.clone(),
    }
}

/// Integral floats become integers, recursively, so `5.0` from Jira
/// renders as configured `5`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral_numbers(value: Value) -> Value {
    const EXACT: f64 = 9_007_199_254_740_992.0;

    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < EXACT => Value::from(f as i64),
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(integral_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, integral_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Render API values for the custom fields present in configuration.
///
/// JSON-valued configuration gets the API value restricted to the configured
/// shape. Plain configuration gets the API scalar as text: strings as-is,
/// booleans as `true`/`false`, numbers with six decimals. Other API values
/// are left out.
#[must_use]
pub fn render_custom_fields(
    configured: &BTreeMap<String, String>,
    api: &Map<String, Value>,
) -> BTreeMap<String, String> {
    let mut rendered = BTreeMap::new();

    for (key, raw) in configured {
        let Some(actual) = api.get(key) else {
            continue;
        };

        if let Ok(wanted) = serde_json::from_str::<Value>(raw) {
            let value = integral_numbers(extract_same_keys(&wanted, actual));
            rendered.insert(key.clone(), value.to_string());
            continue;
        }

        let text = match actual {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => match n.as_f64() {
                Some(f) => format!("{f:.6}"),
                None => continue,
            },
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        rendered.insert(key.clone(), text);
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_value_keeps_json_types() {
        assert_eq!(parse_field_value("5"), json!(5));
        assert_eq!(parse_field_value("true"), json!(true));
        assert_eq!(parse_field_value(r#"{"value":"High"}"#), json!({"value": "High"}));
        assert_eq!(parse_field_value("High"), json!("High"));
        assert_eq!(parse_field_value(r#""quoted""#), json!("quoted"));
    }

    #[test]
    fn test_extract_same_keys() {
        let configured = json!({"value": "High"});
        let actual = json!({"value": "High", "id": "1", "self": "https://jira/x"});
        assert_eq!(extract_same_keys(&configured, &actual), json!({"value": "High"}));

        let configured = json!([{"name": "a"}, {"name": "b"}]);
        let actual = json!([{"name": "a", "id": 1}]);
        assert_eq!(extract_same_keys(&configured, &actual), json!([{"name": "a"}]));

        assert_eq!(extract_same_keys(&json!({"missing": 1}), &json!({})), json!({"missing": null}));
        assert_eq!(extract_same_keys(&json!(1), &json!("x")), json!("x"));
    }

    #[test]
    fn test_render_custom_fields() {
        let configured: BTreeMap<String, String> = [
            ("customfield_1", r#"{"value":"High"}"#),
            ("customfield_2", "plain"),
            ("customfield_3", "yes"),
            ("customfield_4", "n/a"),
            ("customfield_5", "x"),
            ("customfield_6", "absent"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let api = json!({
            "customfield_1": {"value": "Low", "id": "3"},
            "customfield_2": "plain",
            "customfield_3": true,
            "customfield_4": 5,
            "customfield_5": null,
            "customfield_99": "not configured"
        });

        let rendered = render_custom_fields(&configured, api.as_object().unwrap());
        assert_eq!(rendered["customfield_1"], r#"{"value":"Low"}"#);
        assert_eq!(rendered["customfield_2"], "plain");
        assert_eq!(rendered["customfield_3"], "true");
        assert_eq!(rendered["customfield_4"], "5.000000");
        assert!(!rendered.contains_key("customfield_5"));
        assert!(!rendered.contains_key("customfield_6"));
        assert!(!rendered.contains_key("customfield_99"));
    }

    #[test]
    fn test_integral_floats_render_as_configured_integers() {
        let configured: BTreeMap<String, String> = [
            ("customfield_1", "5"),
            ("customfield_2", r#"{"n":5}"#),
            ("customfield_3", "[1,2.5]"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let api = json!({
            "customfield_1": 5.0,
            "customfield_2": {"n": 5.0, "id": "3"},
            "customfield_3": [1.0, 2.5]
        });

        let rendered = render_custom_fields(&configured, api.as_object().unwrap());
        assert_eq!(rendered["customfield_1"], "5");
        assert_eq!(rendered["customfield_2"], r#"{"n":5}"#);
        assert_eq!(rendered["customfield_3"], "[1,2.5]");
    }
}
