//! Diff-suppress functions shared by resource schemas.

use crate::resource_data::ResourceData;

/// Ignore case differences, e.g. Jira upper-casing enum values.
pub fn case_insensitive(_key: &str, old: &str, new: &str, _d: &ResourceData) -> bool {
    old.to_lowercase() == new.to_lowercase()
}

/// Ignore the attribute when configuration leaves it unset, otherwise
/// compare case-insensitively.
pub fn unset_or_case_insensitive(key: &str, old: &str, new: &str, d: &ResourceData) -> bool {
    new.is_empty() || case_insensitive(key, old, new, d)
}

/// Ignore the attribute when configuration leaves it unset.
pub fn unset_or_equal(_key: &str, old: &str, new: &str, _d: &ResourceData) -> bool {
    new.is_empty() || old == new
}

/// An unset display name falls back to the user name.
pub fn username_fallback(_key: &str, old: &str, new: &str, d: &ResourceData) -> bool {
    if new.is_empty() {
        return old == d.get_str("name");
    }
    old == new
}
