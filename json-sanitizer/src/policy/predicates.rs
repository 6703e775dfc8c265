//! Pure removal predicates over `(key, value)` entries.
//!
//! Array elements are checked with `key = None`, so key-based predicates never
//! fire on them. Every predicate is total; a pass combines the active ones with
//! logical OR, so their order does not matter.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::terms::{KeySet, KeywordSet, SensitiveKeyNames};

/// Returns `true` iff `value` is JSON `null`.
pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

/// Returns `true` iff `value` is an empty string or an empty array.
///
/// Empty objects are not included: they are what key removal leaves behind.
pub fn is_empty_leaf(value: &Value) -> bool {
    match value {
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
    }
}

/// Returns `true` iff any keyword occurs (case-insensitively) in the key or in
/// the value's scalar rendering.
///
/// Strings match on their content, numbers and booleans on their JSON text.
/// Null, arrays and objects never match by value, only by key.
pub fn matches_keywords(key: Option<&str>, value: &Value, keywords: &KeywordSet) -> bool {
    if keywords.is_empty() {
        return false;
    }
    if key.is_some_and(|key| keywords.found_in(key)) {
        return true;
    }
    match value {
        Value::String(text) => keywords.found_in(text),
        Value::Number(number) => keywords.found_in(&number.to_string()),
        Value::Bool(flag) => keywords.found_in(if *flag { "true" } else { "false" }),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Returns `true` iff `key` is present and is a member of `keys`, ignoring case.
pub fn matches_keys(key: Option<&str>, keys: &KeySet) -> bool {
    key.is_some_and(|key| keys.contains(key))
}

static BUILTIN_SENSITIVE_NAMES: Lazy<SensitiveKeyNames> = Lazy::new(SensitiveKeyNames::default);

/// Returns `true` iff `key` contains one of the built-in sensitive fragments.
pub fn is_sensitive_key_name(key: &str) -> bool {
    BUILTIN_SENSITIVE_NAMES.matches(key)
}

/// Where key removal applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScope {
    /// Remove matching keys at any depth.
    #[default]
    Anywhere,
    /// Remove matching keys only from top-level records: the root object, or the
    /// objects that are direct elements of a root array.
    RootOnly,
}

/// One rule of a sanitization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalPredicate {
    Null,
    Keywords(KeywordSet),
    Keys { keys: KeySet, scope: KeyScope },
    SensitiveKeyName(SensitiveKeyNames),
}

impl RemovalPredicate {
    /// Key removal at any depth.
    pub fn keys(keys: KeySet) -> Self {
        Self::Keys {
            keys,
            scope: KeyScope::Anywhere,
        }
    }

    /// The sensitive-key heuristic with the built-in fragment list.
    pub fn sensitive_key_names() -> Self {
        Self::SensitiveKeyName(SensitiveKeyNames::default())
    }

    /// Checks an entry of a top-level record.
    pub fn matches(&self, key: Option<&str>, value: &Value) -> bool {
        self.matches_at(key, value, 0)
    }

    /// Checks an entry whose enclosing object sits below `depth` other objects.
    ///
    /// Arrays do not add depth, so the entries of objects inside a root array
    /// are at depth 0.
    pub fn matches_at(&self, key: Option<&str>, value: &Value, depth: usize) -> bool {
        match self {
            Self::Null => is_null(value),
            Self::Keywords(keywords) => matches_keywords(key, value, keywords),
            Self::Keys { keys, scope } => match scope {
                KeyScope::Anywhere => matches_keys(key, keys),
                KeyScope::RootOnly => depth == 0 && matches_keys(key, keys),
            },
            Self::SensitiveKeyName(names) => key.is_some_and(|key| names.matches(key)),
        }
    }
}
