//! Removal predicates: which entries a pass drops.
//!
//! This module provides:
//!
//! - **Term sets** (`terms`): [`KeywordSet`], [`KeySet`] and [`SensitiveKeyNames`],
//!   normalized once so matching is case-insensitive without per-entry allocation
//!   of the search terms.
//!
//! - **Predicates** (`predicates`): the pure functions deciding whether a
//!   `(key, value)` entry should be dropped, and the [`RemovalPredicate`] enum
//!   that a [`crate::SanitizationPass`] combines with logical OR.
//!
//! # Example
//!
//! ```rust
//! use json_sanitizer::{KeySet, RemovalPredicate};
//! use serde_json::json;
//!
//! let predicate = RemovalPredicate::keys(KeySet::new(["Email"]));
//! assert!(predicate.matches(Some("email"), &json!("a@b.com")));
//! assert!(!predicate.matches(Some("emails"), &json!([])));
//! ```

pub mod predicates;
pub mod terms;

pub use predicates::{
    KeyScope, RemovalPredicate, is_empty_leaf, is_null, is_sensitive_key_name, matches_keys,
    matches_keywords,
};
pub use terms::{KeySet, KeywordSet, SENSITIVE_KEY_NAMES, SensitiveKeyNames};
