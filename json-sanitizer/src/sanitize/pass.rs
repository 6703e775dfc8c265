use serde::Serialize;
use serde_json::Value;

use crate::policy::{RemovalPredicate, is_empty_leaf, is_null};

/// What one traversal applies. Consumed by a single [`super::Sanitizer`] call.
///
/// The null predicate is always active, whether or not it is listed. With
/// `prune_empty`, empty strings and empty arrays are swept along with nulls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizationPass {
    pub predicates: Vec<RemovalPredicate>,
    pub apply_pii: bool,
    pub prune_empty: bool,
}

impl SanitizationPass {
    /// A pass that only sweeps nulls.
    pub fn nulls() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: RemovalPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[must_use]
    pub fn with_pii(mut self, apply_pii: bool) -> Self {
        self.apply_pii = apply_pii;
        self
    }

    #[must_use]
    pub fn with_prune_empty(mut self, prune_empty: bool) -> Self {
        self.prune_empty = prune_empty;
        self
    }

    /// Returns `true` if the entry must be dropped.
    pub(crate) fn removes(&self, key: Option<&str>, value: &Value, depth: usize) -> bool {
        is_null(value)
            || (self.prune_empty && is_empty_leaf(value))
            || self
                .predicates
                .iter()
                .any(|predicate| predicate.matches_at(key, value, depth))
    }

    /// Returns `true` if a predicate that ignores the value already drops `key`.
    pub(crate) fn removes_key(&self, key: &str, depth: usize) -> bool {
        self.predicates.iter().any(|predicate| match predicate {
            RemovalPredicate::Keys { .. } | RemovalPredicate::SensitiveKeyName(_) => {
                predicate.matches_at(Some(key), &Value::Null, depth)
            }
            RemovalPredicate::Null | RemovalPredicate::Keywords(_) => false,
        })
    }
}

/// Counters collected by one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Object entries dropped.
    pub entries_removed: usize,
    /// Array elements dropped.
    pub elements_removed: usize,
    /// String leaves rewritten by the PII detector.
    pub leaves_redacted: usize,
    /// String leaves the detector failed on (left unchanged).
    pub detection_failures: usize,
}

impl PassReport {
    /// Returns `true` if the pass changed the tree.
    pub fn changed(&self) -> bool {
        self.entries_removed + self.elements_removed + self.leaves_redacted > 0
    }

    /// Adds `other`'s counters to `self`.
    pub fn absorb(&mut self, other: Self) {
        self.entries_removed += other.entries_removed;
        self.elements_removed += other.elements_removed;
        self.leaves_redacted += other.leaves_redacted;
        self.detection_failures += other.detection_failures;
    }
}
