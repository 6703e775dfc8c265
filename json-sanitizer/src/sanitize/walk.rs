//! Recursive traversal of a `serde_json::Value` tree.
//!
//! The walk is post-order: children are sanitized before their own entry is
//! judged, so a predicate always sees the sanitized value. Entries dropped by a
//! key-only rule are skipped without visiting their subtree, which also keeps
//! their contents away from the detector.

use serde_json::{Map, Value};

use super::pass::{PassReport, SanitizationPass};
use crate::detect::PiiDetector;

/// Applies a [`SanitizationPass`] to a JSON tree.
///
/// Objects: every value is sanitized first, then the entry is dropped if any
/// active predicate holds for `(key, sanitized value)`. Arrays: elements are
/// checked with no key. Strings are run through the detector when the pass
/// applies PII redaction. Containers emptied by removal are kept, unless the
/// pass prunes empty arrays.
///
/// Only entries and elements are ever removed, never the root itself: a root
/// `null` (or an empty root with `prune_empty`) comes back unchanged.
#[derive(Clone, Copy)]
pub struct Sanitizer<'d> {
    detector: &'d dyn PiiDetector,
}

impl<'d> Sanitizer<'d> {
    pub fn new(detector: &'d dyn PiiDetector) -> Self {
        Self { detector }
    }

    pub fn sanitize(&self, tree: Value, pass: &SanitizationPass) -> Value {
        self.sanitize_with_report(tree, pass).0
    }

    pub fn sanitize_with_report(&self, tree: Value, pass: &SanitizationPass) -> (Value, PassReport) {
        let mut walk = Walk {
            detector: self.detector,
            pass,
            report: PassReport::default(),
        };
        let tree = walk.value(tree, 0);
        tracing::debug!(
            predicates = pass.predicates.len(),
            apply_pii = pass.apply_pii,
            entries_removed = walk.report.entries_removed,
            elements_removed = walk.report.elements_removed,
            leaves_redacted = walk.report.leaves_redacted,
            detection_failures = walk.report.detection_failures,
            "sanitization pass finished"
        );
        (tree, walk.report)
    }
}

impl std::fmt::Debug for Sanitizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("detector", &self.detector.name())
            .finish()
    }
}

struct Walk<'a> {
    detector: &'a dyn PiiDetector,
    pass: &'a SanitizationPass,
    report: PassReport,
}

impl Walk<'_> {
    /// `depth` counts the objects enclosing `value`; arrays do not add depth.
    fn value(&mut self, value: Value, depth: usize) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.object(map, depth)),
            Value::Array(items) => Value::Array(self.array(items, depth)),
            Value::String(text) if self.pass.apply_pii => Value::String(self.string(text)),
            other @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)) => other,
        }
    }

    fn object(&mut self, map: Map<String, Value>, depth: usize) -> Map<String, Value> {
        let mut kept = Map::with_capacity(map.len());
        for (key, value) in map {
            // Key-only rules do not need the sanitized value; skip the subtree.
            if self.pass.removes_key(&key, depth) {
                self.report.entries_removed += 1;
                continue;
            }
            let value = self.value(value, depth + 1);
            if self.pass.removes(Some(&key), &value, depth) {
                self.report.entries_removed += 1;
                continue;
            }
            kept.insert(key, value);
        }
        kept
    }

    fn array(&mut self, items: Vec<Value>, depth: usize) -> Vec<Value> {
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let item = self.value(item, depth);
            if self.pass.removes(None, &item, depth) {
                self.report.elements_removed += 1;
                continue;
            }
            kept.push(item);
        }
        kept
    }

    fn string(&mut self, text: String) -> String {
        match self.detector.detect_and_redact(&text) {
            Ok(result) if result.matched => {
                self.report.leaves_redacted += 1;
                result.redacted_text
            }
            Ok(_) => text,
            Err(err) => {
                self.report.detection_failures += 1;
                tracing::warn!(
                    detector = self.detector.name(),
                    error = %err,
                    "PII detection failed; leaving leaf unchanged"
                );
                text
            }
        }
    }
}
