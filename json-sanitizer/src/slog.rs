//! Adapters for emitting sanitization results through `slog`.
//!
//! Front ends that log with `slog` instead of `tracing` can attach a
//! [`PassReport`] or a sanitized tree to a record as structured nested values.
//! Only the sanitized tree ever reaches the serializer: [`SanitizedJson`] can
//! only be built from the output of a [`Session`](crate::Session) pass.

use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{Session, sanitize::PassReport};

impl SlogValue for PassReport {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        SlogValue::serialize(&slog::Serde(*self), record, key, serializer)
    }
}

/// A tree that has been through a session's automatic pass.
#[derive(Clone, Debug, PartialEq)]
pub struct SanitizedJson(JsonValue);

impl SanitizedJson {
    /// Runs the automatic pass of `session` over `tree` and wraps the result.
    pub fn new(session: &Session, tree: JsonValue) -> Self {
        Self(session.run_automatic_pass(tree))
    }

    pub fn value(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

impl SlogValue for SanitizedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.0.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Extension trait for logging a tree after sanitizing it.
///
/// ```ignore
/// use json_sanitizer::slog::SlogSanitizeExt;
///
/// info!(logger, "request"; "body" => body.slog_sanitized(&session));
/// ```
pub trait SlogSanitizeExt {
    fn slog_sanitized(self, session: &Session) -> SanitizedJson;
}

impl SlogSanitizeExt for JsonValue {
    fn slog_sanitized(self, session: &Session) -> SanitizedJson {
        SanitizedJson::new(session, self)
    }
}
