//! Pass-based sanitization of JSON documents.
//!
//! This crate separates:
//! - **Detection**: finding PII spans inside string leaves (`detect`), backed by
//!   either a statistical recognizer or a deterministic regex fallback.
//! - **Removal predicates**: deciding which entries get dropped (`policy`).
//! - **Traversal**: walking a `serde_json::Value` and applying both (`sanitize`).
//!
//! [`Session`] ties them together into the pass-shaped entry points a front end
//! drives: an automatic pass (nulls, sensitive keys, PII), then any number of
//! keyword and key passes, persisting the tree after each one.
//!
//! What this crate does not do:
//! - prompt the user or parse command lines
//! - stream: the whole document is held in memory
//! - guarantee PII recall; detection is best-effort

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub mod config;
pub mod detect;
mod error;
pub mod policy;
pub mod render;
mod sanitize;
mod session;
#[cfg(feature = "slog")]
pub mod slog;
pub mod store;

pub use config::{Round, SanitizerConfig};
#[cfg(feature = "presidio")]
pub use detect::PresidioRecognizer;
pub use detect::{
    DetectionResult, DetectorVariant, EntityRecognizer, Finding, PiiCategory, PiiDetector,
    RecognizedEntity, RegexDetector, StatisticalDetector, redact, select_detector,
};
pub use error::{DetectionError, Result, SanitizeError};
pub use policy::{
    KeyScope, KeySet, KeywordSet, RemovalPredicate, SENSITIVE_KEY_NAMES, SensitiveKeyNames,
    is_empty_leaf, is_null, is_sensitive_key_name, matches_keys, matches_keywords,
};
pub use sanitize::{PassReport, SanitizationPass, Sanitizer};
pub use session::{Session, SessionOptions};
