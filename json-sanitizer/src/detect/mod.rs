//! PII detection and span redaction for string leaves.
//!
//! This module provides:
//!
//! - **The capability** ([`PiiDetector`]): `analyze` a text into ordered,
//!   non-overlapping [`Finding`]s. `detect_and_redact` is derived from it.
//!
//! - **Two variants**: [`RegexDetector`] (fixed patterns, always available) and
//!   [`StatisticalDetector`] (delegates to an [`EntityRecognizer`] black box).
//!
//! - **Selection** ([`select_detector`]): resolves a [`DetectorVariant`] once at
//!   startup, falling back to the regex variant when the statistical one cannot
//!   be constructed.
//!
//! - **Redaction** ([`redact`]): a pure transform replacing each span with
//!   `[<CATEGORY>_REDACTED]`.
//!
//! # Example
//!
//! ```rust
//! use json_sanitizer::{PiiDetector, RegexDetector};
//!
//! let result = RegexDetector::new().detect_and_redact("contact: a@b.com").unwrap();
//! assert!(result.matched);
//! assert_eq!(result.redacted_text, "contact: [EMAIL_REDACTED]");
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::DetectionError;

#[cfg(feature = "presidio")]
mod presidio;
mod regex_detector;
mod select;
mod statistical;

#[cfg(feature = "presidio")]
pub use presidio::PresidioRecognizer;
pub use regex_detector::RegexDetector;
pub use select::{DetectorVariant, select_detector};
pub use statistical::{
    DEFAULT_SCORE_THRESHOLD, EntityRecognizer, RecognizedEntity, StatisticalDetector,
};

// =============================================================================
// PiiCategory
// =============================================================================

/// Kind of PII a [`Finding`] belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum PiiCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
    IpAddress,
    Person,
    Location,
    Organization,
    /// Any other label reported by a statistical recognizer, normalized to
    /// upper snake case.
    Other(String),
}

impl PiiCategory {
    /// Maps a recognizer label (e.g. Presidio's `EMAIL_ADDRESS`) to a category.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() {
                    ch.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        match normalized.as_str() {
            "EMAIL" | "EMAIL_ADDRESS" => Self::Email,
            "PHONE" | "PHONE_NUMBER" => Self::Phone,
            "SSN" | "US_SSN" => Self::Ssn,
            "CREDIT_CARD" => Self::CreditCard,
            "IP_ADDRESS" => Self::IpAddress,
            "PERSON" => Self::Person,
            "LOCATION" => Self::Location,
            "ORGANIZATION" | "NRP" => Self::Organization,
            _ => Self::Other(normalized),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::IpAddress => "IP_ADDRESS",
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::Organization => "ORGANIZATION",
            Self::Other(label) => label,
        }
    }

    /// The token that replaces a span of this category.
    pub fn placeholder(&self) -> String {
        format!("[{}_REDACTED]", self.label())
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<PiiCategory> for String {
    fn from(category: PiiCategory) -> Self {
        category.label().to_owned()
    }
}

// =============================================================================
// Finding / DetectionResult
// =============================================================================

/// A located span of PII. Offsets are byte offsets into the analyzed text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: PiiCategory,
    pub start: usize,
    pub end: usize,
}

impl Finding {
    pub fn new(category: PiiCategory, start: usize, end: usize) -> Self {
        Self {
            category,
            start,
            end,
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns `true` if the span is non-empty and addresses a valid slice of `text`.
    pub fn fits(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

/// Outcome of running a detector over one string leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionResult {
    pub redacted_text: String,
    pub matched: bool,
}

// =============================================================================
// PiiDetector
// =============================================================================

/// Something that can locate PII inside free text.
///
/// Implementations must return findings ordered by `start` and free of overlaps.
pub trait PiiDetector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Locates PII spans in `text`.
    fn analyze(&self, text: &str) -> Result<Vec<Finding>, DetectionError>;

    /// Analyzes `text` and redacts every finding.
    fn detect_and_redact(&self, text: &str) -> Result<DetectionResult, DetectionError> {
        let findings = self.analyze(text)?;
        if findings.is_empty() {
            return Ok(DetectionResult {
                redacted_text: text.to_owned(),
                matched: false,
            });
        }
        Ok(DetectionResult {
            redacted_text: redact(text, &findings),
            matched: true,
        })
    }
}

impl<T: PiiDetector + ?Sized> PiiDetector for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn analyze(&self, text: &str) -> Result<Vec<Finding>, DetectionError> {
        (**self).analyze(text)
    }
}

// =============================================================================
// Span helpers
// =============================================================================

/// Replaces each finding's span in `text` with its category placeholder.
///
/// This function is total: spans that do not fit `text`, or that overlap an
/// earlier span, are skipped.
pub fn redact(text: &str, findings: &[Finding]) -> String {
    let mut ordered: Vec<&Finding> = findings.iter().filter(|f| f.fits(text)).collect();
    ordered.sort_by_key(|f| (f.start, f.end));

    let mut redacted = String::with_capacity(text.len());
    let mut cursor = 0;
    for finding in ordered {
        if finding.start < cursor {
            continue;
        }
        redacted.push_str(&text[cursor..finding.start]);
        redacted.push_str(&finding.category.placeholder());
        cursor = finding.end;
    }
    redacted.push_str(&text[cursor..]);
    redacted
}

/// Keeps candidates in priority order, dropping any that overlap one already
/// kept, and returns the survivors ordered by `start`.
pub(crate) fn resolve_overlaps<I>(candidates: I) -> Vec<Finding>
where
    I: IntoIterator<Item = Finding>,
{
    let mut kept: Vec<Finding> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|existing| !existing.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }
    kept.sort_by_key(|f| f.start);
    kept
}
