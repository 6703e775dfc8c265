//! Deterministic, pattern-based PII detection.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Finding, PiiCategory, PiiDetector, resolve_overlaps};
use crate::error::DetectionError;

/// Pattern list in priority order: on overlap, the earlier pattern wins.
static PATTERNS: Lazy<Vec<(PiiCategory, Regex)>> = Lazy::new(|| {
    [
        (
            PiiCategory::Email,
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        ),
        (
            PiiCategory::Phone,
            r"(?:\(\d{3}\)\s?|\b\d{3}[-.\s]?)\d{3}[-.\s]?\d{4}\b",
        ),
        (PiiCategory::Ssn, r"\b\d{3}-\d{2}-\d{4}\b"),
        (
            PiiCategory::CreditCard,
            r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
        ),
        (
            PiiCategory::IpAddress,
            r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        let regex = Regex::new(pattern).expect("built-in PII pattern must compile");
        (category, regex)
    })
    .collect()
});

/// Regex fallback detector for EMAIL, PHONE, SSN, CREDIT_CARD and IP_ADDRESS.
///
/// Each pattern scans the whole text independently. Overlapping matches are
/// resolved first-pattern-wins; non-overlapping matches are all kept. The
/// detector never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegexDetector;

impl RegexDetector {
    pub fn new() -> Self {
        Self
    }
}

impl PiiDetector for RegexDetector {
    fn name(&self) -> &str {
        "regex"
    }

    fn analyze(&self, text: &str) -> Result<Vec<Finding>, DetectionError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let candidates = PATTERNS.iter().flat_map(|(category, regex)| {
            regex
                .find_iter(text)
                .map(move |m| Finding::new(category.clone(), m.start(), m.end()))
        });
        Ok(resolve_overlaps(candidates))
    }
}
