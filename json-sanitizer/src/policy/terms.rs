//! Normalized term sets used by the removal predicates.
//!
//! All sets store lowercase terms. Empty (or whitespace-only) terms are dropped
//! at construction: an empty keyword would otherwise match every entry.

use std::collections::BTreeSet;

/// Key-name fragments that mark an entry as secret regardless of its value.
///
/// `email` and `name` are intentionally absent: those values are redacted by the
/// PII pass instead of being dropped.
pub const SENSITIVE_KEY_NAMES: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "auth",
    "credential",
    "private_key",
    "ssn",
    "social_security",
    "credit_card",
    "card_number",
    "cvv",
    "pin_code",
];

fn normalize<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .filter(|term| !term.as_ref().trim().is_empty())
        .map(|term| term.as_ref().to_lowercase())
        .collect()
}

// =============================================================================
// KeywordSet
// =============================================================================

/// Keywords matched as case-insensitive substrings of keys and scalar values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordSet {
    terms: BTreeSet<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: normalize(keywords),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Returns `true` if any keyword occurs in `haystack`, ignoring case.
    pub fn found_in(&self, haystack: &str) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        let haystack = haystack.to_lowercase();
        self.terms.iter().any(|term| haystack.contains(term.as_str()))
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// =============================================================================
// KeySet
// =============================================================================

/// Key names removed by exact, case-insensitive comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: BTreeSet<String>,
}

impl KeySet {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: normalize(keys),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&key.to_lowercase())
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// =============================================================================
// SensitiveKeyNames
// =============================================================================

/// Fragments checked by the sensitive-key heuristic.
///
/// Starts from [`SENSITIVE_KEY_NAMES`]; callers can add their own fragments but
/// never remove the built-in ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensitiveKeyNames {
    fragments: BTreeSet<String>,
}

impl SensitiveKeyNames {
    /// Adds extra fragments on top of the built-in list.
    #[must_use]
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fragments.extend(normalize(extra));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn matches(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.fragments
            .iter()
            .any(|fragment| key.contains(fragment.as_str()))
    }
}

impl Default for SensitiveKeyNames {
    fn default() -> Self {
        Self {
            fragments: normalize(SENSITIVE_KEY_NAMES),
        }
    }
}
