//! Configuration surface consumed by a [`crate::Session`].
//!
//! Usually read from a TOML file:
//!
//! ```toml
//! detector_variant = "auto"
//! presidio_url = "http://localhost:5002"
//! keywords = ["internal"]
//! keys_to_remove = ["mobileNumber", "bloodGroup"]
//! key_scope = "root_only"
//!
//! [[rounds]]
//! keywords = ["draft"]
//! keys = ["lastModified"]
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    detect::{DEFAULT_SCORE_THRESHOLD, DetectorVariant},
    error::{Result, SanitizeError},
    policy::{KeyScope, KeySet, KeywordSet, SensitiveKeyNames},
    session::SessionOptions,
};

/// One keyword pass followed by one key pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Round {
    pub keywords: Vec<String>,
    pub keys: Vec<String>,
}

impl Round {
    pub fn keyword_set(&self) -> KeywordSet {
        KeywordSet::new(&self.keywords)
    }

    pub fn key_set(&self) -> KeySet {
        KeySet::new(&self.keys)
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_set().is_empty() && self.key_set().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizerConfig {
    /// Keywords for the first round. Empty skips the keyword pass.
    pub keywords: Vec<String>,
    /// Keys for the first round. Empty skips the key pass.
    pub keys_to_remove: Vec<String>,
    /// Whether the automatic pass redacts PII in string leaves.
    pub apply_pii: bool,
    pub detector_variant: DetectorVariant,
    /// Whether the automatic pass drops entries with secret-looking key names.
    pub sensitive_key_heuristic: bool,
    pub extra_sensitive_keys: Vec<String>,
    pub key_scope: KeyScope,
    /// Also drop empty strings and empty arrays along with nulls.
    pub prune_empty: bool,
    /// Minimum score for statistical findings.
    pub score_threshold: f64,
    /// Base URL of a Presidio analyzer, used by the statistical detector.
    pub presidio_url: Option<String>,
    /// Further rounds, run after the first one.
    pub rounds: Vec<Round>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            keys_to_remove: Vec::new(),
            apply_pii: true,
            detector_variant: DetectorVariant::default(),
            sensitive_key_heuristic: true,
            extra_sensitive_keys: Vec::new(),
            key_scope: KeyScope::default(),
            prune_empty: false,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            presidio_url: None,
            rounds: Vec::new(),
        }
    }
}

impl SanitizerConfig {
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SanitizeError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| SanitizeError::Config {
            path: path.to_owned(),
            source,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            apply_pii: self.apply_pii,
            sensitive_key_heuristic: self.sensitive_key_heuristic,
            sensitive_names: SensitiveKeyNames::default().with_extra(&self.extra_sensitive_keys),
            key_scope: self.key_scope,
            prune_empty: self.prune_empty,
        }
    }

    /// The top-level keywords/keys as a first round (when non-empty), followed
    /// by the configured rounds.
    pub fn all_rounds(&self) -> Vec<Round> {
        let first = Round {
            keywords: self.keywords.clone(),
            keys: self.keys_to_remove.clone(),
        };
        std::iter::once(first)
            .chain(self.rounds.iter().cloned())
            .filter(|round| !round.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_pii_and_heuristic() {
        let config = SanitizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SanitizerConfig::default());
        assert!(config.apply_pii);
        assert!(config.sensitive_key_heuristic);
        assert!(!config.prune_empty);
        assert_eq!(config.detector_variant, DetectorVariant::Auto);
        assert!(config.all_rounds().is_empty());
    }

    #[test]
    fn parses_full_file() {
        let config = SanitizerConfig::from_toml_str(
            r#"
            detector_variant = "regex"
            apply_pii = false
            keywords = ["internal"]
            keys_to_remove = ["email"]
            key_scope = "root_only"
            prune_empty = true
            extra_sensitive_keys = ["bloodGroup"]

            [[rounds]]
            keywords = ["draft"]

            [[rounds]]
            keys = ["created"]
            "#,
        )
        .unwrap();
        assert_eq!(config.detector_variant, DetectorVariant::Regex);
        assert_eq!(config.key_scope, KeyScope::RootOnly);
        assert!(!config.session_options().apply_pii);
        assert!(config.session_options().prune_empty);
        assert!(config.session_options().sensitive_names.matches("BLOODGROUP"));

        let rounds = config.all_rounds();
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].keywords, ["internal"]);
        assert_eq!(rounds[0].keys, ["email"]);
        assert_eq!(rounds[2].keys, ["created"]);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(SanitizerConfig::from_toml_str("keyword = [\"x\"]").is_err());
        assert!(SanitizerConfig::from_toml_str("detector_variant = \"ml\"").is_err());
    }

    #[test]
    fn blank_rounds_are_skipped() {
        let config = SanitizerConfig {
            rounds: vec![Round {
                keywords: vec![" ".into()],
                keys: Vec::new(),
            }],
            ..SanitizerConfig::default()
        };
        assert!(config.all_rounds().is_empty());
    }
}
