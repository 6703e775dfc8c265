//! Pass-shaped entry points for front ends.
//!
//! A [`Session`] owns the detector chosen at startup and the session options.
//! It keeps no tree state: every entry point consumes a tree and returns the
//! sanitized one, and each one ends with an implicit null sweep. Callers are
//! expected to persist the tree between calls; [`Session::run`] does that
//! through a sink.

use serde_json::Value;

use crate::{
    config::{Round, SanitizerConfig},
    detect::{PiiDetector, StatisticalDetector, select_detector},
    error::{DetectionError, Result},
    policy::{KeyScope, KeySet, KeywordSet, RemovalPredicate, SensitiveKeyNames},
    sanitize::{PassReport, SanitizationPass, Sanitizer},
};

/// Per-session knobs for the automatic and key passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub apply_pii: bool,
    pub sensitive_key_heuristic: bool,
    pub sensitive_names: SensitiveKeyNames,
    pub key_scope: KeyScope,
    /// Also drop empty strings and empty arrays in every sweep.
    pub prune_empty: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            apply_pii: true,
            sensitive_key_heuristic: true,
            sensitive_names: SensitiveKeyNames::default(),
            key_scope: KeyScope::Anywhere,
            prune_empty: false,
        }
    }
}

pub struct Session {
    detector: Box<dyn PiiDetector>,
    options: SessionOptions,
}

impl Session {
    pub fn new(detector: Box<dyn PiiDetector>) -> Self {
        Self {
            detector,
            options: SessionOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Selects the detector for `config` (once) and applies its options.
    pub fn from_config(config: &SanitizerConfig) -> Self {
        let detector = select_detector(config.detector_variant, || statistical_detector(config));
        Self::new(detector).with_options(config.session_options())
    }

    pub fn detector(&self) -> &dyn PiiDetector {
        self.detector.as_ref()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Null removal, the sensitive-key heuristic and PII redaction in one
    /// traversal, followed by the null sweep.
    pub fn run_automatic_pass(&self, tree: Value) -> Value {
        let mut pass = self.sweep().with_pii(self.options.apply_pii);
        if self.options.sensitive_key_heuristic {
            pass = pass.with_predicate(RemovalPredicate::SensitiveKeyName(
                self.options.sensitive_names.clone(),
            ));
        }
        self.apply("automatic", tree, &pass)
    }

    /// Drops entries whose key or scalar value contains a keyword. An empty set
    /// leaves the tree unchanged.
    pub fn run_keyword_pass(&self, tree: Value, keywords: &KeywordSet) -> Value {
        if keywords.is_empty() {
            return tree;
        }
        let pass = self
            .sweep()
            .with_predicate(RemovalPredicate::Keywords(keywords.clone()));
        self.apply("keyword", tree, &pass)
    }

    /// Drops entries whose key is in `keys`, within the session's key scope. An
    /// empty set leaves the tree unchanged.
    pub fn run_key_pass(&self, tree: Value, keys: &KeySet) -> Value {
        if keys.is_empty() {
            return tree;
        }
        let pass = self.sweep().with_predicate(RemovalPredicate::Keys {
            keys: keys.clone(),
            scope: self.options.key_scope,
        });
        self.apply("key", tree, &pass)
    }

    /// Runs the automatic pass and then every round, calling `sink` after each
    /// pass that ran. A sink error stops the run; output persisted by earlier
    /// sink calls is left as is.
    pub fn run<F>(&self, tree: Value, rounds: &[Round], mut sink: F) -> Result<Value>
    where
        F: FnMut(&Value) -> Result<()>,
    {
        let mut tree = self.run_automatic_pass(tree);
        sink(&tree)?;

        for round in rounds {
            let keywords = round.keyword_set();
            if !keywords.is_empty() {
                tree = self.run_keyword_pass(tree, &keywords);
                sink(&tree)?;
            }
            let keys = round.key_set();
            if !keys.is_empty() {
                tree = self.run_key_pass(tree, &keys);
                sink(&tree)?;
            }
        }
        Ok(tree)
    }

    fn apply(&self, label: &str, tree: Value, pass: &SanitizationPass) -> Value {
        let sanitizer = Sanitizer::new(self.detector.as_ref());
        let (tree, mut report) = sanitizer.sanitize_with_report(tree, pass);
        let (tree, sweep) = sanitizer.sanitize_with_report(tree, &self.sweep());
        report.absorb(sweep);
        log_report(label, &report);
        tree
    }

    /// The implicit sweep every pass starts from and ends with.
    fn sweep(&self) -> SanitizationPass {
        SanitizationPass::nulls().with_prune_empty(self.options.prune_empty)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("detector", &self.detector.name())
            .field("options", &self.options)
            .finish()
    }
}

fn log_report(label: &str, report: &PassReport) {
    tracing::info!(
        pass = label,
        entries_removed = report.entries_removed,
        elements_removed = report.elements_removed,
        leaves_redacted = report.leaves_redacted,
        detection_failures = report.detection_failures,
        "pass complete"
    );
}

#[cfg(feature = "presidio")]
fn statistical_detector(config: &SanitizerConfig) -> Result<StatisticalDetector, DetectionError> {
    let url = config
        .presidio_url
        .as_deref()
        .ok_or_else(|| DetectionError::Unavailable("no presidio_url configured".into()))?;
    let recognizer = crate::detect::PresidioRecognizer::connect(url)?;
    Ok(StatisticalDetector::new(Box::new(recognizer))
        .with_score_threshold(config.score_threshold))
}

#[cfg(not(feature = "presidio"))]
fn statistical_detector(_config: &SanitizerConfig) -> Result<StatisticalDetector, DetectionError> {
    Err(DetectionError::Unavailable(
        "built without a statistical backend (enable the `presidio` feature)".into(),
    ))
}
