//! Detection delegated to an external entity recognizer.
//!
//! The recognizer is a black box (an NER model, a remote analyzer service, ...)
//! that reports labelled spans with a confidence score. [`StatisticalDetector`]
//! turns those into [`Finding`]s: it maps labels to categories, drops low-score
//! entities and entities whose span does not fit the text, then resolves
//! overlaps.

use super::{Finding, PiiCategory, PiiDetector, resolve_overlaps};
use crate::error::DetectionError;

/// Entities scoring below this are ignored unless configured otherwise.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

/// A labelled span reported by an [`EntityRecognizer`]. Offsets are byte offsets.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognizedEntity {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

/// Capability to analyze free text for PII entities.
pub trait EntityRecognizer: Send + Sync {
    fn name(&self) -> &str;

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, DetectionError>;
}

/// [`PiiDetector`] backed by an [`EntityRecognizer`].
pub struct StatisticalDetector {
    recognizer: Box<dyn EntityRecognizer>,
    score_threshold: f64,
}

impl StatisticalDetector {
    pub fn new(recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            recognizer,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// Sets the minimum score an entity needs to become a finding.
    #[must_use]
    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }
}

impl std::fmt::Debug for StatisticalDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticalDetector")
            .field("recognizer", &self.recognizer.name())
            .field("score_threshold", &self.score_threshold)
            .finish()
    }
}

impl PiiDetector for StatisticalDetector {
    fn name(&self) -> &str {
        "statistical"
    }

    fn analyze(&self, text: &str) -> Result<Vec<Finding>, DetectionError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut entities = self.recognizer.recognize(text)?;
        entities.retain(|entity| entity.score >= self.score_threshold);

        let mut candidates = Vec::with_capacity(entities.len());
        for entity in &entities {
            let category = PiiCategory::from_label(&entity.label);
            let finding = Finding::new(category, entity.start, entity.end);
            if !finding.fits(text) {
                let err = DetectionError::InvalidSpan {
                    start: entity.start,
                    end: entity.end,
                    len: text.len(),
                };
                tracing::warn!(
                    recognizer = self.recognizer.name(),
                    label = %entity.label,
                    error = %err,
                    "dropping entity with unusable span"
                );
                continue;
            }
            candidates.push((entity.score, finding));
        }

        // Highest score first; ties go to the earlier span.
        candidates.sort_by(|(a_score, a), (b_score, b)| {
            b_score.total_cmp(a_score).then(a.start.cmp(&b.start))
        });
        Ok(resolve_overlaps(candidates.into_iter().map(|(_, finding)| finding)))
    }
}
