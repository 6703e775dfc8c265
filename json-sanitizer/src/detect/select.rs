//! One-time detector selection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{PiiDetector, RegexDetector, StatisticalDetector};
use crate::error::DetectionError;

/// Which detector a run should use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorVariant {
    /// Use the statistical detector; degrade to regex if it cannot be built.
    Statistical,
    /// Use the regex detector without trying anything else.
    Regex,
    /// Try the statistical detector, fall back to regex.
    #[default]
    Auto,
}

impl fmt::Display for DetectorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Statistical => "statistical",
            Self::Regex => "regex",
            Self::Auto => "auto",
        })
    }
}

impl FromStr for DetectorVariant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "statistical" => Ok(Self::Statistical),
            "regex" => Ok(Self::Regex),
            "auto" => Ok(Self::Auto),
            other => Err(format!(
                "unknown detector `{other}` (expected statistical, regex or auto)"
            )),
        }
    }
}

/// Resolves `variant` into a detector.
///
/// `provider` is only invoked for [`DetectorVariant::Statistical`] and
/// [`DetectorVariant::Auto`]. If it fails, the regex detector is returned and the
/// degradation is logged. Call this once at startup and keep the result for the
/// whole run.
pub fn select_detector<F>(variant: DetectorVariant, provider: F) -> Box<dyn PiiDetector>
where
    F: FnOnce() -> Result<StatisticalDetector, DetectionError>,
{
    if variant == DetectorVariant::Regex {
        tracing::info!(detector = "regex", "using regex PII detector");
        return Box::new(RegexDetector::new());
    }

    match provider() {
        Ok(detector) => {
            tracing::info!(
                detector = "statistical",
                recognizer = detector.recognizer_name(),
                "using statistical PII detector"
            );
            Box::new(detector)
        }
        Err(err) => {
            if variant == DetectorVariant::Statistical {
                tracing::warn!(
                    error = %err,
                    "statistical PII detector requested but unavailable; falling back to regex"
                );
            } else {
                tracing::info!(
                    error = %err,
                    "statistical PII detector unavailable; falling back to regex"
                );
            }
            Box::new(RegexDetector::new())
        }
    }
}
