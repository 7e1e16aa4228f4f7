//! Shared scoring types.
//!
//! These types define the stable contract between the scorers and their
//! callers. They carry no task-specific state and serialize cleanly into
//! score reports.

use serde::{Deserialize, Serialize};

/// How an answer is located inside free-form response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Require the expected answer markers around the answer.
    Strict,
    /// Best-effort scan without requiring markers.
    Flexible,
}

/// Score triple returned by every scorer.
///
/// `total` combines the answer and format components with their weights.
/// `correctness` is the unweighted strict-mode answer result, and `format`
/// is the weighted format component, which depends only on response
/// structure, never on answer content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub correctness: f64,
    pub format: f64,
}

impl ScoreBreakdown {
    /// The all-zero breakdown used when no response is available.
    pub fn zero() -> Self {
        Self {
            total: 0.0,
            correctness: 0.0,
            format: 0.0,
        }
    }
}
