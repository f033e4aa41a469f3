//! Threshold policies turning a raw classifier score into a labeled judgment.
//!
//! The two policies are deliberately kept separate and named: the dashboard
//! uses [`ThresholdPolicy::Binary`], the prediction API uses
//! [`ThresholdPolicy::TriState`]. They are configuration values, not two
//! copies of the logic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary cutoff: above this a review is Positive.
const BINARY_CUTOFF: f32 = 0.5;
/// TriState cutoffs: above the upper bound is positive, below the lower bound
/// is negative, the band in between is neutral.
const TRI_STATE_UPPER: f32 = 0.6;
const TRI_STATE_LOWER: f32 = 0.4;

/// Categorical sentiment label derived from a score.
///
/// Serializes lowercase (`"positive"`) for the JSON API; `Display` is
/// capitalized (`"Positive"`) for the dashboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// One labeled judgment for one review.
///
/// `confidence` is a distance-from-threshold display heuristic in [0,1]. It is
/// NOT a calibrated probability; it only says how far the raw score sat from
/// the decision boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub confidence: f32,
    /// Raw classifier score the label was derived from.
    pub score: f32,
}

/// Which thresholding rule to apply to a classifier score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Positive above 0.5, Negative otherwise. Used by the dashboard.
    Binary,
    /// Positive above 0.6, negative below 0.4, neutral in between. Used by the
    /// prediction API.
    TriState,
}

impl ThresholdPolicy {
    /// Convert a raw score into a labeled prediction.
    pub fn label(&self, score: f32) -> Prediction {
        match self {
            ThresholdPolicy::Binary => {
                if score > BINARY_CUTOFF {
                    Prediction {
                        sentiment: Sentiment::Positive,
                        confidence: score,
                        score,
                    }
                } else {
                    Prediction {
                        sentiment: Sentiment::Negative,
                        confidence: 1.0 - score,
                        score,
                    }
                }
            }
            ThresholdPolicy::TriState => {
                if score > TRI_STATE_UPPER {
                    Prediction {
                        sentiment: Sentiment::Positive,
                        confidence: score,
                        score,
                    }
                } else if score < TRI_STATE_LOWER {
                    Prediction {
                        sentiment: Sentiment::Negative,
                        confidence: 1.0 - score,
                        score,
                    }
                } else {
                    Prediction {
                        sentiment: Sentiment::Neutral,
                        confidence: 1.0 - (score - 0.5).abs() * 2.0,
                        score,
                    }
                }
            }
        }
    }
}
