use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// Distance → similarity conversion shared by both matching directions.
///
/// The variant in use is a deployment-wide constant: `min_score` only has one meaning if
/// resume→job and job→resume scores come out of the same transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityTransform {
    /// `clamp(1 - d, 0, 1)`. Opposite vectors (d > 1) all score 0.
    #[default]
    OneMinusDistance,
    /// `clamp(1 - d / 2, 0, 1)`. Spreads the full cosine range `[0, 2]` over `[0, 1]`.
    HalfCosine,
}

impl SimilarityTransform {
    /// Converts a raw distance to a score in `[0, 1]`. Non-increasing in `distance`;
    /// NaN maps to `0.0`.
    pub fn apply(self, distance: f32) -> f32 {
        if distance.is_nan() {
            return 0.0;
        }

        let raw = match self {
            SimilarityTransform::OneMinusDistance => 1.0 - distance,
            SimilarityTransform::HalfCosine => 1.0 - distance / 2.0,
        };
        raw.clamp(0.0, 1.0)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityTransform::OneMinusDistance => "one-minus-distance",
            SimilarityTransform::HalfCosine => "half-cosine",
        }
    }
}

impl fmt::Display for SimilarityTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityTransform {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-minus-distance" => Ok(SimilarityTransform::OneMinusDistance),
            "half-cosine" => Ok(SimilarityTransform::HalfCosine),
            other => Err(ScoringError::UnknownTransform {
                name: other.to_string(),
            }),
        }
    }
}
