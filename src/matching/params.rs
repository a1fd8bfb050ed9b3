//! Threshold parameters controlling the matching stages.

use serde::{Deserialize, Serialize};

use crate::error::EvaluateError;

/// Thresholds of the line-matching pipeline.
///
/// All pixel thresholds are expressed in the domain of the line coordinates.
/// Defaults aim at typical detector output on full-resolution images; for
/// tuning, start with `match_close_to_line_px` and the partial/complex
/// extension limits.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingParams {
    /// Maximal angle between two lines of a perfect match, in radians.
    pub perfect_match_angle_threshold: f64,
    /// Maximal distance between corresponding end points of a perfect match.
    pub perfect_match_px_threshold: f64,
    /// Maximal angle between two lines of a general match, in radians.
    pub match_angle_threshold: f64,
    /// Maximal distance between two lines of a general match.
    pub match_close_to_line_px_threshold: f64,
    /// Maximal amount an evaluation line may extend past the ground-truth
    /// extent before a partial match turns into a complex match.
    pub partial_match_non_overlapping_px_threshold: f64,
    /// Maximal uncovered gap an evaluation line may have (against the whole
    /// connected component) to stay valid for a complex match.
    pub complex_match_maximal_gap_px_threshold: f64,
}

impl Default for MatchingParams {
    fn default() -> Self {
        Self {
            perfect_match_angle_threshold: 2.0_f64.to_radians(),
            perfect_match_px_threshold: 2.0,
            match_angle_threshold: 5.0_f64.to_radians(),
            match_close_to_line_px_threshold: 3.0,
            partial_match_non_overlapping_px_threshold: 25.0,
            complex_match_maximal_gap_px_threshold: 15.0,
        }
    }
}

impl MatchingParams {
    /// Rejects non-finite or negative thresholds and angles outside
    /// `[0, pi/2]`.
    pub fn validate(&self) -> Result<(), EvaluateError> {
        let angles = [
            self.perfect_match_angle_threshold,
            self.match_angle_threshold,
        ];
        if angles
            .iter()
            .any(|a| !a.is_finite() || *a < 0.0 || *a > std::f64::consts::FRAC_PI_2)
        {
            return Err(EvaluateError::InvalidInput(
                "angle thresholds must lie in [0, pi/2]",
            ));
        }

        let pixels = [
            self.perfect_match_px_threshold,
            self.match_close_to_line_px_threshold,
            self.partial_match_non_overlapping_px_threshold,
            self.complex_match_maximal_gap_px_threshold,
        ];
        if pixels.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(EvaluateError::InvalidInput(
                "pixel thresholds must be finite and non-negative",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MatchingParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let params = MatchingParams {
            match_angle_threshold: 2.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = MatchingParams {
            perfect_match_px_threshold: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = MatchingParams {
            complex_match_maximal_gap_px_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
