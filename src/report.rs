//! Aggregation of a completed match set into scalar quality metrics.

use serde::Serialize;

use crate::error::EvaluateError;
use crate::stats::median;
use crate::types::{IdSet, LineMap, LineMatch, MatchSet};

/// Scalar quality statistics over one evaluation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchReport {
    /// Length-weighted fraction of the ground truth explained by matches,
    /// within [0, 1] for non-adversarial inputs.
    pub coverage: f64,
    /// Median angle over one sample per match record, in radians.
    pub median_angle: f64,
    /// Median distance over one sample per match record, in pixels.
    pub median_distance: f64,
    pub perfect_matches: usize,
    pub partial_matches: usize,
    pub complex_matches: usize,
    pub not_covered_ground_truth_lines: usize,
    pub not_covered_evaluation_lines: usize,
    /// Ground-truth lines without a match record.
    pub not_covered_ground_truth_ids: IdSet,
    /// Evaluation lines not referenced by any match record.
    pub not_covered_evaluation_ids: IdSet,
}

/// Aggregates a completed match set into a [`MatchReport`].
///
/// A `Perfect` record contributes the full ground-truth length to coverage;
/// `Partial` and `Complex` records contribute their coverage fraction of it.
pub fn summarize_matches(
    lines_ground_truth: &LineMap,
    lines_evaluation: &LineMap,
    matches: &MatchSet,
) -> Result<MatchReport, EvaluateError> {
    if matches.is_empty() {
        return Err(EvaluateError::InvalidInput("match set is empty"));
    }
    if matches.len() > lines_ground_truth.len() {
        return Err(EvaluateError::InvalidInput(
            "match set holds more records than ground-truth lines",
        ));
    }

    let sum_length_ground_truth: f64 = lines_ground_truth.values().map(|line| line.length()).sum();
    if sum_length_ground_truth <= 0.0 {
        return Err(EvaluateError::DegenerateInput(
            "total ground-truth length must be positive",
        ));
    }

    let mut perfect_matches = 0usize;
    let mut partial_matches = 0usize;
    let mut complex_matches = 0usize;

    let mut sum_length_matches = 0.0;
    let mut angles = Vec::with_capacity(matches.len());
    let mut distances = Vec::with_capacity(matches.len());
    let mut covered_evaluation_ids = IdSet::new();

    for record in matches.values() {
        let Some(line_ground_truth) = lines_ground_truth.get(&record.source_id()) else {
            return Err(EvaluateError::InvalidInput(
                "match record references an unknown ground-truth line",
            ));
        };

        let length_ground_truth = line_ground_truth.length();

        match record {
            LineMatch::Perfect {
                target_id,
                angle,
                max_distance,
                ..
            } => {
                sum_length_matches += length_ground_truth;
                angles.push(*angle);
                distances.push(*max_distance);
                covered_evaluation_ids.insert(*target_id);
                perfect_matches += 1;
            }

            LineMatch::Partial {
                target_ids,
                coverage,
                median_angle,
                median_distance,
                ..
            } => {
                sum_length_matches += coverage * length_ground_truth;
                angles.push(*median_angle);
                distances.push(*median_distance);
                covered_evaluation_ids.extend(target_ids.iter().copied());
                partial_matches += 1;
            }

            LineMatch::Complex {
                target_ids,
                coverage,
                median_angle,
                median_distance,
                ..
            } => {
                sum_length_matches += coverage * length_ground_truth;
                angles.push(*median_angle);
                distances.push(*median_distance);
                covered_evaluation_ids.extend(target_ids.iter().copied());
                complex_matches += 1;
            }
        }
    }

    if covered_evaluation_ids.len() > lines_evaluation.len() {
        return Err(EvaluateError::InvalidInput(
            "match set references more evaluation lines than exist",
        ));
    }

    let not_covered_ground_truth_ids: IdSet = lines_ground_truth
        .keys()
        .copied()
        .filter(|id| !matches.contains_key(id))
        .collect();

    let not_covered_evaluation_ids: IdSet = lines_evaluation
        .keys()
        .copied()
        .filter(|id| !covered_evaluation_ids.contains(id))
        .collect();

    Ok(MatchReport {
        coverage: sum_length_matches / sum_length_ground_truth,
        median_angle: median(&mut angles),
        median_distance: median(&mut distances),
        perfect_matches,
        partial_matches,
        complex_matches,
        not_covered_ground_truth_lines: lines_ground_truth.len() - matches.len(),
        not_covered_evaluation_lines: lines_evaluation.len() - covered_evaluation_ids.len(),
        not_covered_ground_truth_ids,
        not_covered_evaluation_ids,
    })
}
