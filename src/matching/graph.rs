//! Bipartite candidate adjacency between ground-truth and evaluation lines.

use log::debug;
use std::collections::HashSet;

use super::params::MatchingParams;
use super::similarity::{are_lines_overlapping, DistanceMeasure};
use crate::geometry::LineSegment;
use crate::types::{IdSet, IdToIdSetMap, LineId, LineMap};

/// Adjacency of all `(ground truth, evaluation)` pairs passing the general
/// overlap test, kept in both directions plus a packed-pair set for O(1)
/// membership re-tests without recomputing geometry.
///
/// Construction performs the full `O(|G| * |E|)` sweep of geometric tests; no
/// spatial indexing is used, favoring simplicity for input sizes in the
/// hundreds to low thousands.
#[derive(Clone, Debug, Default)]
pub struct CandidateGraph {
    ground_truth_to_evaluation: IdToIdSetMap,
    evaluation_to_ground_truth: IdToIdSetMap,
    pairs: HashSet<u64>,
}

impl CandidateGraph {
    pub fn build(
        lines_ground_truth: &LineMap,
        lines_evaluation: &LineMap,
        params: &MatchingParams,
    ) -> Self {
        let angle_threshold_cos = params.match_angle_threshold.cos();
        let distance_threshold = params.match_close_to_line_px_threshold;

        let rows = Self::candidate_rows(
            lines_ground_truth,
            lines_evaluation,
            angle_threshold_cos,
            distance_threshold,
        );

        let mut graph = CandidateGraph::default();

        for (ground_truth_id, row) in rows {
            for evaluation_id in &row {
                graph
                    .evaluation_to_ground_truth
                    .entry(*evaluation_id)
                    .or_default()
                    .insert(ground_truth_id);
                graph
                    .pairs
                    .insert(combine_ids(ground_truth_id, *evaluation_id));
            }
            if !row.is_empty() {
                graph.ground_truth_to_evaluation.insert(ground_truth_id, row);
            }
        }

        debug!(
            "candidate graph: {} ground-truth rows, {} pairs",
            graph.ground_truth_to_evaluation.len(),
            graph.pairs.len()
        );

        graph
    }

    #[cfg(not(feature = "parallel"))]
    fn candidate_rows(
        lines_ground_truth: &LineMap,
        lines_evaluation: &LineMap,
        angle_threshold_cos: f64,
        distance_threshold: f64,
    ) -> Vec<(LineId, IdSet)> {
        lines_ground_truth
            .iter()
            .map(|(&id, line)| {
                (
                    id,
                    candidate_row(line, lines_evaluation, angle_threshold_cos, distance_threshold),
                )
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn candidate_rows(
        lines_ground_truth: &LineMap,
        lines_evaluation: &LineMap,
        angle_threshold_cos: f64,
        distance_threshold: f64,
    ) -> Vec<(LineId, IdSet)> {
        use rayon::prelude::*;

        lines_ground_truth
            .par_iter()
            .map(|(&id, line)| {
                (
                    id,
                    candidate_row(line, lines_evaluation, angle_threshold_cos, distance_threshold),
                )
            })
            .collect()
    }

    /// O(1) test whether a specific pair passed the overlap test.
    pub fn contains_pair(&self, ground_truth_id: LineId, evaluation_id: LineId) -> bool {
        self.pairs
            .contains(&combine_ids(ground_truth_id, evaluation_id))
    }

    /// Evaluation lines overlapping the given ground-truth line.
    pub fn evaluation_candidates(&self, ground_truth_id: LineId) -> Option<&IdSet> {
        self.ground_truth_to_evaluation.get(&ground_truth_id)
    }

    /// Ground-truth lines overlapping the given evaluation line.
    pub fn ground_truth_candidates(&self, evaluation_id: LineId) -> Option<&IdSet> {
        self.evaluation_to_ground_truth.get(&evaluation_id)
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }
}

fn candidate_row(
    line_ground_truth: &LineSegment,
    lines_evaluation: &LineMap,
    angle_threshold_cos: f64,
    distance_threshold: f64,
) -> IdSet {
    lines_evaluation
        .iter()
        .filter(|(_, line_evaluation)| {
            are_lines_overlapping(
                line_ground_truth,
                line_evaluation,
                angle_threshold_cos,
                distance_threshold,
                DistanceMeasure::ProjectedOntoEachOther,
            )
            .is_some()
        })
        .map(|(&id, _)| id)
        .collect()
}

fn combine_ids(ground_truth_id: LineId, evaluation_id: LineId) -> u64 {
    u64::from(ground_truth_id.0) | (u64::from(evaluation_id.0) << 32)
}
