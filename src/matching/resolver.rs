//! Per-line match resolution: Perfect, Partial, or Complex.

use log::debug;

use super::complex::resolve_complex_match;
use super::graph::CandidateGraph;
use super::params::MatchingParams;
use super::similarity::{overlapping_amount, similarity, DistanceMeasure};
use crate::error::EvaluateError;
use crate::geometry::LineSegment;
use crate::segment_union::SegmentUnion;
use crate::stats::median;
use crate::types::{IdSet, LineId, LineMap, LineMatch, MatchSet};

/// Matches every ground-truth line against the evaluation set.
///
/// For each ground-truth line the resolver scans its overlap candidates,
/// accumulating coverage for a partial match until a candidate extends too
/// far past the ground-truth extent; such a candidate forces complex
/// resolution, which supersedes any accumulated partial state. A single
/// accumulated candidate is additionally tested for a perfect match.
/// Ground-truth lines without any accepted coverage stay unmatched.
pub fn evaluate_line_segments(
    lines_ground_truth: &LineMap,
    lines_evaluation: &LineMap,
    params: &MatchingParams,
) -> Result<MatchSet, EvaluateError> {
    if lines_ground_truth.is_empty() || lines_evaluation.is_empty() {
        return Err(EvaluateError::InvalidInput(
            "ground-truth and evaluation sets must be non-empty",
        ));
    }

    params.validate()?;

    if !lines_ground_truth.values().all(LineSegment::is_valid) {
        return Err(EvaluateError::InvalidInput(
            "ground-truth set contains an invalid line",
        ));
    }
    if !lines_evaluation.values().all(LineSegment::is_valid) {
        return Err(EvaluateError::InvalidInput(
            "evaluation set contains an invalid line",
        ));
    }

    let graph = CandidateGraph::build(lines_ground_truth, lines_evaluation, params);

    let matches = resolve_all(lines_ground_truth, lines_evaluation, &graph, params);

    debug_assert!(matches.len() <= lines_ground_truth.len());
    debug!(
        "matched {} of {} ground-truth lines against {} evaluation lines",
        matches.len(),
        lines_ground_truth.len(),
        lines_evaluation.len()
    );

    Ok(matches)
}

#[cfg(not(feature = "parallel"))]
fn resolve_all(
    lines_ground_truth: &LineMap,
    lines_evaluation: &LineMap,
    graph: &CandidateGraph,
    params: &MatchingParams,
) -> MatchSet {
    lines_ground_truth
        .iter()
        .filter_map(|(&id, line)| {
            resolve_line(id, line, lines_ground_truth, lines_evaluation, graph, params)
                .map(|record| (id, record))
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn resolve_all(
    lines_ground_truth: &LineMap,
    lines_evaluation: &LineMap,
    graph: &CandidateGraph,
    params: &MatchingParams,
) -> MatchSet {
    use rayon::prelude::*;

    // The graph and line maps are read-only here; lines resolve independently.
    lines_ground_truth
        .par_iter()
        .filter_map(|(&id, line)| {
            resolve_line(id, line, lines_ground_truth, lines_evaluation, graph, params)
                .map(|record| (id, record))
        })
        .collect()
}

fn resolve_line(
    ground_truth_id: LineId,
    line_ground_truth: &LineSegment,
    lines_ground_truth: &LineMap,
    lines_evaluation: &LineMap,
    graph: &CandidateGraph,
    params: &MatchingParams,
) -> Option<LineMatch> {
    let mut union = SegmentUnion::new();
    let mut target_ids = IdSet::new();

    for (&evaluation_id, line_evaluation) in lines_evaluation {
        if !graph.contains_pair(ground_truth_id, evaluation_id) {
            continue;
        }

        let overlap = overlapping_amount(line_ground_truth, line_evaluation);
        let non_overlapping = overlap.out_of_boundary.0.abs() + overlap.out_of_boundary.1.abs();

        if non_overlapping > params.partial_match_non_overlapping_px_threshold {
            // The candidate is similar but extends the ground-truth line
            // significantly, so other ground-truth lines must support it.
            // Complex resolution is authoritative: it discards the partial
            // state accumulated so far, and a failed resolution leaves the
            // line unmatched.
            return resolve_complex_match(
                lines_ground_truth,
                lines_evaluation,
                graph,
                ground_truth_id,
                params.complex_match_maximal_gap_px_threshold,
            );
        }

        union.add_segment(overlap.locations.0, overlap.locations.1);
        target_ids.insert(evaluation_id);
    }

    if union.is_empty() {
        return None;
    }

    if target_ids.len() == 1 {
        let evaluation_id = *target_ids.iter().next()?;
        let line_evaluation = &lines_evaluation[&evaluation_id];

        if let Some(perfect) = try_perfect_match(
            ground_truth_id,
            line_ground_truth,
            evaluation_id,
            line_evaluation,
            params,
        ) {
            return Some(perfect);
        }
    }

    let coverage = union.union_size() / line_ground_truth.length();

    let mut angles = Vec::with_capacity(target_ids.len());
    let mut distances = Vec::with_capacity(target_ids.len());

    for target_id in &target_ids {
        let sample = similarity(
            line_ground_truth,
            &lines_evaluation[target_id],
            DistanceMeasure::ProjectedOntoEachOther,
        );
        angles.push(sample.angle);
        distances.push(sample.distance);
    }

    Some(LineMatch::Partial {
        source_id: ground_truth_id,
        target_ids,
        coverage,
        median_angle: median(&mut angles),
        median_distance: median(&mut distances),
    })
}

/// Perfect-match test, attempted only when exactly one candidate survived
/// the non-overlap filter: directions near-parallel within the perfect angle
/// threshold and end points equal within the perfect pixel threshold.
fn try_perfect_match(
    ground_truth_id: LineId,
    line_ground_truth: &LineSegment,
    evaluation_id: LineId,
    line_evaluation: &LineSegment,
    params: &MatchingParams,
) -> Option<LineMatch> {
    let abs_cosine = line_ground_truth
        .direction()
        .dot(&line_evaluation.direction())
        .abs()
        .min(1.0);

    if abs_cosine < params.perfect_match_angle_threshold.cos() {
        return None;
    }

    if !line_ground_truth.is_equal(line_evaluation, params.perfect_match_px_threshold) {
        return None;
    }

    let distance0 = nalgebra::distance(
        &line_ground_truth
            .nearest_point_on_infinite_line(&line_evaluation.point0())
            .point,
        &line_evaluation.point0(),
    );
    let distance1 = nalgebra::distance(
        &line_ground_truth
            .nearest_point_on_infinite_line(&line_evaluation.point1())
            .point,
        &line_evaluation.point1(),
    );

    Some(LineMatch::Perfect {
        source_id: ground_truth_id,
        target_id: evaluation_id,
        angle: abs_cosine.acos(),
        max_distance: distance0.max(distance1),
    })
}
