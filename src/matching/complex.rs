//! Complex-match resolution across connected components of the candidate
//! graph.
//!
//! A complex match arises whenever simple coverage fails, e.g. one long
//! detected line spanning several ground-truth segments:
//!
//! ```text
//! valid:
//! ground truth:   +++++++++++ ++++++++++++++++++++++++++++++ ++++++++++++
//!   evaluation: ------------------------  -----------------------------
//!
//! invalid (evaluation line leaves the component too far):
//! ground truth:          +++++++++++ ++++++++++++++++++++++++++++++
//!   evaluation: ------------------------------  --------------------
//!               ^^^^^^^^^
//! ```
//!
//! Resolution runs two passes: first every evaluation line of the connected
//! component is validated against the union of *all* connected ground-truth
//! lines (so a mostly-unrelated line cannot be credited for a small
//! coincidental overlap), then the coverage of the requested ground-truth
//! line is measured using only the validated evaluation lines.

use super::graph::CandidateGraph;
use super::similarity::{similarity, DistanceMeasure};
use crate::geometry::LineSegment;
use crate::segment_union::SegmentUnion;
use crate::stats::median;
use crate::types::{IdSet, LineId, LineMap, LineMatch};

/// Resolves the given ground-truth line via its bipartite connected
/// component. Returns `None` when no validated evaluation line covers it.
pub(super) fn resolve_complex_match(
    lines_ground_truth: &LineMap,
    lines_evaluation: &LineMap,
    graph: &CandidateGraph,
    ground_truth_id: LineId,
    complex_match_maximal_gap_px: f64,
) -> Option<LineMatch> {
    debug_assert!(complex_match_maximal_gap_px >= 0.0);

    // Component discovery: alternate between the two adjacency directions,
    // visiting every id at most once.

    let mut connected_ground_truth_ids = IdSet::new();
    let mut connected_evaluation_ids = IdSet::new();

    let mut stack = vec![ground_truth_id];

    while let Some(current_id) = stack.pop() {
        connected_ground_truth_ids.insert(current_id);

        let Some(evaluation_ids) = graph.evaluation_candidates(current_id) else {
            continue;
        };

        for &evaluation_id in evaluation_ids {
            if !connected_evaluation_ids.insert(evaluation_id) {
                continue;
            }

            if let Some(ground_truth_ids) = graph.ground_truth_candidates(evaluation_id) {
                for &sibling_id in ground_truth_ids {
                    if !connected_ground_truth_ids.contains(&sibling_id) {
                        stack.push(sibling_id);
                    }
                }
            }
        }
    }

    // Validity filter: an evaluation line stays valid only when the union of
    // all connected ground-truth lines covers it nearly end to end.

    let mut valid_evaluation_ids = IdSet::new();

    for &evaluation_id in &connected_evaluation_ids {
        let line_evaluation = &lines_evaluation[&evaluation_id];
        let length_evaluation = line_evaluation.length();

        let union = projected_segment_union(
            line_evaluation,
            &connected_ground_truth_ids,
            lines_ground_truth,
        );
        let clamped = union.intersection(0.0, length_evaluation);

        let (Some(lower), Some(upper)) = (clamped.lower_bound(), clamped.upper_bound()) else {
            continue;
        };

        let front_gap = lower;
        let back_gap = length_evaluation - upper;
        let maximal_gap = front_gap.max(back_gap).max(clamped.maximal_gap());

        if maximal_gap < complex_match_maximal_gap_px {
            valid_evaluation_ids.insert(evaluation_id);
        }
    }

    // Coverage of the requested ground-truth line from the valid evaluation
    // lines only. Coverage outside the finite ground-truth extent does not
    // count for a complex match.

    let line_ground_truth = &lines_ground_truth[&ground_truth_id];
    let length_ground_truth = line_ground_truth.length();

    let mut union = SegmentUnion::new();
    let mut target_ids = IdSet::new();
    let mut angles = Vec::with_capacity(valid_evaluation_ids.len());
    let mut distances = Vec::with_capacity(valid_evaluation_ids.len());

    for &evaluation_id in &valid_evaluation_ids {
        if !graph.contains_pair(ground_truth_id, evaluation_id) {
            continue;
        }

        let line_evaluation = &lines_evaluation[&evaluation_id];

        let loc0 = line_ground_truth
            .nearest_point_on_infinite_line(&line_evaluation.point0())
            .location;
        let loc1 = line_ground_truth
            .nearest_point_on_infinite_line(&line_evaluation.point1())
            .location;

        let lo = loc0.min(loc1).clamp(0.0, length_ground_truth);
        let hi = loc0.max(loc1).clamp(0.0, length_ground_truth);

        if lo < hi {
            union.add_segment(lo, hi);
            target_ids.insert(evaluation_id);

            let sample = similarity(
                line_ground_truth,
                line_evaluation,
                DistanceMeasure::ProjectedOntoEachOther,
            );
            angles.push(sample.angle);
            distances.push(sample.distance);
        }
    }

    if union.is_empty() {
        return None;
    }

    Some(LineMatch::Complex {
        source_id: ground_truth_id,
        target_ids,
        coverage: union.union_size() / length_ground_truth,
        median_angle: median(&mut angles),
        median_distance: median(&mut distances),
        connected_source_ids: connected_ground_truth_ids,
        connected_target_ids: valid_evaluation_ids,
    })
}

/// Union of the projections of `line_ids` onto the parametrization of
/// `line_of_interest`.
fn projected_segment_union(
    line_of_interest: &LineSegment,
    line_ids: &IdSet,
    lines: &LineMap,
) -> SegmentUnion {
    let mut union = SegmentUnion::new();

    for line_id in line_ids {
        let line = &lines[line_id];

        let loc0 = line_of_interest
            .nearest_point_on_infinite_line(&line.point0())
            .location;
        let loc1 = line_of_interest
            .nearest_point_on_infinite_line(&line.point1())
            .location;

        union.add_segment(loc0.min(loc1), loc0.max(loc1));
    }

    union
}
