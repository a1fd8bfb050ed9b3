//! Geometric similarity tests between a ground-truth line and an evaluation
//! line.
//!
//! Two lines are overlap candidates when they are near-parallel, close to
//! each other under the chosen [`DistanceMeasure`], and the evaluation line
//! projects at least partially into the finite extent of the ground-truth
//! line.

use serde::{Deserialize, Serialize};

use crate::geometry::LineSegment;

/// Strategy for measuring the distance between two line segments.
///
/// Projecting one way is asymmetric: a very long line and a very short line
/// that locally coincide can appear far apart under one projection and close
/// under the other. `ProjectedOntoEachOther` takes the minimum of both
/// measures so that legitimate length mismatches are not penalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMeasure {
    /// End points of the evaluation line are projected onto the infinite
    /// ground-truth line; the distance is the maximum over both end points.
    ProjectedOntoGroundTruth,
    /// End points of the ground-truth line are projected onto the infinite
    /// evaluation line; the distance is the maximum over both end points.
    ProjectedOntoEvaluation,
    /// The minimum of both one-sided measures.
    #[default]
    ProjectedOntoEachOther,
}

/// Projection metrics of an evaluation line relative to a ground-truth line.
#[derive(Clone, Copy, Debug)]
pub struct Overlap {
    /// Length of the evaluation line projected onto the ground-truth line.
    pub projected_length: f64,
    /// Out-of-boundary distances of the two projected end points, sorted
    /// ascending; the first is <= 0, the second >= 0 for overlapping pairs.
    pub out_of_boundary: (f64, f64),
    /// 1-D locations of the two projected end points on the ground-truth
    /// parametrization, sorted ascending.
    pub locations: (f64, f64),
}

/// Angle and distance between two lines already known to correspond.
#[derive(Clone, Copy, Debug)]
pub struct Similarity {
    /// Angle between both directions, in radians within [0, pi/2].
    pub angle: f64,
    /// Distance under the requested measure.
    pub distance: f64,
}

fn sorted(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn max_sqr_endpoint_distance(target: &LineSegment, line: &LineSegment) -> f64 {
    let near0 = target.nearest_point_on_infinite_line(&line.point0()).point;
    let near1 = target.nearest_point_on_infinite_line(&line.point1()).point;

    nalgebra::distance_squared(&near0, &line.point0())
        .max(nalgebra::distance_squared(&near1, &line.point1()))
}

/// Checks whether two lines overlap closely enough to be candidates for the
/// same real-world edge.
///
/// `angle_threshold_cos` is the cosine of the maximal angle between the two
/// directions, within [0, 1]. Returns `None` when the pair is rejected by the
/// angle gate, the distance gate, or because the evaluation line projects
/// entirely outside the finite ground-truth extent.
pub fn are_lines_overlapping(
    line_ground_truth: &LineSegment,
    line_evaluation: &LineSegment,
    angle_threshold_cos: f64,
    distance_threshold_px: f64,
    distance_measure: DistanceMeasure,
) -> Option<Overlap> {
    debug_assert!((0.0..=1.0).contains(&angle_threshold_cos));
    debug_assert!(distance_threshold_px >= 0.0);

    let abs_cosine = line_ground_truth
        .direction()
        .dot(&line_evaluation.direction())
        .abs();

    if abs_cosine < angle_threshold_cos {
        return None;
    }

    let sqr_distance_threshold = distance_threshold_px * distance_threshold_px;

    let mut sqr_distance = f64::INFINITY;

    if distance_measure != DistanceMeasure::ProjectedOntoGroundTruth {
        sqr_distance = max_sqr_endpoint_distance(line_evaluation, line_ground_truth);

        // For the one-sided measure this distance is already decisive.
        if distance_measure == DistanceMeasure::ProjectedOntoEvaluation
            && sqr_distance > sqr_distance_threshold
        {
            return None;
        }
    }

    let proj0 = line_ground_truth.nearest_point_on_infinite_line(&line_evaluation.point0());
    let proj1 = line_ground_truth.nearest_point_on_infinite_line(&line_evaluation.point1());

    if distance_measure != DistanceMeasure::ProjectedOntoEvaluation {
        let sqr_onto_ground_truth = nalgebra::distance_squared(&proj0.point, &line_evaluation.point0())
            .max(nalgebra::distance_squared(&proj1.point, &line_evaluation.point1()));

        if distance_measure == DistanceMeasure::ProjectedOntoGroundTruth {
            if sqr_onto_ground_truth > sqr_distance_threshold {
                return None;
            }
        } else {
            sqr_distance = sqr_distance.min(sqr_onto_ground_truth);

            if sqr_distance > sqr_distance_threshold {
                return None;
            }
        }
    }

    // Both lines are close and near-parallel; check that the evaluation line
    // falls at least partially within the finite ground-truth extent.

    let out_of_boundary = sorted(proj0.out_of_boundary, proj1.out_of_boundary);

    if out_of_boundary.1 < 0.0 || out_of_boundary.0 > 0.0 {
        return None;
    }

    let locations = sorted(proj0.location, proj1.location);

    Some(Overlap {
        projected_length: locations.1 - locations.0,
        out_of_boundary,
        locations,
    })
}

/// Projection metrics for a pair already known to overlap; no gates applied.
pub fn overlapping_amount(line_ground_truth: &LineSegment, line_evaluation: &LineSegment) -> Overlap {
    let proj0 = line_ground_truth.nearest_point_on_infinite_line(&line_evaluation.point0());
    let proj1 = line_ground_truth.nearest_point_on_infinite_line(&line_evaluation.point1());

    let out_of_boundary = sorted(proj0.out_of_boundary, proj1.out_of_boundary);
    let locations = sorted(proj0.location, proj1.location);

    Overlap {
        projected_length: locations.1 - locations.0,
        out_of_boundary,
        locations,
    }
}

/// Angle and distance between two lines known to correspond.
pub fn similarity(
    line_ground_truth: &LineSegment,
    line_evaluation: &LineSegment,
    distance_measure: DistanceMeasure,
) -> Similarity {
    let abs_cosine = line_ground_truth
        .direction()
        .dot(&line_evaluation.direction())
        .abs()
        .min(1.0);
    let angle = abs_cosine.acos();

    let mut sqr_distance = f64::INFINITY;

    if distance_measure != DistanceMeasure::ProjectedOntoGroundTruth {
        sqr_distance = max_sqr_endpoint_distance(line_evaluation, line_ground_truth);

        if distance_measure == DistanceMeasure::ProjectedOntoEvaluation {
            return Similarity {
                angle,
                distance: sqr_distance.sqrt(),
            };
        }
    }

    let sqr_onto_ground_truth = max_sqr_endpoint_distance(line_ground_truth, line_evaluation);
    sqr_distance = sqr_distance.min(sqr_onto_ground_truth);

    Similarity {
        angle,
        distance: sqr_distance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn cos_deg(deg: f64) -> f64 {
        deg.to_radians().cos()
    }

    #[test]
    fn identical_lines_overlap() {
        let line = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);

        let overlap = are_lines_overlapping(
            &line,
            &line.clone(),
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEachOther,
        )
        .expect("identical lines must overlap");

        assert!((overlap.projected_length - 10.0).abs() < EPS);
        assert!(overlap.out_of_boundary.0.abs() < EPS);
        assert!(overlap.out_of_boundary.1.abs() < EPS);
        assert!((overlap.locations.1 - 10.0).abs() < EPS);
    }

    #[test]
    fn angle_gate_rejects_non_parallel_lines() {
        let gt = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let ev = LineSegment::from_coords(0.0, 0.0, 10.0, 3.0);

        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEachOther
        )
        .is_none());
    }

    #[test]
    fn distance_gate_rejects_far_apart_lines() {
        let gt = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let ev = LineSegment::from_coords(0.0, 5.0, 10.0, 5.0);

        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEachOther
        )
        .is_none());
    }

    #[test]
    fn rejects_evaluation_line_outside_finite_extent() {
        let gt = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let ev = LineSegment::from_coords(12.0, 0.0, 20.0, 0.0);

        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEachOther
        )
        .is_none());
    }

    #[test]
    fn one_sided_gates_differ_for_short_detection_on_long_line() {
        // A short, slightly tilted detection in the middle of a long
        // ground-truth line: its end points stay close to the ground-truth
        // line, but the distant ground-truth end points leave the infinite
        // extension of the short detection.
        let gt = LineSegment::from_coords(0.0, 0.0, 100.0, 0.0);
        let ev = LineSegment::from_coords(45.0, 1.0, 55.0, 1.5);

        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoGroundTruth
        )
        .is_some());
        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEvaluation
        )
        .is_none());
        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEachOther
        )
        .is_some());
    }

    #[test]
    fn one_sided_gates_swap_for_short_line_on_long_detection() {
        // The mirrored setup: a short ground-truth line against a long,
        // slightly tilted detection whose far end point drifts away from the
        // ground-truth line.
        let gt = LineSegment::from_coords(40.0, 0.0, 60.0, 0.0);
        let ev = LineSegment::from_coords(0.0, 0.5, 100.0, 4.5);

        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoGroundTruth
        )
        .is_none());
        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEvaluation
        )
        .is_some());
        assert!(are_lines_overlapping(
            &gt,
            &ev,
            cos_deg(5.0),
            3.0,
            DistanceMeasure::ProjectedOntoEachOther
        )
        .is_some());
    }

    #[test]
    fn each_other_measure_favors_short_against_long() {
        // A short evaluation line far along a long, slightly tilted
        // ground-truth line: projecting the ground-truth end points onto the
        // evaluation line is far, the other direction is close.
        let gt = LineSegment::from_coords(0.0, 0.0, 100.0, 4.0);
        let ev = LineSegment::from_coords(50.0, 2.0, 55.0, 2.2);

        let onto_gt = similarity(&gt, &ev, DistanceMeasure::ProjectedOntoGroundTruth);
        let onto_ev = similarity(&gt, &ev, DistanceMeasure::ProjectedOntoEvaluation);
        let combined = similarity(&gt, &ev, DistanceMeasure::ProjectedOntoEachOther);

        assert!(
            (combined.distance - onto_gt.distance.min(onto_ev.distance)).abs() < EPS,
            "combined measure must be the minimum of both one-sided measures"
        );
        assert!(onto_ev.distance > onto_gt.distance);
    }

    #[test]
    fn similarity_angle_is_symmetric() {
        let a = LineSegment::from_coords(0.0, 0.0, 10.0, 1.0);
        let b = LineSegment::from_coords(0.0, 0.5, 9.0, 0.0);

        for measure in [
            DistanceMeasure::ProjectedOntoGroundTruth,
            DistanceMeasure::ProjectedOntoEvaluation,
            DistanceMeasure::ProjectedOntoEachOther,
        ] {
            let ab = similarity(&a, &b, measure);
            let ba = similarity(&b, &a, measure);
            assert!((ab.angle - ba.angle).abs() < EPS);
            assert!(ab.angle >= 0.0 && ab.angle <= std::f64::consts::FRAC_PI_2);
        }
    }

    #[test]
    fn overlapping_amount_reports_sorted_metrics() {
        let gt = LineSegment::from_coords(0.0, 0.0, 10.0, 0.0);
        let ev = LineSegment::from_coords(12.0, 1.0, -2.0, 1.0);

        let overlap = overlapping_amount(&gt, &ev);
        assert!((overlap.out_of_boundary.0 - -2.0).abs() < EPS);
        assert!((overlap.out_of_boundary.1 - 2.0).abs() < EPS);
        assert!((overlap.locations.0 - -2.0).abs() < EPS);
        assert!((overlap.locations.1 - 12.0).abs() < EPS);
        assert!((overlap.projected_length - 14.0).abs() < EPS);
    }
}
