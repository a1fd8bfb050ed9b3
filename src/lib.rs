#![doc = include_str!("../README.md")]

pub mod error;
pub mod geometry;
pub mod matching;
pub mod report;
pub mod segment_union;
pub mod stats;
pub mod types;

// --- High-level re-exports -------------------------------------------------

// Main entry points: matching + aggregation.
pub use crate::matching::{evaluate_line_segments, MatchingParams};
pub use crate::report::{summarize_matches, MatchReport};

pub use crate::error::EvaluateError;
pub use crate::geometry::LineSegment;
pub use crate::matching::DistanceMeasure;
pub use crate::types::{IdSet, LineId, LineMap, LineMatch, MatchSet};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use line_evaluator::prelude::*;
///
/// let mut ground_truth = LineMap::new();
/// ground_truth.insert(LineId(1), LineSegment::from_coords(0.0, 0.0, 10.0, 0.0));
///
/// let mut evaluation = LineMap::new();
/// evaluation.insert(LineId(1), LineSegment::from_coords(0.0, 0.0, 10.0, 0.0));
///
/// let matches =
///     evaluate_line_segments(&ground_truth, &evaluation, &MatchingParams::default()).unwrap();
/// let report = summarize_matches(&ground_truth, &evaluation, &matches).unwrap();
/// assert_eq!(report.perfect_matches, 1);
/// ```
pub mod prelude {
    pub use crate::error::EvaluateError;
    pub use crate::geometry::LineSegment;
    pub use crate::matching::{evaluate_line_segments, MatchingParams};
    pub use crate::report::{summarize_matches, MatchReport};
    pub use crate::types::{LineId, LineMap, LineMatch, MatchSet};
}
