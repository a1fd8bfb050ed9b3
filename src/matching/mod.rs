//! Matching of evaluation line segments against ground-truth line segments.
//!
//! The pipeline runs in two phases over immutable input maps:
//!
//! - Candidate graph construction: every `(ground truth, evaluation)` pair is
//!   tested for overlap (near-parallel, close under the combined distance
//!   measure, projecting into the finite ground-truth extent); accepted pairs
//!   form a bipartite adjacency kept in both directions.
//! - Per-line resolution: each ground-truth line scans its candidates and is
//!   classified as a perfect match (single near-identical candidate), a
//!   partial match (candidates jointly cover the line within the non-overlap
//!   tolerance), or a complex match (a candidate extends far past the line,
//!   requiring connected-component analysis across both sets). Lines without
//!   accepted coverage stay unmatched.
//!
//! Resolution is independent per ground-truth line once the graph is built;
//! with the `parallel` feature both phases distribute over rayon.

mod complex;
mod graph;
mod params;
mod resolver;
mod similarity;

pub use graph::CandidateGraph;
pub use params::MatchingParams;
pub use resolver::evaluate_line_segments;
pub use similarity::{
    are_lines_overlapping, overlapping_amount, similarity, DistanceMeasure, Overlap, Similarity,
};
