use thiserror::Error;

/// Errors surfaced by the public evaluation entry points.
///
/// Recoverable mismatches (a candidate pair failing the angle or distance
/// gates) are not errors; they are simply excluded from the candidate graph.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EvaluateError {
    /// An input violates an API precondition (empty line maps, malformed
    /// thresholds, invalid lines, or an inconsistent match set).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The inputs are numerically degenerate (e.g. the total ground-truth
    /// length vanishes), so no meaningful statistics can be computed.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}
