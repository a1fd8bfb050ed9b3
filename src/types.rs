//! Core identifier and match-record types shared across the engine.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::geometry::LineSegment;

/// Identifier referencing one line within either the ground-truth set or the
/// evaluation set. Ids are unique only within their own set; a ground-truth
/// id and an evaluation id with the same numeric value are unrelated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u32);

/// Set of line ids (order-irrelevant, unique).
pub type IdSet = HashSet<LineId>;

/// Mapping from one id to the set of corresponding ids in the other set.
pub type IdToIdSetMap = HashMap<LineId, IdSet>;

/// Input line sets are plain id-to-segment maps.
pub type LineMap = HashMap<LineId, LineSegment>;

/// Mapping from ground-truth id to its match record; at most one record per
/// ground-truth line is ever produced by an evaluation pass.
pub type MatchSet = HashMap<LineId, LineMatch>;

/// Classification of how well one ground-truth line is reproduced by the
/// evaluation set.
///
/// Angles are in radians within `[0, pi/2]`, distances are in pixels (the
/// domain of the line coordinates) and non-negative, coverages are > 0.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineMatch {
    /// One-to-one correspondence: a single evaluation line with near-identical
    /// end points and orientation.
    ///
    /// ```text
    /// ground truth: ++++++++++++++
    ///   evaluation: --------------
    /// ```
    Perfect {
        source_id: LineId,
        target_id: LineId,
        /// Angle between both lines.
        angle: f64,
        /// Maximal distance between the infinite ground-truth line and the
        /// evaluation line's end points.
        max_distance: f64,
    },

    /// One ground-truth line covered by one or more evaluation lines whose
    /// combined projected extent stays within tolerance of the ground-truth
    /// segment's own extent.
    ///
    /// ```text
    /// ground truth: ++++++++++++++++++++++
    ///   evaluation: -------- -------- ----
    /// ```
    Partial {
        source_id: LineId,
        /// At least one evaluation line.
        target_ids: IdSet,
        /// Covered fraction of the ground-truth extent; may exceed 1 by the
        /// non-overlap tolerance of the partial-match policy.
        coverage: f64,
        median_angle: f64,
        median_distance: f64,
    },

    /// A match requiring traversal of the bipartite overlap graph because
    /// evaluation lines extend across several ground-truth segments (or a
    /// fragmented ground-truth line is recovered only via siblings).
    ///
    /// ```text
    /// ground truth: ++++++++++++++++++++++ +++++++++++++ ++++++++++
    ///   evaluation: -------- ----------------------- -------- -----
    /// ```
    Complex {
        source_id: LineId,
        /// At least one evaluation line.
        target_ids: IdSet,
        /// Covered fraction of the ground-truth extent, clamped to [0, 1].
        coverage: f64,
        median_angle: f64,
        median_distance: f64,
        /// All ground-truth lines visited while resolving the match.
        connected_source_ids: IdSet,
        /// All evaluation lines that survived the component validity filter.
        connected_target_ids: IdSet,
    },
}

impl LineMatch {
    /// Id of the ground-truth line this record classifies.
    pub fn source_id(&self) -> LineId {
        match *self {
            LineMatch::Perfect { source_id, .. }
            | LineMatch::Partial { source_id, .. }
            | LineMatch::Complex { source_id, .. } => source_id,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, LineMatch::Perfect { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, LineMatch::Partial { .. })
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, LineMatch::Complex { .. })
    }
}
