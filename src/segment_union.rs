//! Union of 1-D intervals along a line parametrization.
//!
//! Used to accumulate the projected extents of several segments on a line of
//! interest and to measure how much of that line is covered (and where the
//! largest uncovered gap lies).

use serde::Serialize;

/// Ordered set of non-overlapping intervals; overlapping or touching
/// intervals merge on insertion.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SegmentUnion {
    // Sorted by start, pairwise disjoint.
    segments: Vec<(f64, f64)>,
}

impl SegmentUnion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the interval `[lo, hi]`, merging with any interval it overlaps or
    /// touches. Empty or inverted intervals are ignored.
    pub fn add_segment(&mut self, lo: f64, hi: f64) {
        if !(lo < hi) {
            return;
        }

        let mut lo = lo;
        let mut hi = hi;
        let mut merged = Vec::with_capacity(self.segments.len() + 1);
        let mut inserted = false;

        for &(a, b) in &self.segments {
            if b < lo {
                merged.push((a, b));
            } else if a > hi {
                if !inserted {
                    merged.push((lo, hi));
                    inserted = true;
                }
                merged.push((a, b));
            } else {
                lo = lo.min(a);
                hi = hi.max(b);
            }
        }

        if !inserted {
            merged.push((lo, hi));
        }

        self.segments = merged;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sorted, disjoint intervals.
    pub fn segments(&self) -> &[(f64, f64)] {
        &self.segments
    }

    /// Start of the first interval.
    pub fn lower_bound(&self) -> Option<f64> {
        self.segments.first().map(|&(lo, _)| lo)
    }

    /// End of the last interval.
    pub fn upper_bound(&self) -> Option<f64> {
        self.segments.last().map(|&(_, hi)| hi)
    }

    /// Total covered length.
    pub fn union_size(&self) -> f64 {
        self.segments.iter().map(|&(lo, hi)| hi - lo).sum()
    }

    /// Largest uncovered gap between two consecutive intervals; zero when the
    /// union holds fewer than two intervals.
    pub fn maximal_gap(&self) -> f64 {
        self.segments
            .windows(2)
            .map(|w| w[1].0 - w[0].1)
            .fold(0.0, f64::max)
    }

    /// Copy of this union clamped to `[lo, hi]`.
    pub fn intersection(&self, lo: f64, hi: f64) -> SegmentUnion {
        debug_assert!(lo <= hi);

        let segments = self
            .segments
            .iter()
            .filter_map(|&(a, b)| {
                let a = a.max(lo);
                let b = b.min(hi);
                (a < b).then_some((a, b))
            })
            .collect();

        SegmentUnion { segments }
    }
}
