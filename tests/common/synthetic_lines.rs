use line_evaluator::{LineId, LineMap, LineSegment};

/// Builds a line map from `(id, [x0, y0, x1, y1])` tuples.
pub fn line_map(lines: &[(u32, [f64; 4])]) -> LineMap {
    lines
        .iter()
        .map(|&(id, [x0, y0, x1, y1])| (LineId(id), LineSegment::from_coords(x0, y0, x1, y1)))
        .collect()
}

/// `count` collinear horizontal segments of length `length`, separated by
/// `gap`, starting at the origin; ids start at `first_id`.
pub fn collinear_chain(first_id: u32, count: u32, length: f64, gap: f64) -> LineMap {
    (0..count)
        .map(|i| {
            let x0 = f64::from(i) * (length + gap);
            (
                LineId(first_id + i),
                LineSegment::from_coords(x0, 0.0, x0 + length, 0.0),
            )
        })
        .collect()
}
