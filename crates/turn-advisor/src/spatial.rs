//! Straight-line distance between tokens.

use combat_events::{Entity, Position};

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Returns the candidate closest to `from`.
///
/// Ties go to the candidate that appears first, so the result is stable for a
/// fixed input order. Returns `None` when there are no candidates.
pub fn closest<'a>(from: Position, candidates: &'a [Entity]) -> Option<&'a Entity> {
    let mut best: Option<(&Entity, f64)> = None;
    for candidate in candidates {
        let d = distance(from, candidate.position);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((candidate, d)),
        }
    }
    best.map(|(entity, _)| entity)
}
