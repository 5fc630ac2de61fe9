//! Bounding boxes and overlap correction for bases.
//!
//! All boxes are axis-aligned `kurbo::Rect`s in the owning token's local
//! frame. Overlap is strict: boxes that only share an edge do not overlap.

use crate::model::BaseInstance;
use kurbo::{Rect, Vec2};

/// Axis-aligned bounds of a base after its rotation, in the token frame.
///
/// Built from the four transformed corners of the shape's own rectangle,
/// so a rotated rectangle grows its box instead of keeping the unrotated
/// extent. Stroke width is not included.
pub fn bounds_of(base: &BaseInstance) -> Rect {
    base.affine().transform_rect_bbox(base.shape.local_rect())
}

/// Strict AABB overlap on both axes.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}

/// Smallest single-axis translation of `a` that clears `b`.
///
/// Candidates are tried right, left, down, up; on a tie the earlier one
/// wins. Returns `Vec2::ZERO` when the boxes do not overlap.
pub fn resolve_overlap(a: Rect, b: Rect) -> Vec2 {
    if !overlaps(a, b) {
        return Vec2::ZERO;
    }
    let candidates = [
        Vec2::new(b.x1 - a.x0, 0.0),
        Vec2::new(b.x0 - a.x1, 0.0),
        Vec2::new(0.0, b.y1 - a.y0),
        Vec2::new(0.0, b.y0 - a.y1),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.hypot() < best.hypot() {
            best = *candidate;
        }
    }
    best
}
