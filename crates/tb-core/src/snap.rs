//! Snap-to-edge: push a base out of its siblings after a move or rotation.
//!
//! Resolution is pairwise and one-shot. Every overlapping sibling proposes
//! its minimal push; the shortest one (first on ties) is applied once. With
//! more than two mutually overlapping bases a residual overlap can remain.

use crate::geometry::{bounds_of, overlaps, resolve_overlap};
use crate::model::TokenInstance;
use kurbo::Vec2;

/// Snap base `index` of `token` against its siblings. Returns the applied
/// push in the token frame, or `None` when nothing overlapped.
pub fn snap_base(token: &mut TokenInstance, index: usize) -> Option<Vec2> {
    let moving = bounds_of(token.bases.get(index)?);
    let mut best: Option<Vec2> = None;
    for (i, sibling) in token.bases.iter().enumerate() {
        if i == index {
            continue;
        }
        let other = bounds_of(sibling);
        if !overlaps(moving, other) {
            continue;
        }
        let push = resolve_overlap(moving, other);
        if best.is_none_or(|b| push.hypot() < b.hypot()) {
            best = Some(push);
        }
    }
    let push = best?;
    let base = &mut token.bases[index];
    base.position += push;
    log::trace!(
        "snapped {} base {index} by ({:.2}, {:.2}) to {:?}",
        token.id,
        push.x,
        push.y,
        base.position
    );
    Some(push)
}

/// Snap every base of `token` in order. Returns how many bases moved.
pub fn snap_all(token: &mut TokenInstance) -> usize {
    (0..token.bases.len())
        .filter(|&i| snap_base(token, i).is_some())
        .count()
}
