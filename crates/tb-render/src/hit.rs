//! Hit testing: board point → token/base lookup.
//!
//! Walks the units layer front-to-back and tests the point against each
//! base's exact shape in the base's own frame, so rotated rectangles and
//! ellipses hit only where they are drawn.

use kurbo::Point;
use tb_core::TokenId;
use tb_core::scene::Scene;

/// The topmost entity under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub token: TokenId,
    pub base: usize,
}

/// Find the topmost base at board position `p`.
/// Returns `None` if only the board (or nothing) is hit.
pub fn hit_test(board: &Scene, p: Point) -> Option<Hit> {
    // Last painted = topmost.
    for token in board.tokens().iter().rev() {
        let to_board = token.affine();
        for (index, base) in token.bases.iter().enumerate().rev() {
            let local = (to_board * base.affine()).inverse() * p;
            if base.shape.contains(local) {
                return Some(Hit {
                    token: token.id,
                    base: index,
                });
            }
        }
    }
    None
}
