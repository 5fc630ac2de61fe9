//! Base layout: turn a unit definition into a placed token.
//!
//! Bases are laid out on a near-square grid around the token's local
//! origin, then shifted so their centroid sits on the origin. The token
//! rotates about that origin, i.e. about the visual center of the group.

use crate::board::BoardScale;
use crate::config::BoardConfig;
use crate::id::TokenId;
use crate::model::{
    BaseInstance, BaseShape, Stroke, TokenInstance, UnitDefinition, centroid, palette_color,
};
use kurbo::{Point, Vec2};

/// Grid shape for `n` bases: `(columns, rows)`, columns = ceil(sqrt(n)).
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    let n = n.max(1);
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    (cols, rows)
}

/// Replace non-positive or non-finite dimensions so the shape's extent on
/// that axis becomes one inch.
fn sanitize_shape(shape: BaseShape) -> BaseShape {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    match shape {
        BaseShape::Circle { radius } => BaseShape::Circle {
            radius: if ok(radius) { radius } else { 0.5 },
        },
        BaseShape::Ellipse { radius_x, radius_y } => BaseShape::Ellipse {
            radius_x: if ok(radius_x) { radius_x } else { 0.5 },
            radius_y: if ok(radius_y) { radius_y } else { 0.5 },
        },
        BaseShape::Rectangle { width, height } => BaseShape::Rectangle {
            width: if ok(width) { width } else { 1.0 },
            height: if ok(height) { height } else { 1.0 },
        },
    }
}

/// Offsets (in pixels) of every base relative to the grid center, before
/// centroid correction.
fn grid_offsets(n: usize, shape: BaseShape, scale: &BoardScale, spacing_in: f64) -> Vec<Vec2> {
    let (cols, rows) = grid_dimensions(n);
    let (w_in, h_in) = shape.extent();
    let step_x = (w_in + spacing_in) * scale.px_per_inch_x;
    let step_y = (h_in + spacing_in) * scale.px_per_inch_y;
    let mid_x = (cols as f64 - 1.0) / 2.0;
    let mid_y = (rows as f64 - 1.0) / 2.0;
    (0..n.max(1))
        .map(|i| {
            let col = (i % cols) as f64;
            let row = (i / cols) as f64;
            Vec2::new((col - mid_x) * step_x, (row - mid_y) * step_y)
        })
        .collect()
}

/// Lay out `unit` as a new token at board position `position`.
///
/// The token starts group-draggable with its bases locked; the caller
/// applies the session's drag mode afterwards.
pub fn layout_token(
    unit: &UnitDefinition,
    scale: &BoardScale,
    config: &BoardConfig,
    id: TokenId,
    position: Point,
    color_index: usize,
) -> TokenInstance {
    let n = unit.model_count.max(1) as usize;
    let shape_in = sanitize_shape(unit.shape);
    let shape_px = shape_in.to_pixels(scale.px_per_inch_x, scale.px_per_inch_y);
    let mut offsets = grid_offsets(n, shape_in, scale, config.base_spacing_in);

    let pivot = if n > 1 {
        let c = centroid(offsets.iter().map(|o| o.to_point()));
        for o in &mut offsets {
            *o -= c.to_vec2();
        }
        c
    } else {
        Point::ORIGIN
    };

    let fill = palette_color(color_index);
    let bases = offsets
        .into_iter()
        .map(|o| BaseInstance {
            shape: shape_px,
            position: o.to_point(),
            rotation: 0.0,
            opacity: config.base_opacity,
            stroke: Stroke::default(),
            fill,
            draggable: false,
        })
        .collect();

    log::trace!("laid out {id} ({}) with {n} bases, pivot {pivot:?}", unit.id);

    TokenInstance {
        id,
        unit: unit.id,
        position,
        rotation: 0.0,
        pivot,
        bases,
        color_index,
        opacity: config.token_opacity,
        draggable: true,
        deleted: false,
    }
}
