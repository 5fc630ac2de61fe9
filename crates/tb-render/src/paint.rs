//! Board scene → Vello drawing commands.
//!
//! Paints the four layers bottom to top: terrain, objectives, zones,
//! units. Entity opacity is read straight from the model, so drag and
//! rotation-target feedback needs no extra state here.

use kurbo::{Affine, Cap, Circle, Ellipse, Join, Line, Rect, Shape, Stroke as KurboStroke};
use peniko::{Color, Fill, Image};
use tb_core::model::{BaseInstance, BaseShape, Color as BoardColor, Stroke, TokenInstance};
use tb_core::overlay::{DrawnCircle, DrawnLine};
use tb_core::scene::Scene as Board;
use tb_core::Layer;
use vello::Scene;

/// Paint the whole board to a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`. `terrain` is the
/// decoded background image, stretched to the board; pass `None` when the
/// board has no terrain or the host has not loaded it yet.
pub fn paint_board(scene: &mut Scene, board: &Board, terrain: Option<&Image>) {
    for layer in Layer::ORDER {
        match layer {
            Layer::Terrain => paint_terrain(scene, board, terrain),
            Layer::Objectives => {
                for circle in board.objective_marks() {
                    paint_marker(scene, circle);
                }
            }
            Layer::Zones => {
                for line in board.zone_lines() {
                    paint_zone_line(scene, line);
                }
            }
            Layer::Units => {
                for token in board.tokens() {
                    paint_token(scene, token);
                }
            }
        }
    }
}

// ─── Layer painters ──────────────────────────────────────────────────────

fn paint_terrain(scene: &mut Scene, board: &Board, terrain: Option<&Image>) {
    let (Some(image), Some(_)) = (terrain, board.terrain()) else {
        return;
    };
    if image.width == 0 || image.height == 0 {
        return;
    }
    let scale = board.scale();
    let fit = Affine::scale_non_uniform(
        scale.width / image.width as f64,
        scale.height / image.height as f64,
    );
    scene.draw_image(image, fit);
}

fn paint_marker(scene: &mut Scene, circle: &DrawnCircle) {
    let shape = Circle::new(circle.center, circle.radius);
    if let Some(fill) = circle.fill {
        scene.fill(Fill::NonZero, Affine::IDENTITY, to_color(fill, 1.0), None, &shape);
    }
    if let Some(stroke) = circle.stroke {
        stroke_shape(scene, Affine::IDENTITY, &shape, &stroke, 1.0);
    }
}

fn paint_zone_line(scene: &mut Scene, line: &DrawnLine) {
    let style = KurboStroke::new(line.width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    scene.stroke(
        &style,
        Affine::IDENTITY,
        to_color(line.color, 1.0),
        None,
        &Line::new(line.from, line.to),
    );
}

fn paint_token(scene: &mut Scene, token: &TokenInstance) {
    let to_board = token.affine();
    for base in &token.bases {
        let opacity = token.opacity * base.opacity;
        log::trace!(
            "BASE {} {:?} at {:?} rot {} opacity {opacity}",
            token.id,
            base.shape,
            base.position,
            base.rotation
        );
        paint_base(scene, to_board * base.affine(), base, opacity);
    }
}

fn paint_base(scene: &mut Scene, transform: Affine, base: &BaseInstance, opacity: f64) {
    match base.shape {
        BaseShape::Circle { radius } => {
            let shape = Circle::new((0.0, 0.0), radius);
            fill_and_stroke(scene, transform, &shape, base, opacity);
        }
        BaseShape::Ellipse { radius_x, radius_y } => {
            let shape = Ellipse::new((0.0, 0.0), (radius_x, radius_y), 0.0);
            fill_and_stroke(scene, transform, &shape, base, opacity);
        }
        BaseShape::Rectangle { .. } => {
            let shape: Rect = base.shape.local_rect();
            fill_and_stroke(scene, transform, &shape, base, opacity);
        }
    }
}

// ─── Fill and stroke ─────────────────────────────────────────────────────

fn fill_and_stroke<S: Shape>(
    scene: &mut Scene,
    transform: Affine,
    shape: &S,
    base: &BaseInstance,
    opacity: f64,
) {
    scene.fill(Fill::NonZero, transform, to_color(base.fill, opacity), None, shape);
    stroke_shape(scene, transform, shape, &base.stroke, opacity);
}

fn stroke_shape<S: Shape>(
    scene: &mut Scene,
    transform: Affine,
    shape: &S,
    stroke: &Stroke,
    opacity: f64,
) {
    if stroke.width <= 0.0 {
        return;
    }
    let style = KurboStroke::new(stroke.width);
    scene.stroke(&style, transform, to_color(stroke.color, opacity), None, shape);
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn to_color(c: BoardColor, opacity: f64) -> Color {
    let c = c.with_opacity(opacity);
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_core::{BoardConfig, UnitCatalog};

    #[test]
    fn opacity_scales_alpha() {
        let c = to_color(BoardColor::rgb(255, 0, 0), 0.5);
        assert!((c.components[3] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.components[0], 1.0);
    }

    #[test]
    fn paints_populated_board_without_terrain_image() {
        let mut board = Board::new(880.0, 1200.0, UnitCatalog::demo(), BoardConfig::default());
        board.spawn("tank", None).unwrap();
        board.spawn("bikers", None).unwrap();
        board.set_terrain(Some(tb_core::TerrainImage::new("terrain.png")));

        let mut scene = Scene::new();
        paint_board(&mut scene, &board, None);
        assert!(!scene.encoding().is_empty());
    }
}
