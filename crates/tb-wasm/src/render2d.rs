//! Canvas2D software renderer.
//!
//! Draws the board layers to an HTML `<canvas>` via
//! `CanvasRenderingContext2d`, bottom to top. Mirrors `tb_render::paint`
//! for hosts without a GPU surface. The rotation target also gets a dashed
//! outline.

use std::f64::consts::TAU;
use tb_core::model::{BaseInstance, BaseShape, TokenInstance};
use tb_core::overlay::{DrawnCircle, DrawnLine};
use tb_core::{Affine, Layer, Scene};
use tb_editor::Target;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const OUTLINE: &str = "#FFFFFF";

/// Render the whole board. `terrain` is the loaded background image, if any.
pub fn render_board(
    ctx: &CanvasRenderingContext2d,
    board: &Scene,
    terrain: Option<&HtmlImageElement>,
    rotation_target: Option<Target>,
) {
    let scale = board.scale();
    ctx.clear_rect(0.0, 0.0, scale.width, scale.height);

    for layer in Layer::ORDER {
        match layer {
            Layer::Terrain => {
                if let (Some(img), Some(_)) = (terrain, board.terrain()) {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        0.0,
                        0.0,
                        scale.width,
                        scale.height,
                    );
                }
            }
            Layer::Objectives => {
                for circle in board.objective_marks() {
                    draw_marker(ctx, circle);
                }
            }
            Layer::Zones => {
                for line in board.zone_lines() {
                    draw_zone_line(ctx, line);
                }
            }
            Layer::Units => {
                for token in board.tokens() {
                    draw_token(ctx, token, rotation_target);
                }
            }
        }
    }
}

fn draw_marker(ctx: &CanvasRenderingContext2d, circle: &DrawnCircle) {
    ctx.begin_path();
    let _ = ctx.arc(circle.center.x, circle.center.y, circle.radius, 0.0, TAU);
    if let Some(fill) = circle.fill {
        ctx.set_fill_style_str(&fill.to_css());
        ctx.fill();
    }
    if let Some(stroke) = circle.stroke {
        ctx.set_stroke_style_str(&stroke.color.to_css());
        ctx.set_line_width(stroke.width);
        ctx.stroke();
    }
}

fn draw_zone_line(ctx: &CanvasRenderingContext2d, line: &DrawnLine) {
    ctx.save();
    ctx.begin_path();
    ctx.move_to(line.from.x, line.from.y);
    ctx.line_to(line.to.x, line.to.y);
    ctx.set_stroke_style_str(&line.color.to_css());
    ctx.set_line_width(line.width);
    ctx.set_line_cap("round");
    ctx.stroke();
    ctx.restore();
}

fn draw_token(ctx: &CanvasRenderingContext2d, token: &TokenInstance, highlight: Option<Target>) {
    let to_board = token.affine();
    for (index, base) in token.bases.iter().enumerate() {
        let outlined = match highlight {
            Some(Target::Token(id)) => id == token.id,
            Some(Target::Base { token: id, index: i }) => id == token.id && i == index,
            None => false,
        };
        let opacity = token.opacity * base.opacity;
        draw_base(ctx, to_board * base.affine(), base, opacity, outlined);
    }
}

fn draw_base(
    ctx: &CanvasRenderingContext2d,
    transform: Affine,
    base: &BaseInstance,
    opacity: f64,
    outlined: bool,
) {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    ctx.save();
    let _ = ctx.set_transform(a, b, c, d, e, f);
    ctx.set_global_alpha(opacity);

    ctx.begin_path();
    match base.shape {
        BaseShape::Circle { radius } => {
            let _ = ctx.arc(0.0, 0.0, radius, 0.0, TAU);
        }
        BaseShape::Ellipse { radius_x, radius_y } => {
            let _ = ctx.ellipse(0.0, 0.0, radius_x, radius_y, 0.0, 0.0, TAU);
        }
        BaseShape::Rectangle { .. } => {
            let r = base.shape.local_rect();
            ctx.rect(r.x0, r.y0, r.width(), r.height());
        }
    }

    ctx.set_fill_style_str(&base.fill.to_css());
    ctx.fill();
    if base.stroke.width > 0.0 {
        ctx.set_stroke_style_str(&base.stroke.color.to_css());
        ctx.set_line_width(base.stroke.width);
        ctx.stroke();
    }
    if outlined {
        let _ = ctx.set_line_dash(&js_sys::Array::of2(
            &wasm_bindgen::JsValue::from_f64(4.0),
            &wasm_bindgen::JsValue::from_f64(4.0),
        ));
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(1.5);
        ctx.stroke();
    }
    ctx.restore();
}
