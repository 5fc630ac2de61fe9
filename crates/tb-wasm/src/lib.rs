//! WASM bridge for the tabletop board: exposes `BoardEditor` to the page.
//!
//! Compiled via `wasm-pack build --target web`. Catalogs, configs and
//! token snapshots cross the boundary as JSON; the persisted board blob is
//! MessagePack bytes.

mod render2d;

use serde::Serialize;
use tb_core::snapshot;
use tb_core::{
    BoardConfig, BoardWarning, Point, RosterItem, TerrainImage, TokenId, TokenSnapshot,
    UnitCatalog,
};
use tb_editor::{BoardEditor, DragMode, InputEvent, Modifiers, PointerButton};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// The WASM-facing board controller.
///
/// Owns the editor; every page interaction goes through this struct.
/// Input handlers return `true` when the board needs a repaint.
#[wasm_bindgen]
pub struct BoardCanvas {
    editor: BoardEditor,
}

#[wasm_bindgen]
impl BoardCanvas {
    /// Create a board for a container of the given size from a JSON unit
    /// catalog. A malformed catalog yields an empty roster.
    #[wasm_bindgen(constructor)]
    pub fn new(container_w: f64, container_h: f64, catalog_json: &str) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: BoardEditor::new(container_w, container_h, parse_catalog(catalog_json)),
        }
    }

    /// Like `new`, with a JSON `BoardConfig`. Missing fields take defaults.
    pub fn with_config(
        container_w: f64,
        container_h: f64,
        catalog_json: &str,
        config_json: &str,
    ) -> BoardCanvas {
        console_error_panic_hook_setup();
        let config = parse_config(config_json);
        Self {
            editor: BoardEditor::with_config(
                container_w,
                container_h,
                parse_catalog(catalog_json),
                config,
            ),
        }
    }

    /// Board size in pixels as `[width, height]`.
    pub fn board_size(&self) -> Vec<f64> {
        let scale = self.editor.scene().scale();
        vec![scale.width, scale.height]
    }

    /// Render to a Canvas2D context. Pass the loaded terrain image, if any.
    pub fn render(&self, ctx: &CanvasRenderingContext2d, terrain: Option<HtmlImageElement>) {
        render2d::render_board(
            ctx,
            self.editor.scene(),
            terrain.as_ref(),
            self.editor.rotation_target(),
        );
    }

    // ─── Tokens ──────────────────────────────────────────────────────────

    /// Spawn a unit by id or name. `x`/`y` are optional board pixels.
    /// Returns the token handle, or `undefined` for unknown units.
    pub fn spawn_token(&mut self, unit: &str, x: Option<f64>, y: Option<f64>) -> Option<u32> {
        let point = match (x, y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        };
        self.editor.spawn_token(unit, point).ok().map(|id| id.0)
    }

    pub fn delete_token(&mut self, id: u32) -> bool {
        self.editor.delete_token(TokenId(id))
    }

    /// `true` selects model mode, `false` group mode.
    pub fn set_drag_mode(&mut self, model: bool) -> bool {
        let mode = if model { DragMode::Model } else { DragMode::Group };
        self.editor.set_drag_mode(mode)
    }

    /// Flip the drag mode and return the new mode's button label.
    pub fn toggle_drag_mode(&mut self) -> String {
        self.editor.toggle_drag_mode().label().to_string()
    }

    pub fn drag_mode_label(&self) -> String {
        self.editor.mode().label().to_string()
    }

    pub fn rotate_active_selection(&mut self, step_degrees: f64) -> bool {
        self.editor.rotate_active_selection(step_degrees)
    }

    pub fn recolor_token(&mut self, id: u32, color_index: u32) -> bool {
        self.editor
            .recolor_token(TokenId(id), color_index as usize)
            .is_ok()
    }

    /// Advance a token's color. Returns the new palette index.
    pub fn cycle_token_color(&mut self, id: u32) -> Option<u32> {
        self.editor
            .cycle_token_color(TokenId(id))
            .ok()
            .map(|i| i as u32)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Every live token as a JSON array of snapshots.
    pub fn list_token_instances(&self) -> String {
        serde_json::to_string(&self.editor.list_token_instances())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace all tokens from a JSON snapshot array. Returns `false` (and
    /// leaves the board untouched) on malformed input.
    pub fn restore_token_instances(&mut self, json: &str) -> bool {
        match parse_snapshots(json) {
            Ok(snapshots) => {
                self.editor.restore_token_instances(&snapshots);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// Compact MessagePack blob of every live token.
    pub fn save_blob(&self) -> Vec<u8> {
        match snapshot::encode(&self.editor.list_token_instances()) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{e}");
                Vec::new()
            }
        }
    }

    pub fn load_blob(&mut self, bytes: &[u8]) -> bool {
        match snapshot::decode(bytes) {
            Ok(snapshots) => {
                self.editor.restore_token_instances(&snapshots);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    // ─── Roster, terrain, overlays ───────────────────────────────────────

    /// Swap the unit catalog; every placed token is dropped.
    pub fn set_catalog(&mut self, catalog_json: &str) -> bool {
        match serde_json::from_str::<UnitCatalog>(catalog_json) {
            Ok(catalog) => {
                self.editor.replace_catalog(catalog);
                true
            }
            Err(e) => {
                log::warn!("catalog JSON error: {e}");
                false
            }
        }
    }

    /// Roster rows as JSON: `[{"unit","label","color","deployed","instances"}]`.
    pub fn roster(&self) -> String {
        roster_json(&self.editor.roster())
    }

    /// Advance a roster entry's color for later spawns. Returns the new
    /// palette index, or `undefined` for an unknown unit.
    pub fn cycle_roster_color(&mut self, unit: &str) -> Option<u32> {
        self.editor.cycle_roster_color(unit).ok().map(|i| i as u32)
    }

    /// Set (or clear, with `undefined`) the terrain image source.
    pub fn set_terrain(&mut self, source: Option<String>) {
        self.editor.set_terrain(source.map(TerrainImage::new));
    }

    pub fn terrain_source(&self) -> Option<String> {
        self.editor.scene().terrain().map(|t| t.source.clone())
    }

    pub fn cycle_deployment_zone(&mut self) -> u32 {
        self.editor.cycle_deployment_zone() as u32
    }

    pub fn set_deployment_zone_index(&mut self, index: u32) -> u32 {
        self.editor.set_deployment_zone_index(index as usize) as u32
    }

    pub fn cycle_objective_layout(&mut self) -> u32 {
        self.editor.cycle_objective_layout() as u32
    }

    pub fn set_objective_layout_index(&mut self, index: u32) -> u32 {
        self.editor.set_objective_layout_index(index as usize) as u32
    }

    pub fn zone_name(&self) -> String {
        self.editor.scene().zone_name().to_string()
    }

    pub fn objective_name(&self) -> String {
        self.editor.scene().objective_name().to_string()
    }

    /// Drain collected warnings as JSON: `[{"code","message"}]`.
    pub fn take_warnings(&mut self) -> String {
        warnings_json(&self.editor.take_warnings())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Mouse button pressed. `button` is `MouseEvent.button`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.editor.handle_input(InputEvent::pointer_down(
            x,
            y,
            PointerButton::from_dom(button),
            modifiers,
        ))
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle_input(InputEvent::PointerMove { x, y })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle_input(InputEvent::PointerUp { x, y })
    }

    /// Touch handlers take every active touch as flat `[x0, y0, x1, y1, ...]`.
    pub fn handle_touch_start(&mut self, coords: &[f64]) -> bool {
        self.editor
            .handle_input(InputEvent::touch_start(&touches_from_flat(coords)))
    }

    pub fn handle_touch_move(&mut self, coords: &[f64]) -> bool {
        self.editor
            .handle_input(InputEvent::touch_move(&touches_from_flat(coords)))
    }

    /// `coords` lists the touches still down.
    pub fn handle_touch_end(&mut self, coords: &[f64]) -> bool {
        self.editor
            .handle_input(InputEvent::touch_end(&touches_from_flat(coords)))
    }

    pub fn handle_double_tap(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle_input(InputEvent::DoubleTap { x, y })
    }

    /// Keyboard event (`KeyboardEvent.key`). Returns `true` when the key
    /// was consumed and the board changed.
    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.editor.handle_input(InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }
}

// ─── Boundary helpers ────────────────────────────────────────────────────

fn parse_catalog(json: &str) -> UnitCatalog {
    serde_json::from_str(json).unwrap_or_else(|e| {
        log::warn!("catalog JSON error: {e}");
        UnitCatalog::default()
    })
}

fn parse_config(json: &str) -> BoardConfig {
    serde_json::from_str(json).unwrap_or_else(|e| {
        log::warn!("config JSON error: {e}");
        BoardConfig::default()
    })
}

fn parse_snapshots(json: &str) -> Result<Vec<TokenSnapshot>, String> {
    serde_json::from_str(json).map_err(|e| format!("snapshot JSON error: {e}"))
}

/// Pair up flat coordinates; a trailing odd value is ignored.
fn touches_from_flat(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

#[derive(Serialize)]
struct RosterRow<'a> {
    unit: &'a str,
    label: &'a str,
    color: String,
    deployed: bool,
    instances: Vec<u32>,
}

fn roster_json(roster: &[RosterItem]) -> String {
    let rows: Vec<RosterRow<'_>> = roster
        .iter()
        .map(|item| RosterRow {
            unit: item.unit.as_str(),
            label: &item.label,
            color: item.color().to_hex(),
            deployed: item.deployed(),
            instances: item.instances.iter().map(|id| id.0).collect(),
        })
        .collect();
    serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Serialize)]
struct WarningRow {
    code: &'static str,
    message: String,
}

fn warnings_json(warnings: &[BoardWarning]) -> String {
    let rows: Vec<WarningRow> = warnings
        .iter()
        .map(|w| WarningRow {
            code: w.code(),
            message: w.to_string(),
        })
        .collect();
    serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Tabletop board WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CATALOG: &str = r#"[
        {"id": "scouts", "name": "Scouts", "shape": "circle", "radius": 0.5, "modelCount": 3, "color": "green"}
    ]"#;

    #[test]
    fn flat_touches_pair_up() {
        let touches = touches_from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(touches, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn malformed_inputs_fall_back() {
        assert!(parse_catalog("not json").is_empty());
        assert_eq!(parse_config("{"), BoardConfig::default());
        assert!(parse_snapshots("[{").is_err());
    }

    #[test]
    fn canvas_round_trips_snapshots_through_json() {
        let mut canvas = BoardCanvas::new(880.0, 1200.0, CATALOG);
        let id = canvas.spawn_token("scouts", Some(200.0), Some(300.0)).unwrap();
        assert!(canvas.rotate_active_selection(7.5));
        let json = canvas.list_token_instances();

        let mut other = BoardCanvas::new(880.0, 1200.0, CATALOG);
        assert!(other.restore_token_instances(&json));
        assert_eq!(other.list_token_instances(), json);
        assert!(other.delete_token(id));
        assert!(!other.restore_token_instances("nope"));
    }

    #[test]
    fn roster_and_warnings_serialize() {
        let mut canvas = BoardCanvas::new(880.0, 1200.0, CATALOG);
        let id = canvas.spawn_token("scouts", None, None).unwrap();
        assert!(canvas.spawn_token("ghosts", None, None).is_none());

        let roster: serde_json::Value = serde_json::from_str(&canvas.roster()).unwrap();
        assert_eq!(roster[0]["unit"], "scouts");
        assert_eq!(roster[0]["deployed"], true);
        assert_eq!(roster[0]["instances"][0], id);

        let warnings: serde_json::Value = serde_json::from_str(&canvas.take_warnings()).unwrap();
        assert_eq!(warnings[0]["code"], "unit-not-found");
        assert_eq!(canvas.take_warnings(), "[]");
    }

    #[test]
    fn roster_color_cycles_before_deploying() {
        let mut canvas = BoardCanvas::new(880.0, 1200.0, CATALOG);
        assert_eq!(canvas.cycle_roster_color("scouts"), Some(6));
        assert_eq!(canvas.cycle_roster_color("ghosts"), None);
        let id = canvas.spawn_token("scouts", None, None).unwrap();
        assert_eq!(canvas.cycle_token_color(id), Some(7));

        let snaps: serde_json::Value =
            serde_json::from_str(&canvas.list_token_instances()).unwrap();
        assert_eq!(snaps[0]["colorIndex"], 7);
    }

    #[test]
    fn keys_and_overlays() {
        let mut canvas = BoardCanvas::new(880.0, 1200.0, CATALOG);
        assert_eq!(canvas.drag_mode_label(), "Move Group");
        assert!(canvas.handle_key("m", false, false, false, false));
        assert_eq!(canvas.drag_mode_label(), "Move Models");
        assert!(!canvas.handle_key("z", false, false, false, true));
        assert_eq!(canvas.cycle_deployment_zone(), 1);
        assert_eq!(canvas.set_objective_layout_index(5), 2);
    }
}
