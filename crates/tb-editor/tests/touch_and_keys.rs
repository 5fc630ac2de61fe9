//! Integration tests: device input → adapters → interaction → scene.
//!
//! Drives `BoardEditor::handle_input` the way the browser host does and
//! checks the resulting board state.

use pretty_assertions::assert_eq;
use tb_core::{Point, TokenId, UnitCatalog};
use tb_editor::*;

fn init_logs() {
    let _ = env_logger::Builder::new().is_test(true).try_init();
}

fn editor() -> BoardEditor {
    init_logs();
    BoardEditor::new(880.0, 1200.0, UnitCatalog::demo())
}

fn tap(ed: &mut BoardEditor, at: Point) -> bool {
    let started = ed.handle_input(InputEvent::touch_start(&[at]));
    ed.handle_input(InputEvent::touch_end(&[])) || started
}

const EMPTY: Point = Point::new(60.0, 60.0);
const OFF_BOARD: Point = Point::new(-20.0, -20.0);

// ─── Tap selection ───────────────────────────────────────────────────────

#[test]
fn tap_selects_then_board_taps_rotate() {
    let mut ed = editor();
    let at = Point::new(400.0, 600.0);
    let id = ed.spawn_token("tank", Some(at)).unwrap();

    assert!(tap(&mut ed, at));
    assert_eq!(ed.rotation_target(), Some(Target::Token(id)));
    assert_eq!(ed.state_of(Target::Token(id)), EntityState::RotationTargetActive);
    assert_eq!(ed.scene().token(id).unwrap().opacity, 0.7);

    tap(&mut ed, EMPTY);
    tap(&mut ed, EMPTY);
    assert_eq!(ed.scene().token(id).unwrap().rotation, 15.0);
    assert_eq!(ed.scene().token(id).unwrap().position, at);

    assert!(tap(&mut ed, OFF_BOARD));
    assert_eq!(ed.rotation_target(), None);
    let token = ed.scene().token(id).unwrap();
    assert_eq!(token.opacity, 1.0);
    assert!(token.draggable);
    assert_eq!(token.rotation, 15.0);
}

#[test]
fn second_tap_releases_target() {
    let mut ed = editor();
    let at = Point::new(400.0, 600.0);
    let id = ed.spawn_token("tank", Some(at)).unwrap();
    tap(&mut ed, at);
    tap(&mut ed, at);
    assert_eq!(ed.rotation_target(), None);
    assert_eq!(ed.state_of(Target::Token(id)), EntityState::Idle);
}

#[test]
fn model_mode_tap_targets_one_base() {
    let mut ed = editor();
    let id = ed.spawn_token("bikers", None).unwrap();
    ed.set_drag_mode(DragMode::Model);
    let at = ed.scene().token(id).unwrap().base_world_position(1).unwrap();

    tap(&mut ed, at);
    let target = Target::Base { token: id, index: 1 };
    assert_eq!(ed.rotation_target(), Some(target));
    assert!(!ed.scene().token(id).unwrap().bases[1].draggable);

    tap(&mut ed, EMPTY);
    let token = ed.scene().token(id).unwrap();
    assert_eq!(token.rotation, 0.0);
    assert_eq!(token.bases[1].rotation, 7.5);
    assert_eq!(token.bases[0].rotation, 0.0);
}

#[test]
fn double_tap_on_empty_board_cancels_target() {
    let mut ed = editor();
    let at = Point::new(400.0, 600.0);
    ed.spawn_token("tank", Some(at)).unwrap();
    tap(&mut ed, at);
    assert!(ed.rotation_target().is_some());

    assert!(ed.handle_input(InputEvent::DoubleTap {
        x: EMPTY.x,
        y: EMPTY.y
    }));
    assert_eq!(ed.rotation_target(), None);
}

// ─── Gestures ────────────────────────────────────────────────────────────

#[test]
fn one_finger_drag_moves_token() {
    let mut ed = editor();
    let at = Point::new(400.0, 600.0);
    let id = ed.spawn_token("tank", Some(at)).unwrap();

    ed.handle_input(InputEvent::touch_start(&[at]));
    assert!(ed.handle_input(InputEvent::touch_move(&[Point::new(430.0, 640.0)])));
    assert_eq!(ed.state_of(Target::Token(id)), EntityState::Dragging);
    assert!(ed.handle_input(InputEvent::touch_end(&[])));

    let token = ed.scene().token(id).unwrap();
    assert_eq!(token.position, Point::new(430.0, 640.0));
    assert_eq!(token.opacity, 1.0);
    assert_eq!(ed.state_of(Target::Token(id)), EntityState::Idle);
}

#[test]
fn two_finger_twist_rotates_active_token() {
    let mut ed = editor();
    let id = ed.spawn_token("bikers", Some(Point::new(400.0, 600.0))).unwrap();
    let a = EMPTY;
    let finger = |deg: f64| {
        let r = deg.to_radians();
        Point::new(a.x + 100.0 * r.cos(), a.y + 100.0 * r.sin())
    };

    ed.handle_input(InputEvent::touch_start(&[a]));
    ed.handle_input(InputEvent::touch_start(&[a, finger(0.0)]));
    ed.handle_input(InputEvent::touch_move(&[a, finger(8.0)]));
    ed.handle_input(InputEvent::touch_move(&[a, finger(16.0)]));
    ed.handle_input(InputEvent::touch_end(&[a]));
    ed.handle_input(InputEvent::touch_end(&[]));

    assert_eq!(ed.scene().token(id).unwrap().rotation, 15.0);
}

#[test]
fn stray_nan_pointer_move_does_not_corrupt_drag() {
    let mut ed = editor();
    let at = Point::new(400.0, 600.0);
    let id = ed.spawn_token("tank", Some(at)).unwrap();

    let down = InputEvent::pointer_down(at.x, at.y, PointerButton::Primary, Modifiers::NONE);
    assert!(ed.handle_input(down));
    assert!(!ed.handle_input(InputEvent::PointerMove { x: f64::NAN, y: 610.0 }));
    assert!(ed.handle_input(InputEvent::PointerMove { x: 420.0, y: 610.0 }));
    assert!(ed.handle_input(InputEvent::PointerUp { x: 420.0, y: 610.0 }));

    let token = ed.scene().token(id).unwrap();
    assert_eq!(token.position, Point::new(420.0, 610.0));
    assert!(!ed.rotate_active_selection(f64::NAN));
    assert_eq!(ed.scene().token(id).unwrap().rotation, 0.0);

    let snaps = ed.list_token_instances();
    ed.restore_token_instances(&snaps);
    assert_eq!(ed.scene().tokens()[0].position, Point::new(420.0, 610.0));
}

// ─── Keys and warnings ───────────────────────────────────────────────────

#[test]
fn escape_clears_and_m_toggles_mode() {
    let mut ed = editor();
    let at = Point::new(400.0, 600.0);
    ed.spawn_token("tank", Some(at)).unwrap();
    tap(&mut ed, at);

    ed.handle_input(InputEvent::key("Escape"));
    assert_eq!(ed.rotation_target(), None);
    assert_eq!(ed.active(), None);

    ed.handle_input(InputEvent::key("m"));
    assert_eq!(ed.mode(), DragMode::Model);
    ed.handle_input(InputEvent::key("m"));
    assert_eq!(ed.mode(), DragMode::Group);
}

#[test]
fn delete_is_idempotent_and_warns_only_for_unknown_ids() {
    let mut ed = editor();
    let id = ed.spawn_token("captain", None).unwrap();
    assert!(ed.delete_token(id));
    assert!(!ed.delete_token(id));
    assert!(ed.take_warnings().is_empty());

    assert!(!ed.delete_token(TokenId(99)));
    let codes: Vec<&str> = ed.take_warnings().iter().map(|w| w.code()).collect();
    assert_eq!(codes, vec!["token-not-found"]);
    assert!(ed.take_warnings().is_empty());
}

#[test]
fn roster_tracks_spawned_instances() {
    let mut ed = editor();
    let a = ed.spawn_token("marines", None).unwrap();
    let b = ed.spawn_token("Marines", None).unwrap();
    let roster = ed.roster();
    let marines = roster.iter().find(|r| r.unit.as_str() == "marines").unwrap();
    assert_eq!(marines.instances, vec![a, b]);
    assert!(marines.deployed());

    ed.replace_catalog(UnitCatalog::demo());
    assert!(ed.roster().iter().all(|r| !r.deployed()));
    assert!(ed.scene().tokens().is_empty());
}
