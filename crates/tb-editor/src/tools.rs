//! Device input adapters.
//!
//! Each adapter translates raw input events into interaction `Command`s.
//! Adapters never look at the drag mode: they aim at the base under the
//! finger or cursor, and the state machine widens that to the token in
//! group mode.
//!
//! ## Gestures
//!
//! | Gesture                        | Pointer              | Touch                  |
//! |--------------------------------|----------------------|------------------------|
//! | **Drag**                       | Primary press + move | One finger past slop   |
//! | **Rotate entity**              | Shift + right click  | Tap entity, tap board  |
//! | **Rotate in steps**            | Keys `1` / `2`       | Two-finger twist       |
//! | **Cancel rotation target**     | `Escape`             | Tap off board / double tap |

use crate::commands::{Aim, Command};
use crate::input::{InputEvent, PointerButton, Touches};
use crate::session::Target;
use kurbo::Point;
use tb_render::Hit;

/// What lies under the event's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointInfo {
    pub hit: Option<Hit>,
    /// Whether the position is on the board surface at all.
    pub on_board: bool,
}

impl PointInfo {
    pub fn target(&self) -> Option<Target> {
        self.hit.map(|h| Target::Base {
            token: h.token,
            index: h.base,
        })
    }
}

/// Trait for adapters that turn device input into commands.
pub trait InputAdapter {
    /// Handle an input event, returning zero or more commands.
    fn handle(&mut self, event: &InputEvent, under: PointInfo) -> Vec<Command>;

    /// Drop any half-finished gesture.
    fn reset(&mut self);
}

// ─── Pointer ─────────────────────────────────────────────────────────────

/// Mouse adapter: press drags, Shift + secondary click rotates.
pub struct PointerAdapter {
    step_degrees: f64,
    dragging: bool,
}

impl PointerAdapter {
    pub fn new(step_degrees: f64) -> Self {
        Self {
            step_degrees,
            dragging: false,
        }
    }
}

impl InputAdapter for PointerAdapter {
    fn handle(&mut self, event: &InputEvent, under: PointInfo) -> Vec<Command> {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => {
                let Some(target) = under.target() else {
                    return Vec::new();
                };
                match button {
                    PointerButton::Secondary if modifiers.shift => vec![Command::RotateStep {
                        aim: Aim::Entity(target),
                        degrees: self.step_degrees,
                    }],
                    PointerButton::Primary if !modifiers.shift => {
                        self.dragging = true;
                        vec![Command::BeginDrag {
                            target,
                            at: Point::new(*x, *y),
                        }]
                    }
                    _ => Vec::new(),
                }
            }

            InputEvent::PointerMove { x, y } => {
                if self.dragging {
                    vec![Command::DragTo {
                        at: Point::new(*x, *y),
                    }]
                } else {
                    vec![Command::Hover(under.target())]
                }
            }

            InputEvent::PointerUp { x, y } => {
                if std::mem::take(&mut self.dragging) {
                    vec![Command::EndDrag {
                        at: Point::new(*x, *y),
                    }]
                } else {
                    Vec::new()
                }
            }

            _ => Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.dragging = false;
    }
}

// ─── Touch ───────────────────────────────────────────────────────────────

/// One-finger contact that has not yet become a drag.
#[derive(Debug, Clone, Copy)]
struct Press {
    start: Point,
    last: Point,
    target: Option<Target>,
    on_board: bool,
    dragging: bool,
}

/// Touch adapter.
///
/// A one-finger contact becomes a drag only after it travels past the tap
/// slop; otherwise lifting it is a tap. Tapping an entity toggles it as the
/// rotation target, tapping empty board rotates the target by one step,
/// and tapping off the board clears it. Two fingers twist in whole steps.
pub struct TouchAdapter {
    step_degrees: f64,
    twist_threshold: f64,
    tap_slop: f64,
    press: Option<Press>,
    /// Previous two-finger angle and the twist accumulated since the last
    /// emitted step, in degrees.
    twist: Option<(f64, f64)>,
}

impl TouchAdapter {
    pub fn new(step_degrees: f64, twist_threshold: f64, tap_slop: f64) -> Self {
        Self {
            step_degrees,
            twist_threshold: twist_threshold.abs().max(f64::EPSILON),
            tap_slop,
            press: None,
            twist: None,
        }
    }

    fn finger_angle(touches: &Touches) -> Option<f64> {
        let (a, b) = (touches.first()?, touches.get(1)?);
        let d = *b - *a;
        Some(d.y.atan2(d.x).to_degrees())
    }

    /// Abandon the one-finger press, ending its drag if one started.
    fn cancel_press(&mut self, out: &mut Vec<Command>) {
        if let Some(press) = self.press.take()
            && press.dragging
        {
            out.push(Command::EndDrag { at: press.last });
        }
    }

    fn twist_to(&mut self, angle: f64, out: &mut Vec<Command>) {
        let Some((previous, accumulated)) = self.twist else {
            self.twist = Some((angle, 0.0));
            return;
        };
        // Unwrap across the ±180° seam.
        let mut delta = angle - previous;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        let mut acc = accumulated + delta;
        while acc >= self.twist_threshold {
            out.push(Command::RotateStep {
                aim: Aim::Active,
                degrees: self.step_degrees,
            });
            acc -= self.twist_threshold;
        }
        while acc <= -self.twist_threshold {
            out.push(Command::RotateStep {
                aim: Aim::Active,
                degrees: -self.step_degrees,
            });
            acc += self.twist_threshold;
        }
        self.twist = Some((angle, acc));
    }

    fn tap(&self, press: Press) -> Command {
        match (press.target, press.on_board) {
            (Some(target), _) => Command::SelectTarget(target),
            (None, true) => Command::RotateStep {
                aim: Aim::Active,
                degrees: self.step_degrees,
            },
            (None, false) => Command::ClearSelection,
        }
    }
}

impl InputAdapter for TouchAdapter {
    fn handle(&mut self, event: &InputEvent, under: PointInfo) -> Vec<Command> {
        let mut out = Vec::new();
        match event {
            InputEvent::TouchStart { touches } => match touches.len() {
                0 => {}
                1 => {
                    self.twist = None;
                    self.press = Some(Press {
                        start: touches[0],
                        last: touches[0],
                        target: under.target(),
                        on_board: under.on_board,
                        dragging: false,
                    });
                }
                _ => {
                    self.cancel_press(&mut out);
                    self.twist = Self::finger_angle(touches).map(|a| (a, 0.0));
                }
            },

            InputEvent::TouchMove { touches } => {
                if touches.len() >= 2 {
                    if let Some(angle) = Self::finger_angle(touches) {
                        self.twist_to(angle, &mut out);
                    }
                } else if let (Some(p), Some(press)) = (touches.first(), self.press.as_mut()) {
                    if !press.dragging && (*p - press.start).hypot() > self.tap_slop {
                        if let Some(target) = press.target {
                            press.dragging = true;
                            out.push(Command::BeginDrag {
                                target,
                                at: press.start,
                            });
                        }
                    }
                    if press.dragging {
                        out.push(Command::DragTo { at: *p });
                    }
                    press.last = *p;
                }
            }

            InputEvent::TouchEnd { touches } => {
                if touches.len() < 2 {
                    self.twist = None;
                }
                if touches.is_empty()
                    && let Some(press) = self.press.take()
                {
                    if press.dragging {
                        out.push(Command::EndDrag { at: press.last });
                    } else if (press.last - press.start).hypot() <= self.tap_slop {
                        out.push(self.tap(press));
                    }
                }
            }

            InputEvent::DoubleTap { .. } => {
                if under.hit.is_none() {
                    out.push(Command::ClearSelection);
                }
            }

            _ => {}
        }
        out
    }

    fn reset(&mut self) {
        self.press = None;
        self.twist = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use tb_core::TokenId;

    fn hit(token: u32, base: usize) -> PointInfo {
        PointInfo {
            hit: Some(Hit {
                token: TokenId(token),
                base,
            }),
            on_board: true,
        }
    }

    const BOARD: PointInfo = PointInfo {
        hit: None,
        on_board: true,
    };
    const OFF_BOARD: PointInfo = PointInfo {
        hit: None,
        on_board: false,
    };

    fn touch() -> TouchAdapter {
        TouchAdapter::new(7.5, 7.5, 4.0)
    }

    #[test]
    fn pointer_press_drag_release() {
        let mut pointer = PointerAdapter::new(7.5);
        let down = InputEvent::pointer_down(10.0, 10.0, PointerButton::Primary, Modifiers::NONE);
        let cmds = pointer.handle(&down, hit(1, 0));
        assert!(matches!(cmds[0], Command::BeginDrag { .. }));

        let cmds = pointer.handle(&InputEvent::PointerMove { x: 20.0, y: 10.0 }, BOARD);
        assert_eq!(cmds, vec![Command::DragTo { at: Point::new(20.0, 10.0) }]);

        let cmds = pointer.handle(&InputEvent::PointerUp { x: 25.0, y: 10.0 }, BOARD);
        assert_eq!(cmds, vec![Command::EndDrag { at: Point::new(25.0, 10.0) }]);
        assert!(pointer.handle(&InputEvent::PointerUp { x: 0.0, y: 0.0 }, BOARD).is_empty());
    }

    #[test]
    fn pointer_shift_secondary_rotates() {
        let mut pointer = PointerAdapter::new(7.5);
        let down = InputEvent::pointer_down(0.0, 0.0, PointerButton::Secondary, Modifiers::SHIFT);
        let cmds = pointer.handle(&down, hit(2, 1));
        assert_eq!(
            cmds,
            vec![Command::RotateStep {
                aim: Aim::Entity(Target::Base {
                    token: TokenId(2),
                    index: 1
                }),
                degrees: 7.5
            }]
        );
        // Plain secondary click does nothing.
        let down = InputEvent::pointer_down(0.0, 0.0, PointerButton::Secondary, Modifiers::NONE);
        assert!(pointer.handle(&down, hit(2, 1)).is_empty());
    }

    #[test]
    fn pointer_hover_without_press() {
        let mut pointer = PointerAdapter::new(7.5);
        let cmds = pointer.handle(&InputEvent::PointerMove { x: 1.0, y: 1.0 }, hit(4, 0));
        assert_eq!(
            cmds,
            vec![Command::Hover(Some(Target::Base {
                token: TokenId(4),
                index: 0
            }))]
        );
    }

    #[test]
    fn touch_tap_on_entity_selects_target() {
        let mut t = touch();
        let p = Point::new(50.0, 50.0);
        assert!(t.handle(&InputEvent::touch_start(&[p]), hit(3, 0)).is_empty());
        let cmds = t.handle(&InputEvent::touch_end(&[]), BOARD);
        assert_eq!(
            cmds,
            vec![Command::SelectTarget(Target::Base {
                token: TokenId(3),
                index: 0
            })]
        );
    }

    #[test]
    fn touch_tap_on_board_rotates_and_off_board_clears() {
        let mut t = touch();
        t.handle(&InputEvent::touch_start(&[Point::new(5.0, 5.0)]), BOARD);
        let cmds = t.handle(&InputEvent::touch_end(&[]), BOARD);
        assert_eq!(
            cmds,
            vec![Command::RotateStep {
                aim: Aim::Active,
                degrees: 7.5
            }]
        );

        t.handle(&InputEvent::touch_start(&[Point::new(-5.0, 5.0)]), OFF_BOARD);
        let cmds = t.handle(&InputEvent::touch_end(&[]), OFF_BOARD);
        assert_eq!(cmds, vec![Command::ClearSelection]);
    }

    #[test]
    fn touch_drag_starts_past_slop() {
        let mut t = touch();
        let start = Point::new(100.0, 100.0);
        t.handle(&InputEvent::touch_start(&[start]), hit(0, 0));
        assert!(t.handle(&InputEvent::touch_move(&[Point::new(102.0, 100.0)]), BOARD).is_empty());

        let cmds = t.handle(&InputEvent::touch_move(&[Point::new(120.0, 100.0)]), BOARD);
        assert_eq!(cmds.len(), 2);
        assert!(matches!(cmds[0], Command::BeginDrag { at, .. } if at == start));
        assert_eq!(cmds[1], Command::DragTo { at: Point::new(120.0, 100.0) });

        let cmds = t.handle(&InputEvent::touch_end(&[]), BOARD);
        assert_eq!(cmds, vec![Command::EndDrag { at: Point::new(120.0, 100.0) }]);
    }

    #[test]
    fn two_finger_twist_emits_discrete_steps() {
        let mut t = touch();
        let a = Point::new(0.0, 0.0);
        let at = |deg: f64| {
            let r = deg.to_radians();
            Point::new(100.0 * r.cos(), 100.0 * r.sin())
        };
        t.handle(&InputEvent::touch_start(&[a]), BOARD);
        assert!(t.handle(&InputEvent::touch_start(&[a, at(0.0)]), BOARD).is_empty());
        assert!(t.handle(&InputEvent::touch_move(&[a, at(5.0)]), BOARD).is_empty());

        let cmds = t.handle(&InputEvent::touch_move(&[a, at(16.0)]), BOARD);
        assert_eq!(
            cmds,
            vec![
                Command::RotateStep {
                    aim: Aim::Active,
                    degrees: 7.5
                };
                2
            ]
        );

        let cmds = t.handle(&InputEvent::touch_move(&[a, at(6.0)]), BOARD);
        assert_eq!(
            cmds,
            vec![Command::RotateStep {
                aim: Aim::Active,
                degrees: -7.5
            }]
        );

        // Lifting both fingers is not a tap.
        t.handle(&InputEvent::touch_end(&[a]), BOARD);
        assert!(t.handle(&InputEvent::touch_end(&[]), BOARD).is_empty());
    }

    #[test]
    fn double_tap_on_empty_board_clears() {
        let mut t = touch();
        let cmds = t.handle(&InputEvent::DoubleTap { x: 1.0, y: 1.0 }, BOARD);
        assert_eq!(cmds, vec![Command::ClearSelection]);
        assert!(t.handle(&InputEvent::DoubleTap { x: 1.0, y: 1.0 }, hit(0, 0)).is_empty());
    }
}
