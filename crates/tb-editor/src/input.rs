//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` enum
//! consumed by the device adapters in [`crate::tools`]. Coordinates are
//! board-local pixels; the host subtracts the canvas offset.

use kurbo::Point;
use smallvec::SmallVec;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
}

/// Mouse button, following `MouseEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value. Unknown buttons read as primary.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Active touch points, board-local.
pub type Touches = SmallVec<[Point; 2]>;

/// A normalized input event from any pointing device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed.
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },

    /// Mouse moved, pressed or not.
    PointerMove { x: f64, y: f64 },

    /// Mouse button released.
    PointerUp { x: f64, y: f64 },

    /// A finger touched down. `touches` lists every active touch.
    TouchStart { touches: Touches },

    /// Fingers moved.
    TouchMove { touches: Touches },

    /// A finger lifted. `touches` lists the ones still down.
    TouchEnd { touches: Touches },

    /// Host-recognized double tap.
    DoubleTap { x: f64, y: f64 },

    /// Keyboard key (`KeyboardEvent.key`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, button: PointerButton, modifiers: Modifiers) -> Self {
        Self::PointerDown {
            x,
            y,
            button,
            modifiers,
        }
    }

    pub fn touch_start(points: &[Point]) -> Self {
        Self::TouchStart {
            touches: points.iter().copied().collect(),
        }
    }

    pub fn touch_move(points: &[Point]) -> Self {
        Self::TouchMove {
            touches: points.iter().copied().collect(),
        }
    }

    pub fn touch_end(remaining: &[Point]) -> Self {
        Self::TouchEnd {
            touches: remaining.iter().copied().collect(),
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Position of the primary pointer, if this event has one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::DoubleTap { x, y } => Some(Point::new(*x, *y)),
            Self::TouchStart { touches } | Self::TouchMove { touches } => touches.first().copied(),
            Self::TouchEnd { .. } | Self::Key { .. } => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchStart { .. }
                | Self::TouchMove { .. }
                | Self::TouchEnd { .. }
                | Self::DoubleTap { .. }
        )
    }
}
