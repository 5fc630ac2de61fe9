//! Device-independent interaction commands.
//!
//! Pointer and touch adapters both translate raw events into this one
//! vocabulary; the interaction state machine only ever sees commands.

use crate::session::{DragMode, Target};
use kurbo::Point;

/// Which entity a rotation step applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aim {
    /// A specific entity (e.g. the one under a Shift+right-click).
    Entity(Target),
    /// The hovered entity, falling back to the active selection.
    Hovered,
    /// The tap-selected rotation target, falling back to the active
    /// selection.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    BeginDrag { target: Target, at: Point },
    DragTo { at: Point },
    EndDrag { at: Point },
    /// Rotate by a signed number of degrees, then re-snap.
    RotateStep { aim: Aim, degrees: f64 },
    /// Select `target` as rotation target, or release it if it already is.
    SelectTarget(Target),
    /// Release the rotation target and the active/hovered selection.
    ClearSelection,
    Hover(Option<Target>),
    SetDragMode(DragMode),
}

impl Command {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::BeginDrag { .. } => "begin-drag",
            Command::DragTo { .. } => "drag-to",
            Command::EndDrag { .. } => "end-drag",
            Command::RotateStep { .. } => "rotate-step",
            Command::SelectTarget(_) => "select-target",
            Command::ClearSelection => "clear-selection",
            Command::Hover(_) => "hover",
            Command::SetDragMode(_) => "set-drag-mode",
        }
    }
}
