//! Keyboard shortcut mapping.
//!
//! Maps keys to semantic `BoardAction`s. Rotation keys act on the hovered
//! entity, falling back to the active selection.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    // ── Rotation ──
    /// One step clockwise (`1`).
    RotateCw,
    /// One step counter-clockwise (`2`).
    RotateCcw,

    // ── Selection ──
    ToggleDragMode,
    ClearSelection,
    DeleteActive,

    // ── Overlays ──
    CycleZone,
    CycleObjectives,
}

/// Resolves key events into board actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"1"`, `"Escape"`).
    /// Browser combos (⌘/Ctrl) are left to the host.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<BoardAction> {
        if ctrl || meta || alt {
            return None;
        }

        // Shifted digits arrive as symbols on most layouts.
        if shift {
            return match key {
                "!" => Some(BoardAction::RotateCw),
                "@" => Some(BoardAction::RotateCcw),
                "M" => Some(BoardAction::ToggleDragMode),
                _ => None,
            };
        }

        match key {
            "1" => Some(BoardAction::RotateCw),
            "2" => Some(BoardAction::RotateCcw),
            "m" | "M" => Some(BoardAction::ToggleDragMode),
            "Escape" => Some(BoardAction::ClearSelection),
            "Delete" | "Backspace" => Some(BoardAction::DeleteActive),
            "z" | "Z" => Some(BoardAction::CycleZone),
            "o" | "O" => Some(BoardAction::CycleObjectives),
            _ => None,
        }
    }
}
