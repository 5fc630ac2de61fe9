//! Interaction session: drag mode and selection bookkeeping.
//!
//! Everything a gesture needs to remember between events lives here, in
//! one value owned by the editor. Targets are plain handles (token id and
//! base index), so a stale target can only fail to resolve.

use kurbo::Point;
use tb_core::TokenId;

/// Which entities are draggable: whole tokens or individual bases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    Group,
    Model,
}

impl DragMode {
    pub fn toggled(self) -> Self {
        match self {
            DragMode::Group => DragMode::Model,
            DragMode::Model => DragMode::Group,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DragMode::Group => "Move Group",
            DragMode::Model => "Move Models",
        }
    }
}

/// A token, or one base within a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Token(TokenId),
    Base { token: TokenId, index: usize },
}

impl Target {
    pub fn token(self) -> TokenId {
        match self {
            Target::Token(id) | Target::Base { token: id, .. } => id,
        }
    }

    /// Re-aim at the granularity `mode` manipulates. A bare token cannot
    /// be narrowed to a base.
    pub fn for_mode(self, mode: DragMode) -> Option<Target> {
        match (mode, self) {
            (DragMode::Group, t) => Some(Target::Token(t.token())),
            (DragMode::Model, Target::Base { .. }) => Some(self),
            (DragMode::Model, Target::Token(_)) => None,
        }
    }
}

/// Per-entity interaction state. Dragging and being the rotation target
/// are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Idle,
    Dragging,
    RotationTargetActive,
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub target: Target,
    /// Last pointer position applied to the entity.
    pub last: Point,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub mode: DragMode,
    /// Last-interacted entity for the current mode.
    pub active: Option<Target>,
    /// Entity under the mouse, for keyboard rotation.
    pub hovered: Option<Target>,
    /// Entity selected by tap for discrete rotation.
    pub rotation_target: Option<Target>,
    pub drag: Option<DragState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, target: Target) -> EntityState {
        if self.drag.is_some_and(|d| d.target == target) {
            EntityState::Dragging
        } else if self.rotation_target == Some(target) {
            EntityState::RotationTargetActive
        } else {
            EntityState::Idle
        }
    }

    /// Drop every reference to `token` (e.g. after it was deleted).
    pub fn forget(&mut self, token: TokenId) {
        let stale = |t: &Option<Target>| t.is_some_and(|t| t.token() == token);
        if stale(&self.active) {
            self.active = None;
        }
        if stale(&self.hovered) {
            self.hovered = None;
        }
        if stale(&self.rotation_target) {
            self.rotation_target = None;
        }
        if self.drag.is_some_and(|d| d.target.token() == token) {
            self.drag = None;
        }
    }
}
