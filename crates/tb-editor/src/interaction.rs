//! Token interaction state machine.
//!
//! Applies [`Command`]s to a [`Scene`], enforcing the drag-mode rules:
//!
//! | Mode  | Drag moves   | Rotation applies to          | After drag end / rotation |
//! |-------|--------------|------------------------------|---------------------------|
//! | Group | whole token  | token, about its pivot       | every base re-snapped     |
//! | Model | single base  | ellipse/rectangle base only  | that base re-snapped      |
//!
//! Every command leaves the scene consistent before returning: snapping
//! and pivot re-centering happen synchronously.

use crate::commands::{Aim, Command};
use crate::session::{DragMode, DragState, EntityState, Session, Target};
use kurbo::{Point, Vec2};
use tb_core::scene::Scene;
use tb_core::{BoardWarning, TokenId, snap_all, snap_base};

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    pub session: Session,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DragMode {
        self.session.mode
    }

    pub fn state_of(&self, target: Target) -> EntityState {
        self.session.state_of(target)
    }

    /// Apply one command. Returns `true` when anything visible changed.
    pub fn apply(&mut self, scene: &mut Scene, command: Command) -> bool {
        log::trace!("apply {} in {:?} mode", command.name(), self.session.mode);
        match command {
            Command::BeginDrag { target, at } => self.begin_drag(scene, target, at),
            Command::DragTo { at } => self.drag_to(scene, at),
            Command::EndDrag { at } => self.end_drag(scene, at),
            Command::RotateStep { aim, degrees } => self.rotate(scene, aim, degrees),
            Command::SelectTarget(target) => self.select_target(scene, target),
            Command::ClearSelection => self.clear_selection(scene),
            Command::Hover(target) => {
                self.session.hovered = target.and_then(|t| t.for_mode(self.session.mode));
                false
            }
            Command::SetDragMode(mode) => self.set_drag_mode(scene, mode),
        }
    }

    /// Make a freshly spawned token the active selection (group mode only).
    pub fn select_spawned(&mut self, id: TokenId) {
        if self.session.mode == DragMode::Group {
            self.session.active = Some(Target::Token(id));
        }
    }

    /// Forget a deleted token.
    pub fn forget(&mut self, id: TokenId) {
        self.session.forget(id);
    }

    // ─── Drag ────────────────────────────────────────────────────────────

    fn begin_drag(&mut self, scene: &mut Scene, target: Target, at: Point) -> bool {
        if !at.is_finite() {
            return invalid_point(scene, at);
        }
        let Some(target) = target.for_mode(self.session.mode) else {
            return conflict(scene, "a whole token cannot be dragged in model mode");
        };
        if !exists(scene, target) {
            return not_found(scene, target);
        }
        if self.session.rotation_target == Some(target) || !is_draggable(scene, target) {
            return conflict(scene, "entity is not draggable right now");
        }
        if let Some(previous) = self.session.drag {
            self.finish_drag(scene, previous);
        }
        let opacity = match target {
            Target::Token(_) => scene.config().token_drag_opacity,
            Target::Base { .. } => scene.config().base_drag_opacity,
        };
        set_opacity(scene, target, opacity);
        self.session.active = Some(target);
        self.session.drag = Some(DragState { target, last: at });
        log::debug!("drag start {target:?} at {at:?}");
        true
    }

    fn drag_to(&mut self, scene: &mut Scene, at: Point) -> bool {
        let Some(mut drag) = self.session.drag else {
            return false;
        };
        if !at.is_finite() {
            return invalid_point(scene, at);
        }
        let delta = at - drag.last;
        if delta == Vec2::ZERO {
            return false;
        }
        if !move_by(scene, drag.target, delta) {
            self.session.forget(drag.target.token());
            return false;
        }
        drag.last = at;
        self.session.drag = Some(drag);
        true
    }

    fn end_drag(&mut self, scene: &mut Scene, at: Point) -> bool {
        let Some(drag) = self.session.drag else {
            return false;
        };
        self.drag_to(scene, at);
        // drag_to drops a target that vanished mid-drag.
        if self.session.drag.is_none() {
            return false;
        }
        self.finish_drag(scene, drag);
        true
    }

    fn finish_drag(&mut self, scene: &mut Scene, drag: DragState) {
        self.session.drag = None;
        rest_opacity(scene, drag.target);
        if let Target::Base { token, index } = drag.target {
            settle_base(scene, token, index);
        }
        log::debug!("drag end {:?}", drag.target);
    }

    // ─── Rotation ────────────────────────────────────────────────────────

    fn resolve_aim(&self, aim: Aim) -> Option<Target> {
        let s = &self.session;
        match aim {
            Aim::Entity(t) => t.for_mode(s.mode),
            Aim::Hovered => s.hovered.or(s.active),
            Aim::Active => s.rotation_target.or(s.active),
        }
    }

    fn rotate(&mut self, scene: &mut Scene, aim: Aim, degrees: f64) -> bool {
        if !degrees.is_finite() {
            return conflict(scene, "rotation step must be finite");
        }
        let Some(target) = self.resolve_aim(aim) else {
            log::debug!("rotate: nothing selected");
            return false;
        };
        if !exists(scene, target) {
            self.session.forget(target.token());
            return not_found(scene, target);
        }
        if self.session.drag.is_some_and(|d| d.target == target) {
            return conflict(scene, "entity is being dragged");
        }
        match target {
            Target::Token(id) => {
                let Some(token) = scene.token_mut(id) else {
                    return false;
                };
                token.rotation += degrees;
                snap_all(token);
                token.recenter();
                log::debug!("rotated {id} by {degrees} to {}", token.rotation);
            }
            Target::Base { token, index } => {
                let rotated = scene
                    .token_mut(token)
                    .and_then(|t| t.bases.get_mut(index))
                    .is_some_and(|b| b.rotate_by(degrees));
                if !rotated {
                    return conflict(scene, "circular bases do not rotate");
                }
                settle_base(scene, token, index);
                log::debug!("rotated {token} base {index} by {degrees}");
            }
        }
        true
    }

    // ─── Selection ───────────────────────────────────────────────────────

    fn select_target(&mut self, scene: &mut Scene, target: Target) -> bool {
        let Some(target) = target.for_mode(self.session.mode) else {
            return conflict(scene, "a whole token cannot be selected in model mode");
        };
        if !exists(scene, target) {
            return not_found(scene, target);
        }
        if let Target::Base { token, index } = target {
            let rotatable = scene
                .token(token)
                .and_then(|t| t.bases.get(index))
                .is_some_and(|b| b.shape.is_rotatable());
            if !rotatable {
                return conflict(scene, "circular bases are not rotation targets");
            }
        }
        if self.session.drag.is_some_and(|d| d.target == target) {
            return conflict(scene, "entity is being dragged");
        }
        if self.session.rotation_target == Some(target) {
            self.release_rotation_target(scene);
            log::debug!("rotation target released {target:?}");
            return true;
        }
        self.release_rotation_target(scene);
        let opacity = scene.config().rotation_target_opacity;
        set_opacity(scene, target, opacity);
        set_draggable(scene, target, false);
        self.session.rotation_target = Some(target);
        self.session.active = Some(target);
        log::debug!("rotation target selected {target:?}");
        true
    }

    fn release_rotation_target(&mut self, scene: &mut Scene) -> bool {
        let Some(target) = self.session.rotation_target.take() else {
            return false;
        };
        rest_opacity(scene, target);
        set_draggable(scene, target, true);
        true
    }

    fn clear_selection(&mut self, scene: &mut Scene) -> bool {
        let released = self.release_rotation_target(scene);
        self.session.active = None;
        self.session.hovered = None;
        released
    }

    fn set_drag_mode(&mut self, scene: &mut Scene, mode: DragMode) -> bool {
        if let Some(drag) = self.session.drag {
            self.finish_drag(scene, drag);
        }
        self.release_rotation_target(scene);
        self.session.active = None;
        self.session.hovered = None;
        self.session.mode = mode;
        scene.set_draggability(mode == DragMode::Group);
        log::debug!("drag mode {mode:?}");
        true
    }
}

// ─── Scene helpers ───────────────────────────────────────────────────────

fn conflict(scene: &mut Scene, what: &'static str) -> bool {
    scene.report(BoardWarning::StateConflict(what));
    false
}

fn invalid_point(scene: &mut Scene, at: Point) -> bool {
    scene.report(BoardWarning::InvalidGeometry { x: at.x, y: at.y });
    false
}

fn not_found(scene: &mut Scene, target: Target) -> bool {
    scene.report(BoardWarning::TokenNotFound(target.token()));
    false
}

fn exists(scene: &Scene, target: Target) -> bool {
    match target {
        Target::Token(id) => scene.token(id).is_some(),
        Target::Base { token, index } => scene.token(token).is_some_and(|t| index < t.bases.len()),
    }
}

fn is_draggable(scene: &Scene, target: Target) -> bool {
    match target {
        Target::Token(id) => scene.token(id).is_some_and(|t| t.draggable),
        Target::Base { token, index } => scene
            .token(token)
            .and_then(|t| t.bases.get(index))
            .is_some_and(|b| b.draggable),
    }
}

/// Restore mode-appropriate draggability, or lock the entity.
fn set_draggable(scene: &mut Scene, target: Target, unlocked: bool) {
    let group = scene.group_draggable();
    let Some(token) = scene.token_mut(target.token()) else {
        return;
    };
    match target {
        Target::Token(_) => token.draggable = unlocked && group,
        Target::Base { index, .. } => {
            if let Some(base) = token.bases.get_mut(index) {
                base.draggable = unlocked && !group;
            }
        }
    }
}

fn set_opacity(scene: &mut Scene, target: Target, opacity: f64) {
    let Some(token) = scene.token_mut(target.token()) else {
        return;
    };
    match target {
        Target::Token(_) => token.opacity = opacity,
        Target::Base { index, .. } => {
            if let Some(base) = token.bases.get_mut(index) {
                base.opacity = opacity;
            }
        }
    }
}

fn rest_opacity(scene: &mut Scene, target: Target) {
    let opacity = match target {
        Target::Token(_) => scene.config().token_opacity,
        Target::Base { .. } => scene.config().base_opacity,
    };
    set_opacity(scene, target, opacity);
}

/// Move an entity by a board-space delta. Returns false if it is gone.
fn move_by(scene: &mut Scene, target: Target, delta: Vec2) -> bool {
    let Some(token) = scene.token_mut(target.token()) else {
        return false;
    };
    match target {
        Target::Token(_) => token.position += delta,
        Target::Base { index, .. } => {
            let local = token.to_local_delta(delta);
            let Some(base) = token.bases.get_mut(index) else {
                return false;
            };
            base.position += local;
        }
    }
    true
}

/// Snap one base against its siblings and re-center the token's pivot.
fn settle_base(scene: &mut Scene, token: TokenId, index: usize) {
    if let Some(t) = scene.token_mut(token) {
        snap_base(t, index);
        t.recenter();
    }
}
