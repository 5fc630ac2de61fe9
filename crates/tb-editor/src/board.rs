//! `BoardEditor`: the single owner of board state.
//!
//! Wraps a [`Scene`], the interaction session and both device adapters.
//! Hosts (the WASM bridge, native tests) call the operations here and then
//! repaint from [`BoardEditor::scene`].

use crate::commands::{Aim, Command};
use crate::input::InputEvent;
use crate::interaction::Interaction;
use crate::session::{DragMode, EntityState, Target};
use crate::shortcuts::{BoardAction, ShortcutMap};
use crate::tools::{InputAdapter, PointerAdapter, PointInfo, TouchAdapter};
use kurbo::Point;
use tb_core::scene::{RosterItem, Scene};
use tb_core::{BoardConfig, BoardWarning, TerrainImage, TokenId, TokenSnapshot, UnitCatalog};

pub struct BoardEditor {
    scene: Scene,
    interaction: Interaction,
    pointer: PointerAdapter,
    touch: TouchAdapter,
}

impl BoardEditor {
    /// Create a board sized to fit `container_w` x `container_h`.
    pub fn new(container_w: f64, container_h: f64, catalog: UnitCatalog) -> Self {
        Self::with_config(container_w, container_h, catalog, BoardConfig::default())
    }

    pub fn with_config(
        container_w: f64,
        container_h: f64,
        catalog: UnitCatalog,
        config: BoardConfig,
    ) -> Self {
        let pointer = PointerAdapter::new(config.rotation_step_deg);
        let touch = TouchAdapter::new(
            config.rotation_step_deg,
            config.twist_threshold_deg,
            config.tap_slop_px,
        );
        let scene = Scene::new(container_w, container_h, catalog, config);
        log::debug!(
            "board {}x{} px in {container_w}x{container_h}",
            scene.scale().width,
            scene.scale().height
        );
        Self {
            scene,
            interaction: Interaction::new(),
            pointer,
            touch,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn mode(&self) -> DragMode {
        self.interaction.mode()
    }

    pub fn state_of(&self, target: Target) -> EntityState {
        self.interaction.state_of(target)
    }

    /// The active selection, if any.
    pub fn active(&self) -> Option<Target> {
        self.interaction.session.active
    }

    pub fn rotation_target(&self) -> Option<Target> {
        self.interaction.session.rotation_target
    }

    /// Drain the warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<BoardWarning> {
        self.scene.take_warnings()
    }

    // ─── Tokens ──────────────────────────────────────────────────────────

    /// Spawn a token of `unit` (id or display name). It becomes the active
    /// selection when in group mode.
    pub fn spawn_token(
        &mut self,
        unit: &str,
        point: Option<Point>,
    ) -> Result<TokenId, BoardWarning> {
        let id = self.scene.spawn(unit, point)?;
        self.interaction.select_spawned(id);
        Ok(id)
    }

    /// Remove a token. Deleting twice is harmless.
    pub fn delete_token(&mut self, id: TokenId) -> bool {
        self.interaction.forget(id);
        self.scene.delete(id).is_some()
    }

    pub fn set_drag_mode(&mut self, mode: DragMode) -> bool {
        self.apply(Command::SetDragMode(mode))
    }

    pub fn toggle_drag_mode(&mut self) -> DragMode {
        let mode = self.mode().toggled();
        self.set_drag_mode(mode);
        mode
    }

    /// Rotate the rotation target, or else the active selection.
    pub fn rotate_active_selection(&mut self, step_degrees: f64) -> bool {
        self.apply(Command::RotateStep {
            aim: Aim::Active,
            degrees: step_degrees,
        })
    }

    pub fn recolor_token(&mut self, id: TokenId, color_index: usize) -> Result<(), BoardWarning> {
        self.scene.recolor(id, color_index)
    }

    pub fn cycle_token_color(&mut self, id: TokenId) -> Result<usize, BoardWarning> {
        self.scene.cycle_color(id)
    }

    pub fn list_token_instances(&self) -> Vec<TokenSnapshot> {
        self.scene.list()
    }

    /// Replace all tokens with `snapshots`. Selections are dropped.
    pub fn restore_token_instances(&mut self, snapshots: &[TokenSnapshot]) {
        self.reset_interaction();
        self.scene.restore(snapshots);
    }

    // ─── Roster and terrain ──────────────────────────────────────────────

    pub fn roster(&self) -> Vec<RosterItem> {
        self.scene.roster()
    }

    /// Advance a roster entry's color. Later spawns of `unit` (id or
    /// display name) use it; placed tokens keep theirs.
    pub fn cycle_roster_color(&mut self, unit: &str) -> Result<usize, BoardWarning> {
        match self.scene.resolve_unit(unit).map(|def| def.id) {
            Some(id) => self.scene.cycle_roster_color(id),
            None => {
                let warning = BoardWarning::UnitNotFound(unit.to_string());
                self.scene.report(warning.clone());
                Err(warning)
            }
        }
    }

    /// Swap the unit catalog, dropping every placed token.
    pub fn replace_catalog(&mut self, catalog: UnitCatalog) {
        self.reset_interaction();
        self.scene.replace_catalog(catalog);
    }

    pub fn set_terrain(&mut self, terrain: Option<TerrainImage>) {
        self.scene.set_terrain(terrain);
    }

    // ─── Overlays ────────────────────────────────────────────────────────

    pub fn cycle_deployment_zone(&mut self) -> usize {
        self.scene.cycle_deployment_zone()
    }

    pub fn set_deployment_zone_index(&mut self, index: usize) -> usize {
        self.scene.set_deployment_zone_index(index)
    }

    pub fn cycle_objective_layout(&mut self) -> usize {
        self.scene.cycle_objective_layout()
    }

    pub fn set_objective_layout_index(&mut self, index: usize) -> usize {
        self.scene.set_objective_layout_index(index)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route an input event through its device adapter. Returns `true`
    /// when the board needs a repaint.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if let InputEvent::Key { key, modifiers } = &event {
            return match ShortcutMap::resolve(
                key,
                modifiers.ctrl,
                modifiers.shift,
                modifiers.alt,
                modifiers.meta,
            ) {
                Some(action) => self.run_action(action),
                None => false,
            };
        }

        let under = self.point_info(event.position());
        let commands = if event.is_touch() {
            self.touch.handle(&event, under)
        } else {
            self.pointer.handle(&event, under)
        };

        let mut changed = false;
        for command in commands {
            let raise = match command {
                Command::BeginDrag { target, .. } => Some(target.token()),
                _ => None,
            };
            let applied = self.apply(command);
            if applied && let Some(id) = raise {
                self.scene.bring_to_front(id);
            }
            changed |= applied;
        }
        changed
    }

    fn point_info(&self, at: Option<Point>) -> PointInfo {
        match at {
            Some(p) => PointInfo {
                hit: tb_render::hit_test(&self.scene, p),
                on_board: self.scene.scale().contains(p),
            },
            None => PointInfo::default(),
        }
    }

    fn run_action(&mut self, action: BoardAction) -> bool {
        let step = self.scene.config().rotation_step_deg;
        log::debug!("shortcut {action:?}");
        match action {
            BoardAction::RotateCw => self.apply(Command::RotateStep {
                aim: Aim::Hovered,
                degrees: step,
            }),
            BoardAction::RotateCcw => self.apply(Command::RotateStep {
                aim: Aim::Hovered,
                degrees: -step,
            }),
            BoardAction::ToggleDragMode => {
                self.toggle_drag_mode();
                true
            }
            BoardAction::ClearSelection => self.apply(Command::ClearSelection),
            BoardAction::DeleteActive => match self.active() {
                Some(target) => self.delete_token(target.token()),
                None => false,
            },
            BoardAction::CycleZone => {
                self.cycle_deployment_zone();
                true
            }
            BoardAction::CycleObjectives => {
                self.cycle_objective_layout();
                true
            }
        }
    }

    fn apply(&mut self, command: Command) -> bool {
        self.interaction.apply(&mut self.scene, command)
    }

    fn reset_interaction(&mut self) {
        let mode = self.interaction.mode();
        self.interaction = Interaction::new();
        self.interaction.session.mode = mode;
        self.pointer.reset();
        self.touch.reset();
    }
}
