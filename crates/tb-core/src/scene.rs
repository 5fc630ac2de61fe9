//! The board scene: scale, layers, and the registry of placed tokens.
//!
//! `Scene` owns everything that is drawn. It knows nothing about pointers
//! or drag modes beyond which entities are currently draggable; the editor
//! crate drives it through the operations below.

use crate::board::{BoardScale, TerrainImage};
use crate::config::BoardConfig;
use crate::id::{TokenId, UnitId};
use crate::layout::layout_token;
use crate::model::{
    Color, PALETTE, TokenInstance, UnitCatalog, UnitDefinition, palette_color, palette_name,
};
use crate::overlay::{
    DeploymentZone, DrawnCircle, DrawnLine, ObjectiveLayout, OverlayCycle, default_objectives,
    default_zones,
};
use crate::snapshot::{BaseSnapshot, TokenSnapshot};
use crate::warning::BoardWarning;
use kurbo::Point;
use std::collections::HashMap;

/// One roster row: a catalog unit and its live instances on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterItem {
    pub unit: UnitId,
    pub label: String,
    /// Color the next spawn of this unit will use.
    pub color_index: usize,
    pub instances: Vec<TokenId>,
}

impl RosterItem {
    pub fn deployed(&self) -> bool {
        !self.instances.is_empty()
    }

    pub fn color(&self) -> Color {
        palette_color(self.color_index)
    }
}

const OFFSET_EPSILON: f64 = 1e-6;

/// Undrained warnings kept before the oldest are dropped.
pub const MAX_WARNINGS: usize = 256;

#[derive(Debug, Clone)]
pub struct Scene {
    config: BoardConfig,
    scale: BoardScale,
    catalog: UnitCatalog,
    terrain: Option<TerrainImage>,
    zones: OverlayCycle<DeploymentZone>,
    objectives: OverlayCycle<ObjectiveLayout>,
    zone_lines: Vec<DrawnLine>,
    objective_marks: Vec<DrawnCircle>,
    /// Live tokens in unit-layer paint order (last is topmost).
    tokens: Vec<TokenInstance>,
    roster_colors: HashMap<UnitId, usize>,
    /// Tokens draggable as a whole (group mode) vs. per base.
    group_draggable: bool,
    next_id: u32,
    warnings: Vec<BoardWarning>,
}

impl Scene {
    /// Build a board for a container of the given size.
    pub fn new(container_w: f64, container_h: f64, catalog: UnitCatalog, config: BoardConfig) -> Self {
        let scale = BoardScale::from_container(container_w, container_h, &config);
        let mut scene = Self {
            config,
            scale,
            catalog: UnitCatalog::default(),
            terrain: None,
            zones: OverlayCycle::new(default_zones()),
            objectives: OverlayCycle::new(default_objectives()),
            zone_lines: Vec::new(),
            objective_marks: Vec::new(),
            tokens: Vec::new(),
            roster_colors: HashMap::new(),
            group_draggable: true,
            next_id: 0,
            warnings: Vec::new(),
        };
        scene.replace_catalog(catalog);
        scene.redraw_zones();
        scene.redraw_objectives();
        scene
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn scale(&self) -> &BoardScale {
        &self.scale
    }

    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    // ─── Warnings ────────────────────────────────────────────────────────

    pub(crate) fn warn(&mut self, warning: BoardWarning) -> BoardWarning {
        match warning {
            BoardWarning::InvalidGeometry { .. } | BoardWarning::StateConflict(_) => {
                log::debug!("{warning}")
            }
            _ => log::warn!("{warning}"),
        }
        if self.warnings.len() >= MAX_WARNINGS {
            self.warnings.remove(0);
        }
        self.warnings.push(warning.clone());
        warning
    }

    /// Record a warning raised by a caller that drives the scene.
    pub fn report(&mut self, warning: BoardWarning) {
        self.warn(warning);
    }

    /// Drain the warnings collected since the last call. Draining is up to
    /// the host; past `MAX_WARNINGS` the oldest entries are dropped.
    pub fn take_warnings(&mut self) -> Vec<BoardWarning> {
        std::mem::take(&mut self.warnings)
    }

    // ─── Units layer ─────────────────────────────────────────────────────

    /// Resolve a unit by id, falling back to its display name.
    pub fn resolve_unit(&self, key: &str) -> Option<&UnitDefinition> {
        UnitId::lookup(key)
            .and_then(|id| self.catalog.get(id))
            .or_else(|| self.catalog.find_by_name(key))
    }

    /// Place a new token of `unit` at `point`, clamped into the padded
    /// board. A missing point spawns at the center; a non-finite one does
    /// too, and records an `InvalidGeometry` warning.
    pub fn spawn(&mut self, unit: &str, point: Option<Point>) -> Result<TokenId, BoardWarning> {
        let Some(def) = self.resolve_unit(unit).cloned() else {
            return Err(self.warn(BoardWarning::UnitNotFound(unit.to_string())));
        };
        let target = match point {
            Some(p) if p.is_finite() => p,
            Some(p) => {
                self.warn(BoardWarning::InvalidGeometry { x: p.x, y: p.y });
                self.scale.center()
            }
            None => self.scale.center(),
        };
        let position = self.scale.clamp_inset(target, self.config.spawn_padding_px);
        let color = self.roster_color(def.id);
        let id = self.place(&def, position, color);
        log::debug!("spawned {id} ({}) at {position:?}", def.id);
        Ok(id)
    }

    /// Lay out and register a token without clamping.
    fn place(&mut self, def: &UnitDefinition, position: Point, color_index: usize) -> TokenId {
        let id = TokenId(self.next_id);
        self.next_id += 1;
        let mut token = layout_token(def, &self.scale, &self.config, id, position, color_index);
        apply_draggability(&mut token, self.group_draggable);
        self.tokens.push(token);
        id
    }

    /// Remove a token from the board. Deleting a token that is already gone
    /// is a silent no-op; an id the scene never issued is reported.
    pub fn delete(&mut self, id: TokenId) -> Option<TokenInstance> {
        match self.tokens.iter().position(|t| t.id == id) {
            Some(index) => {
                let mut token = self.tokens.remove(index);
                token.deleted = true;
                log::debug!("deleted {id}");
                Some(token)
            }
            None => {
                if id.0 >= self.next_id {
                    self.warn(BoardWarning::TokenNotFound(id));
                }
                None
            }
        }
    }

    pub fn token(&self, id: TokenId) -> Option<&TokenInstance> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut TokenInstance> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    /// Look up a live token, recording `TokenNotFound` when it is missing.
    pub fn expect_token_mut(&mut self, id: TokenId) -> Result<&mut TokenInstance, BoardWarning> {
        if self.token(id).is_none() {
            return Err(self.warn(BoardWarning::TokenNotFound(id)));
        }
        self.token_mut(id).ok_or(BoardWarning::TokenNotFound(id))
    }

    /// Live tokens, bottom to top.
    pub fn tokens(&self) -> &[TokenInstance] {
        &self.tokens
    }

    /// Move a token to the top of the units layer.
    pub fn bring_to_front(&mut self, id: TokenId) {
        if let Some(index) = self.tokens.iter().position(|t| t.id == id) {
            let token = self.tokens.remove(index);
            self.tokens.push(token);
        }
    }

    /// Set a token's palette color (wrapping) and remember it for the
    /// unit's next spawn.
    pub fn recolor(&mut self, id: TokenId, color_index: usize) -> Result<(), BoardWarning> {
        let index = color_index % PALETTE.len();
        let token = self.expect_token_mut(id)?;
        token.set_color_index(index);
        let unit = token.unit;
        self.roster_colors.insert(unit, index);
        log::debug!("{id} recolored {}", palette_name(index));
        Ok(())
    }

    /// Advance a token's color to the next palette entry.
    pub fn cycle_color(&mut self, id: TokenId) -> Result<usize, BoardWarning> {
        let current = self.expect_token_mut(id)?.color_index;
        let next = (current + 1) % PALETTE.len();
        self.recolor(id, next)?;
        Ok(next)
    }

    /// Make tokens draggable as a whole, or their bases individually.
    pub fn set_draggability(&mut self, group_draggable: bool) {
        self.group_draggable = group_draggable;
        for token in &mut self.tokens {
            apply_draggability(token, group_draggable);
        }
    }

    pub fn group_draggable(&self) -> bool {
        self.group_draggable
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Snapshot every live token in paint order.
    pub fn list(&self) -> Vec<TokenSnapshot> {
        self.tokens.iter().map(|t| self.snapshot_of(t)).collect()
    }

    fn snapshot_of(&self, token: &TokenInstance) -> TokenSnapshot {
        let def = self.catalog.get(token.unit);
        let fresh = def.map(|d| {
            layout_token(d, &self.scale, &self.config, token.id, token.position, token.color_index)
        });
        let bases = token
            .bases
            .iter()
            .enumerate()
            .map(|(index, base)| {
                let moved = fresh
                    .as_ref()
                    .and_then(|f| f.bases.get(index))
                    .is_none_or(|f| (f.position - base.position).hypot() > OFFSET_EPSILON);
                BaseSnapshot {
                    index,
                    rotation: base.rotation,
                    offset: moved.then_some((base.position.x, base.position.y)),
                }
            })
            .collect();
        TokenSnapshot {
            unit_id: token.unit,
            unit_name: def.map_or_else(|| "Unknown".to_string(), |d| d.name.clone()),
            x: token.position.x,
            y: token.position.y,
            rotation: token.rotation,
            color_index: token.color_index,
            bases,
        }
    }

    /// Replace every token with the given snapshots. Units missing from the
    /// catalog (by id, then by name) are skipped with a warning.
    pub fn restore(&mut self, snapshots: &[TokenSnapshot]) {
        self.tokens.clear();
        for snap in snapshots {
            let def = self
                .catalog
                .get(snap.unit_id)
                .or_else(|| self.catalog.find_by_name(&snap.unit_name))
                .cloned();
            let Some(def) = def else {
                self.warn(BoardWarning::unit_not_found(snap.unit_id));
                continue;
            };
            let position = Point::new(snap.x, snap.y);
            if !position.is_finite() {
                self.warn(BoardWarning::InvalidGeometry {
                    x: snap.x,
                    y: snap.y,
                });
                continue;
            }
            let color = snap.color_index % PALETTE.len();
            let id = self.place(&def, position, color);
            let mut repaired = false;
            if let Some(token) = self.token_mut(id) {
                token.rotation = finite_or_zero(snap.rotation, &mut repaired);
                for saved in &snap.bases {
                    let Some(base) = token.bases.get_mut(saved.index) else {
                        continue;
                    };
                    if base.shape.is_rotatable() {
                        base.rotation = finite_or_zero(saved.rotation, &mut repaired);
                    }
                    match saved.offset {
                        Some((x, y)) if x.is_finite() && y.is_finite() => {
                            base.position = Point::new(x, y);
                        }
                        Some(_) => repaired = true,
                        None => {}
                    }
                }
            }
            // Non-finite rotations and offsets fall back to the fresh layout.
            if repaired {
                self.warn(BoardWarning::InvalidGeometry {
                    x: snap.x,
                    y: snap.y,
                });
            }
        }
        log::debug!("restored {} of {} tokens", self.tokens.len(), snapshots.len());
    }

    // ─── Roster ──────────────────────────────────────────────────────────

    /// Swap the unit catalog. Every placed token is dropped.
    pub fn replace_catalog(&mut self, catalog: UnitCatalog) {
        self.tokens.clear();
        self.roster_colors = catalog.iter().map(|u| (u.id, u.palette_index())).collect();
        self.catalog = catalog;
        log::debug!("catalog replaced with {} units", self.catalog.len());
    }

    pub fn roster_color(&self, unit: UnitId) -> usize {
        self.roster_colors.get(&unit).copied().unwrap_or(0)
    }

    /// Advance the color used for the next spawn of `unit`.
    pub fn cycle_roster_color(&mut self, unit: UnitId) -> Result<usize, BoardWarning> {
        if self.catalog.get(unit).is_none() {
            return Err(self.warn(BoardWarning::unit_not_found(unit)));
        }
        let next = (self.roster_color(unit) + 1) % PALETTE.len();
        self.roster_colors.insert(unit, next);
        log::debug!("roster {unit} now {}", palette_name(next));
        Ok(next)
    }

    /// Roster rows in catalog order.
    pub fn roster(&self) -> Vec<RosterItem> {
        self.catalog
            .iter()
            .map(|u| RosterItem {
                unit: u.id,
                label: u.roster_label(),
                color_index: self.roster_color(u.id),
                instances: self
                    .tokens
                    .iter()
                    .filter(|t| t.unit == u.id)
                    .map(|t| t.id)
                    .collect(),
            })
            .collect()
    }

    // ─── Terrain & overlays ──────────────────────────────────────────────

    pub fn set_terrain(&mut self, terrain: Option<TerrainImage>) {
        log::debug!("terrain set to {terrain:?}");
        self.terrain = terrain;
    }

    pub fn terrain(&self) -> Option<&TerrainImage> {
        self.terrain.as_ref()
    }

    fn redraw_zones(&mut self) {
        self.zone_lines = self
            .zones
            .current()
            .map(|z| z.draw(&self.scale))
            .unwrap_or_default();
        log::debug!("deployment zone: {}", self.zone_name());
    }

    fn redraw_objectives(&mut self) {
        self.objective_marks = self
            .objectives
            .current()
            .map(|o| o.draw(&self.scale))
            .unwrap_or_default();
        log::debug!("objective layout: {}", self.objective_name());
    }

    pub fn cycle_deployment_zone(&mut self) -> usize {
        let index = self.zones.cycle();
        self.redraw_zones();
        index
    }

    pub fn set_deployment_zone_index(&mut self, index: usize) -> usize {
        let index = self.zones.set_index(index);
        self.redraw_zones();
        index
    }

    pub fn cycle_objective_layout(&mut self) -> usize {
        let index = self.objectives.cycle();
        self.redraw_objectives();
        index
    }

    pub fn set_objective_layout_index(&mut self, index: usize) -> usize {
        let index = self.objectives.set_index(index);
        self.redraw_objectives();
        index
    }

    pub fn deployment_zone_index(&self) -> usize {
        self.zones.index()
    }

    pub fn objective_layout_index(&self) -> usize {
        self.objectives.index()
    }

    pub fn zone_name(&self) -> &str {
        self.zones.current().map_or("", |z| z.name.as_str())
    }

    pub fn objective_name(&self) -> &str {
        self.objectives.current().map_or("", |o| o.name.as_str())
    }

    /// Current zones layer contents.
    pub fn zone_lines(&self) -> &[DrawnLine] {
        &self.zone_lines
    }

    /// Current objectives layer contents.
    pub fn objective_marks(&self) -> &[DrawnCircle] {
        &self.objective_marks
    }
}

fn finite_or_zero(value: f64, repaired: &mut bool) -> f64 {
    if value.is_finite() {
        value
    } else {
        *repaired = true;
        0.0
    }
}

fn apply_draggability(token: &mut TokenInstance, group_draggable: bool) {
    token.draggable = group_draggable;
    for base in &mut token.bases {
        base.draggable = !group_draggable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BaseShape;

    fn scene() -> Scene {
        Scene::new(880.0, 1200.0, UnitCatalog::demo(), BoardConfig::default())
    }

    #[test]
    fn spawn_clamps_and_defaults_to_center() {
        let mut s = scene();
        let a = s.spawn("captain", None).unwrap();
        assert_eq!(s.token(a).unwrap().position, Point::new(440.0, 600.0));

        let b = s.spawn("captain", Some(Point::new(-100.0, 5000.0))).unwrap();
        assert_eq!(s.token(b).unwrap().position, Point::new(10.0, 1190.0));

        let c = s.spawn("captain", Some(Point::new(f64::NAN, 3.0))).unwrap();
        assert_eq!(s.token(c).unwrap().position, Point::new(440.0, 600.0));
        assert_eq!(s.take_warnings()[0].code(), "invalid-geometry");
    }

    #[test]
    fn spawn_resolves_by_name_and_rejects_unknown() {
        let mut s = scene();
        assert!(s.spawn("Marines", None).is_ok());
        let err = s.spawn("nope", None).unwrap_err();
        assert_eq!(err, BoardWarning::UnitNotFound("nope".into()));
        assert_eq!(s.take_warnings(), vec![err]);
        assert_eq!(s.tokens().len(), 1);
    }

    #[test]
    fn spawn_uses_roster_color() {
        let mut s = scene();
        let id = s.spawn("marines", None).unwrap();
        let token = s.token(id).unwrap();
        assert_eq!(token.color_index, 7);
        assert!(token.bases.iter().all(|b| b.fill == palette_color(7)));
    }

    #[test]
    fn delete_twice_is_safe() {
        let mut s = scene();
        let id = s.spawn("tank", None).unwrap();
        assert!(s.delete(id).unwrap().deleted);
        assert!(s.delete(id).is_none());
        assert!(s.take_warnings().is_empty());
        assert!(s.list().is_empty());

        assert!(s.delete(TokenId(99)).is_none());
        assert_eq!(s.take_warnings().len(), 1);
    }

    #[test]
    fn recolor_and_cycle_wrap_palette() {
        let mut s = scene();
        let id = s.spawn("captain", None).unwrap();
        s.recolor(id, 13).unwrap();
        assert_eq!(s.token(id).unwrap().color_index, 3);
        assert_eq!(s.cycle_color(id).unwrap(), 4);
        s.recolor(id, 9).unwrap();
        assert_eq!(s.cycle_color(id).unwrap(), 0);
        assert_eq!(s.roster_color(UnitId::intern("captain")), 0);
    }

    #[test]
    fn roster_tracks_instances() {
        let mut s = scene();
        let a = s.spawn("marines", None).unwrap();
        let b = s.spawn("marines", None).unwrap();
        let roster = s.roster();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster[1].instances, vec![a, b]);
        assert!(!roster[0].deployed());
        assert_eq!(roster[1].label, "10x Marines\n(32mm)");
        s.delete(a);
        assert_eq!(s.roster()[1].instances, vec![b]);

        s.replace_catalog(UnitCatalog::demo());
        assert!(s.tokens().is_empty());
    }

    #[test]
    fn draggability_follows_mode() {
        let mut s = scene();
        let id = s.spawn("bikers", None).unwrap();
        s.set_draggability(false);
        let token = s.token(id).unwrap();
        assert!(!token.draggable);
        assert!(token.bases.iter().all(|b| b.draggable));

        let later = s.spawn("bikers", None).unwrap();
        assert!(!s.token(later).unwrap().draggable);
    }

    #[test]
    fn list_records_moved_bases_only() {
        let mut s = scene();
        let id = s.spawn("bikers", None).unwrap();
        {
            let token = s.token_mut(id).unwrap();
            token.bases[0].position.x -= 15.0;
            token.bases[1].rotation = 7.5;
        }
        let snap = &s.list()[0];
        assert_eq!(snap.unit_name, "Bikers");
        assert!(snap.bases[0].offset.is_some());
        assert!(snap.bases[1].offset.is_none());
        assert_eq!(snap.bases[1].rotation, 7.5);
    }

    #[test]
    fn restore_skips_unknown_units_and_falls_back_to_name() {
        let mut s = scene();
        s.spawn("tank", None).unwrap();
        let mut snaps = s.list();
        snaps[0].unit_id = UnitId::intern("renamed-tank");
        snaps.push(TokenSnapshot {
            unit_id: UnitId::intern("ghost"),
            unit_name: "Ghost".into(),
            x: 1.0,
            y: 1.0,
            rotation: 0.0,
            color_index: 0,
            bases: Default::default(),
        });
        s.restore(&snaps);
        assert_eq!(s.tokens().len(), 1);
        assert_eq!(s.tokens()[0].unit, UnitId::intern("tank"));
        assert_eq!(s.take_warnings().len(), 1);
    }

    #[test]
    fn restore_does_not_rotate_circles() {
        let mut s = scene();
        s.restore(&[TokenSnapshot {
            unit_id: UnitId::intern("captain"),
            unit_name: String::new(),
            x: 100.0,
            y: 100.0,
            rotation: 30.0,
            color_index: 2,
            bases: smallvec::smallvec![BaseSnapshot {
                index: 0,
                rotation: 45.0,
                offset: None,
            }],
        }]);
        let token = &s.tokens()[0];
        assert_eq!(token.rotation, 30.0);
        assert!(matches!(token.bases[0].shape, BaseShape::Circle { .. }));
        assert_eq!(token.bases[0].rotation, 0.0);
    }

    #[test]
    fn restore_zeroes_non_finite_rotations() {
        let mut s = scene();
        s.restore(&[TokenSnapshot {
            unit_id: UnitId::intern("bikers"),
            unit_name: String::new(),
            x: 200.0,
            y: 200.0,
            rotation: f64::NAN,
            color_index: 5,
            bases: smallvec::smallvec![
                BaseSnapshot {
                    index: 0,
                    rotation: f64::INFINITY,
                    offset: Some((f64::NAN, 0.0)),
                },
                BaseSnapshot {
                    index: 1,
                    rotation: 15.0,
                    offset: None,
                },
            ],
        }]);
        let token = &s.tokens()[0];
        assert_eq!(token.rotation, 0.0);
        assert_eq!(token.bases[0].rotation, 0.0);
        assert!(token.bases[0].position.is_finite());
        assert_eq!(token.bases[1].rotation, 15.0);
        let codes: Vec<&str> = s.take_warnings().iter().map(|w| w.code()).collect();
        assert_eq!(codes, vec!["invalid-geometry"]);

        let json = serde_json::to_string(&s.list()).unwrap();
        assert!(!json.contains("null"));
    }

    #[test]
    fn warning_buffer_drops_oldest() {
        let mut s = scene();
        for i in 0..MAX_WARNINGS + 10 {
            s.report(BoardWarning::UnitNotFound(format!("u{i}")));
        }
        let warnings = s.take_warnings();
        assert_eq!(warnings.len(), MAX_WARNINGS);
        assert_eq!(warnings[0], BoardWarning::UnitNotFound("u10".into()));
        assert!(s.take_warnings().is_empty());
    }

    #[test]
    fn overlays_redraw_on_switch() {
        let mut s = scene();
        assert_eq!(s.zone_name(), "DZ 1");
        assert_eq!(s.zone_lines().len(), 2);
        s.cycle_deployment_zone();
        s.cycle_deployment_zone();
        assert_eq!(s.zone_lines().len(), 4);
        assert_eq!(s.cycle_deployment_zone(), 0);

        assert_eq!(s.set_objective_layout_index(5), 2);
        assert_eq!(s.objective_name(), "Obj 3");
        assert_eq!(s.objective_marks().len(), 10);
    }

    #[test]
    fn terrain_swap_leaves_tokens() {
        let mut s = scene();
        s.spawn("tank", None).unwrap();
        s.set_terrain(Some(TerrainImage::new("ruins.png")));
        assert_eq!(s.terrain().map(|t| t.source.as_str()), Some("ruins.png"));
        assert_eq!(s.tokens().len(), 1);
        s.set_terrain(None);
        assert!(s.terrain().is_none());
    }
}
