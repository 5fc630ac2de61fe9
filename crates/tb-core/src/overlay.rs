//! Reference overlays: deployment-zone lines and objective markers.
//!
//! Both catalogs are static and parametrized by the board scale, so a
//! resized board redraws them correctly. Switching layouts clears the
//! layer and redraws it from scratch.

use crate::board::BoardScale;
use crate::model::{Color, Stroke};
use kurbo::Point;
use smallvec::{SmallVec, smallvec};

// ─── Drawn primitives ────────────────────────────────────────────────────

/// A resolved line segment in board pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnLine {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f64,
}

/// A resolved circle in board pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnCircle {
    pub center: Point,
    pub radius: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

// ─── Deployment zones ────────────────────────────────────────────────────

/// One coordinate of a zone endpoint, resolved against a board axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    /// Inches from the top or left edge.
    Near(f64),
    /// Inches from the bottom or right edge.
    Far(f64),
    /// The board center on this axis.
    Center,
}

impl Edge {
    fn resolve(self, len: f64, px_per_inch: f64) -> f64 {
        match self {
            Edge::Near(inches) => inches * px_per_inch,
            Edge::Far(inches) => len - inches * px_per_inch,
            Edge::Center => len / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneLine {
    pub from: (Edge, Edge),
    pub to: (Edge, Edge),
    pub color: Color,
    pub width: f64,
}

impl ZoneLine {
    pub const fn new(from: (Edge, Edge), to: (Edge, Edge), color: Color) -> Self {
        Self {
            from,
            to,
            color,
            width: ZONE_LINE_WIDTH,
        }
    }

    pub fn resolve(&self, scale: &BoardScale) -> DrawnLine {
        let point = |(x, y): (Edge, Edge)| {
            Point::new(
                x.resolve(scale.width, scale.px_per_inch_x),
                y.resolve(scale.height, scale.px_per_inch_y),
            )
        };
        DrawnLine {
            from: point(self.from),
            to: point(self.to),
            color: self.color,
            width: self.width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentZone {
    pub name: String,
    pub lines: SmallVec<[ZoneLine; 4]>,
}

impl DeploymentZone {
    pub fn draw(&self, scale: &BoardScale) -> Vec<DrawnLine> {
        self.lines.iter().map(|l| l.resolve(scale)).collect()
    }
}

const ZONE_LINE_WIDTH: f64 = 4.0;
const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);
const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);

/// The built-in deployment zones.
pub fn default_zones() -> Vec<DeploymentZone> {
    use Edge::*;
    vec![
        DeploymentZone {
            name: "DZ 1".into(),
            lines: smallvec![
                ZoneLine::new((Near(0.0), Near(12.0)), (Far(0.0), Near(12.0)), BLUE),
                ZoneLine::new((Near(0.0), Far(12.0)), (Far(0.0), Far(12.0)), RED),
            ],
        },
        DeploymentZone {
            name: "DZ 2".into(),
            lines: smallvec![
                ZoneLine::new((Near(10.0), Near(0.0)), (Near(10.0), Far(0.0)), BLUE),
                ZoneLine::new((Near(34.0), Near(0.0)), (Near(34.0), Far(0.0)), RED),
            ],
        },
        DeploymentZone {
            name: "DZ 3".into(),
            lines: smallvec![
                ZoneLine::new((Near(0.0), Near(0.0)), (Center, Center), BLUE),
                ZoneLine::new((Far(0.0), Near(0.0)), (Center, Center), RED),
                ZoneLine::new((Near(0.0), Far(0.0)), (Center, Center), GREEN),
                ZoneLine::new((Far(0.0), Far(0.0)), (Center, Center), YELLOW),
            ],
        },
    ]
}

// ─── Objectives ──────────────────────────────────────────────────────────

/// An objective marker in table inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objective {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Objective {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            radius: OBJECTIVE_RADIUS_IN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveLayout {
    pub name: String,
    pub objectives: SmallVec<[Objective; 6]>,
}

const OBJECTIVE_RADIUS_IN: f64 = 3.0;
const MARKER_RADIUS_IN: f64 = 0.5;
const ORANGE: Color = Color::rgb(0xFF, 0xA5, 0x00);

impl ObjectiveLayout {
    /// Each objective becomes a translucent ring followed by a solid center
    /// marker. Radii follow the width factor so markers stay round.
    pub fn draw(&self, scale: &BoardScale) -> Vec<DrawnCircle> {
        let mut out = Vec::with_capacity(self.objectives.len() * 2);
        for obj in &self.objectives {
            let center = scale.inches_to_px(obj.x, obj.y);
            out.push(DrawnCircle {
                center,
                radius: obj.radius * scale.px_per_inch_x,
                fill: Some(ORANGE.with_opacity(0.2)),
                stroke: Some(Stroke {
                    color: ORANGE,
                    width: 2.0,
                }),
            });
            out.push(DrawnCircle {
                center,
                radius: MARKER_RADIUS_IN * scale.px_per_inch_x,
                fill: Some(ORANGE),
                stroke: None,
            });
        }
        out
    }
}

/// The built-in objective layouts.
pub fn default_objectives() -> Vec<ObjectiveLayout> {
    let o = Objective::new;
    vec![
        ObjectiveLayout {
            name: "Obj 1".into(),
            objectives: smallvec![
                o(22.0, 30.0),
                o(12.0, 12.0),
                o(32.0, 12.0),
                o(12.0, 48.0),
                o(32.0, 48.0),
            ],
        },
        ObjectiveLayout {
            name: "Obj 2".into(),
            objectives: smallvec![
                o(11.0, 20.0),
                o(22.0, 20.0),
                o(33.0, 20.0),
                o(11.0, 40.0),
                o(22.0, 40.0),
                o(33.0, 40.0),
            ],
        },
        ObjectiveLayout {
            name: "Obj 3".into(),
            objectives: smallvec![
                o(22.0, 30.0),
                o(14.7, 20.0),
                o(29.3, 20.0),
                o(14.7, 40.0),
                o(29.3, 40.0),
            ],
        },
    ]
}

// ─── Cycling ─────────────────────────────────────────────────────────────

/// A catalog with a current selection that wraps in both directions.
#[derive(Debug, Clone)]
pub struct OverlayCycle<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> OverlayCycle<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    /// Advance to the next entry, wrapping. Returns the new index.
    pub fn cycle(&mut self) -> usize {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
        self.index
    }

    /// Jump to `index` modulo the catalog length. Returns the new index.
    pub fn set_index(&mut self, index: usize) -> usize {
        self.index = if self.items.is_empty() {
            0
        } else {
            index % self.items.len()
        };
        self.index
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    fn scale_20() -> BoardScale {
        BoardScale::from_container(880.0, 1200.0, &BoardConfig::default())
    }

    #[test]
    fn cycling_three_times_returns_to_start() {
        let mut zones = OverlayCycle::new(default_zones());
        assert_eq!(zones.len(), 3);
        zones.cycle();
        zones.cycle();
        assert_eq!(zones.cycle(), 0);
        assert_eq!(zones.current().map(|z| z.name.as_str()), Some("DZ 1"));
    }

    #[test]
    fn set_index_wraps_modulo_length() {
        let mut objectives = OverlayCycle::new(default_objectives());
        assert_eq!(objectives.set_index(4), 1);
        assert_eq!(objectives.current().map(|o| o.name.as_str()), Some("Obj 2"));

        let mut empty: OverlayCycle<DeploymentZone> = OverlayCycle::new(Vec::new());
        assert_eq!(empty.cycle(), 0);
        assert_eq!(empty.set_index(7), 0);
        assert!(empty.current().is_none());
    }

    #[test]
    fn zone_lines_follow_scale() {
        let scale = scale_20();
        let zones = default_zones();
        let dz1 = zones[0].draw(&scale);
        assert_eq!(dz1[0].from, Point::new(0.0, 240.0));
        assert_eq!(dz1[0].to, Point::new(880.0, 240.0));
        assert_eq!(dz1[1].from.y, 960.0);
        assert_eq!(dz1[0].width, 4.0);

        let dz3 = zones[2].draw(&scale);
        assert_eq!(dz3.len(), 4);
        assert!(dz3.iter().all(|l| l.to == scale.center()));
        assert_eq!(dz3[3].from, Point::new(880.0, 1200.0));
    }

    #[test]
    fn objectives_draw_ring_and_marker() {
        let scale = scale_20();
        let circles = default_objectives()[0].draw(&scale);
        assert_eq!(circles.len(), 10);
        let (ring, marker) = (circles[0], circles[1]);
        assert_eq!(ring.center, Point::new(440.0, 600.0));
        assert_eq!(ring.radius, 60.0);
        assert_eq!(ring.fill.map(|c| c.a), Some(51));
        assert_eq!(marker.radius, 10.0);
        assert!(marker.stroke.is_none());
    }
}
