//! Core data model for the tabletop board.
//!
//! A `UnitDefinition` describes what a unit looks like on the table (base
//! shape, base size in inches, model count). Spawning one produces a
//! `TokenInstance`: a group of `BaseInstance`s laid out around a shared
//! pivot, positioned and rotated in board pixel space.

use crate::id::{TokenId, UnitId};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// The token palette, in cycling order. Index 0 is the fallback color.
pub const PALETTE: [(&str, Color); 10] = [
    ("gray", Color::rgb(0x80, 0x80, 0x80)),
    ("yellow", Color::rgb(0xFF, 0xFF, 0x00)),
    ("orange", Color::rgb(0xFF, 0xA5, 0x00)),
    ("red", Color::rgb(0xFF, 0x00, 0x00)),
    ("brown", Color::rgb(0xA5, 0x2A, 0x2A)),
    ("green", Color::rgb(0x00, 0x80, 0x00)),
    ("cyan", Color::rgb(0x00, 0xFF, 0xFF)),
    ("blue", Color::rgb(0x00, 0x00, 0xFF)),
    ("magenta", Color::rgb(0xFF, 0x00, 0xFF)),
    ("purple", Color::rgb(0x80, 0x00, 0x80)),
];

/// Named colors accepted in catalogs and overlays beyond the palette.
const EXTRA_NAMES: [(&str, Color); 3] = [
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(0xFF, 0xFF, 0xFF)),
    ("transparent", Color::rgba(0, 0, 0, 0)),
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Same color with alpha scaled to `opacity` (0.0 .. 1.0).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 | 8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = if bytes.len() == 8 {
                    hex_val(bytes[6])? << 4 | hex_val(bytes[7])?
                } else {
                    255
                };
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse a CSS-ish color: a palette/known name or a hex string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        PALETTE
            .iter()
            .chain(EXTRA_NAMES.iter())
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
            .or_else(|| Self::from_hex(&lower))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Emit as a CSS `rgba()` string (Canvas2D style strings).
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

/// Palette color at `index`, wrapping.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()].1
}

/// Palette name at `index`, wrapping.
pub fn palette_name(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()].0
}

/// Position of a color name in the palette, if it is one.
pub fn palette_index_of(name: &str) -> Option<usize> {
    let lower = name.trim().to_ascii_lowercase();
    PALETTE.iter().position(|(n, _)| *n == lower)
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// The footprint of a single model's base.
///
/// Dimensions are in inches on a `UnitDefinition` and in pixels on a
/// placed `BaseInstance` (see [`BaseShape::to_pixels`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum BaseShape {
    Circle {
        radius: f64,
    },
    Ellipse {
        #[serde(rename = "radiusX")]
        radius_x: f64,
        #[serde(rename = "radiusY")]
        radius_y: f64,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
}

impl BaseShape {
    /// Full width/height of the shape (diameter, axis length, edge length).
    pub fn extent(&self) -> (f64, f64) {
        match *self {
            BaseShape::Circle { radius } => (radius * 2.0, radius * 2.0),
            BaseShape::Ellipse { radius_x, radius_y } => (radius_x * 2.0, radius_y * 2.0),
            BaseShape::Rectangle { width, height } => (width, height),
        }
    }

    /// Circles are rotationally symmetric and never take a rotation.
    pub fn is_rotatable(&self) -> bool {
        match self {
            BaseShape::Circle { .. } => false,
            BaseShape::Ellipse { .. } | BaseShape::Rectangle { .. } => true,
        }
    }

    /// Scale an inch-based shape to pixels. Circle radii follow the width
    /// factor so a circle stays round on a non-uniform board.
    pub fn to_pixels(&self, px_per_inch_x: f64, px_per_inch_y: f64) -> BaseShape {
        match *self {
            BaseShape::Circle { radius } => BaseShape::Circle {
                radius: radius * px_per_inch_x,
            },
            BaseShape::Ellipse { radius_x, radius_y } => BaseShape::Ellipse {
                radius_x: radius_x * px_per_inch_x,
                radius_y: radius_y * px_per_inch_y,
            },
            BaseShape::Rectangle { width, height } => BaseShape::Rectangle {
                width: width * px_per_inch_x,
                height: height * px_per_inch_y,
            },
        }
    }

    /// The shape's own bounding rectangle, centered on its origin.
    pub fn local_rect(&self) -> kurbo::Rect {
        let (w, h) = self.extent();
        kurbo::Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0)
    }

    /// Exact containment test for a point in the shape's own frame.
    pub fn contains(&self, p: Point) -> bool {
        match *self {
            BaseShape::Circle { radius } => p.to_vec2().hypot2() <= radius * radius,
            BaseShape::Ellipse { radius_x, radius_y } => {
                if radius_x <= 0.0 || radius_y <= 0.0 {
                    return false;
                }
                let nx = p.x / radius_x;
                let ny = p.y / radius_y;
                nx * nx + ny * ny <= 1.0
            }
            BaseShape::Rectangle { width, height } => {
                p.x.abs() <= width / 2.0 && p.y.abs() <= height / 2.0
            }
        }
    }
}

// ─── Unit catalog ────────────────────────────────────────────────────────

/// An immutable description of a unit the user can place on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDefinition {
    pub id: UnitId,
    pub name: String,
    #[serde(flatten)]
    pub shape: BaseShape,
    pub model_count: u32,
    /// Display color: a palette name or hex string.
    #[serde(default)]
    pub color: String,
    /// Human-readable base size, e.g. `"32mm"` or `"75x42mm"`.
    #[serde(default)]
    pub base_size: String,
}

impl UnitDefinition {
    pub fn new(id: &str, name: &str, shape: BaseShape, model_count: u32) -> Self {
        Self {
            id: UnitId::intern(id),
            name: name.to_string(),
            shape,
            model_count: model_count.max(1),
            color: String::new(),
            base_size: String::new(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    #[must_use]
    pub fn with_base_size(mut self, label: &str) -> Self {
        self.base_size = label.to_string();
        self
    }

    /// Palette index for this unit's display color (0 if not a palette name).
    pub fn palette_index(&self) -> usize {
        palette_index_of(&self.color).unwrap_or(0)
    }

    /// Roster label, e.g. `"10x Marines\n(32mm)"`.
    pub fn roster_label(&self) -> String {
        let count = if self.model_count > 1 {
            format!("{}x ", self.model_count)
        } else {
            String::new()
        };
        format!("{count}{}\n({})", self.name, self.base_size)
    }
}

/// Ordered unit catalog. Insertion order is roster display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<UnitDefinition>", into = "Vec<UnitDefinition>")]
pub struct UnitCatalog {
    units: Vec<UnitDefinition>,
}

impl UnitCatalog {
    pub fn new(units: Vec<UnitDefinition>) -> Self {
        let mut catalog = Self::default();
        for unit in units {
            catalog.push(unit);
        }
        catalog
    }

    /// Append a unit. A later definition with an existing id replaces the
    /// earlier one in place, keeping its roster position.
    pub fn push(&mut self, mut unit: UnitDefinition) {
        unit.model_count = unit.model_count.max(1);
        if let Some(existing) = self.units.iter_mut().find(|u| u.id == unit.id) {
            *existing = unit;
        } else {
            self.units.push(unit);
        }
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The demo roster shipped with the board.
    pub fn demo() -> Self {
        Self::new(vec![
            UnitDefinition::new("captain", "Captain", BaseShape::Circle { radius: 1.0 }, 1)
                .with_color("purple")
                .with_base_size("40mm"),
            UnitDefinition::new("marines", "Marines", BaseShape::Circle { radius: 0.65 }, 10)
                .with_color("blue")
                .with_base_size("32mm"),
            UnitDefinition::new(
                "bikers",
                "Bikers",
                BaseShape::Ellipse {
                    radius_x: 1.5,
                    radius_y: 0.85,
                },
                5,
            )
            .with_color("green")
            .with_base_size("75x42mm"),
            UnitDefinition::new(
                "tank",
                "Tank",
                BaseShape::Rectangle {
                    width: 5.0,
                    height: 3.0,
                },
                1,
            )
            .with_color("red")
            .with_base_size("60mm"),
        ])
    }
}

impl From<Vec<UnitDefinition>> for UnitCatalog {
    fn from(units: Vec<UnitDefinition>) -> Self {
        Self::new(units)
    }
}

impl From<UnitCatalog> for Vec<UnitDefinition> {
    fn from(catalog: UnitCatalog) -> Self {
        catalog.units
    }
}

// ─── Placed instances ────────────────────────────────────────────────────

/// Outline drawn around every base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
        }
    }
}

/// One placed model within a token.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseInstance {
    /// Shape in pixels.
    pub shape: BaseShape,
    /// Center of the base in the owning token's local frame.
    pub position: Point,
    /// Degrees; always 0 for circles.
    pub rotation: f64,
    pub opacity: f64,
    pub stroke: Stroke,
    pub fill: Color,
    pub draggable: bool,
}

impl BaseInstance {
    /// Transform from the base's own frame into the token's local frame.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2()) * Affine::rotate(self.rotation.to_radians())
    }

    /// Rotate by `degrees`. Returns false (and does nothing) for circles.
    pub fn rotate_by(&mut self, degrees: f64) -> bool {
        if !self.shape.is_rotatable() {
            return false;
        }
        self.rotation += degrees;
        true
    }
}

/// A placed unit: a group of bases sharing a position, rotation and color.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInstance {
    pub id: TokenId,
    pub unit: UnitId,
    /// Board-space position of the token's local origin.
    pub position: Point,
    /// Degrees, clockwise on screen.
    pub rotation: f64,
    /// Rotation pivot recorded in layout coordinates. After re-centering the
    /// bases around it, the pivot coincides with the local origin.
    pub pivot: Point,
    pub bases: Vec<BaseInstance>,
    pub color_index: usize,
    pub opacity: f64,
    pub draggable: bool,
    pub deleted: bool,
}

impl TokenInstance {
    /// Transform from the token's local frame into board space.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2()) * Affine::rotate(self.rotation.to_radians())
    }

    /// Board-space position of a base's center.
    pub fn base_world_position(&self, index: usize) -> Option<Point> {
        self.bases.get(index).map(|b| self.affine() * b.position)
    }

    /// Convert a board-space displacement into the token's local frame.
    pub fn to_local_delta(&self, delta: Vec2) -> Vec2 {
        let (s, c) = (-self.rotation.to_radians()).sin_cos();
        Vec2::new(delta.x * c - delta.y * s, delta.x * s + delta.y * c)
    }

    /// Apply a palette color to every base.
    pub fn set_color_index(&mut self, index: usize) {
        self.color_index = index;
        let fill = palette_color(index);
        for base in &mut self.bases {
            base.fill = fill;
        }
    }

    /// Mean of all base centers in the local frame.
    pub fn centroid(&self) -> Point {
        centroid(self.bases.iter().map(|b| b.position))
    }

    /// Re-center bases around their centroid without moving anything on
    /// screen: bases shift by `-c`, the pivot records `+c`, and the token
    /// position absorbs the rotated offset. Single-base tokens keep their
    /// pivot at the base anchor.
    pub fn recenter(&mut self) {
        if self.bases.len() < 2 {
            return;
        }
        let c = self.centroid().to_vec2();
        if c.hypot2() < 1e-18 {
            return;
        }
        for base in &mut self.bases {
            base.position -= c;
        }
        self.pivot += c;
        let shift = self.affine() * c.to_point() - self.position;
        self.position += shift;
    }
}

/// Arithmetic mean of a set of points. Empty input yields the origin.
pub fn centroid(points: impl IntoIterator<Item = Point>) -> Point {
    let mut sum = Vec2::ZERO;
    let mut n = 0usize;
    for p in points {
        sum += p.to_vec2();
        n += 1;
    }
    if n == 0 {
        return Point::ORIGIN;
    }
    (sum / n as f64).to_point()
}
