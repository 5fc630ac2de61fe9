//! Board surface: scale, layers and terrain.

use crate::config::BoardConfig;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pixel geometry of the table, derived once from the container size.
///
/// One container dimension is shrunk so the board keeps the table's
/// aspect ratio; the board is never scaled past the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardScale {
    pub width: f64,
    pub height: f64,
    pub px_per_inch_x: f64,
    pub px_per_inch_y: f64,
}

impl BoardScale {
    pub fn from_container(container_w: f64, container_h: f64, config: &BoardConfig) -> Self {
        let w = sanitize_len(container_w);
        let h = sanitize_len(container_h);
        let aspect = config.aspect();
        let (width, height) = if h > 0.0 && w / h > aspect {
            (h * aspect, h)
        } else {
            (w, w / aspect)
        };
        log::debug!("board scale {width}x{height} from container {container_w}x{container_h}");
        Self {
            width,
            height,
            px_per_inch_x: width / config.table_width_in,
            px_per_inch_y: height / config.table_height_in,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when `p` lies on the board surface (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// Convert a table position in inches to board pixels.
    pub fn inches_to_px(&self, x_in: f64, y_in: f64) -> Point {
        Point::new(x_in * self.px_per_inch_x, y_in * self.px_per_inch_y)
    }

    /// Clamp `p` into the board inset by `padding` pixels. A board smaller
    /// than twice the padding collapses to its center on that axis.
    pub fn clamp_inset(&self, p: Point, padding: f64) -> Point {
        let clamp_axis = |v: f64, len: f64| {
            if len <= padding * 2.0 {
                len / 2.0
            } else {
                v.clamp(padding, len - padding)
            }
        };
        Point::new(clamp_axis(p.x, self.width), clamp_axis(p.y, self.height))
    }
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Visual planes, bottom to top. Units always render last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Terrain,
    Objectives,
    Zones,
    Units,
}

impl Layer {
    pub const ORDER: [Layer; 4] = [Layer::Terrain, Layer::Objectives, Layer::Zones, Layer::Units];
}

/// Background image reference. The host resolves and decodes the image;
/// the board only records which one is shown and stretches it to fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainImage {
    /// Host-side image key or URL.
    pub source: String,
}

impl TerrainImage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tall_container_keeps_width() {
        let scale = BoardScale::from_container(880.0, 1400.0, &BoardConfig::default());
        assert_eq!(scale.width, 880.0);
        assert!((scale.height - 1200.0).abs() < 1e-9);
        assert!((scale.px_per_inch_x - 20.0).abs() < 1e-9);
        assert!((scale.px_per_inch_y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn wide_container_clamps_width() {
        let scale = BoardScale::from_container(2000.0, 1200.0, &BoardConfig::default());
        assert!((scale.width - 880.0).abs() < 1e-9);
        assert_eq!(scale.height, 1200.0);
        assert_eq!(scale.center(), Point::new(scale.width / 2.0, 600.0));
    }

    #[test]
    fn degenerate_container_is_empty() {
        let scale = BoardScale::from_container(f64::NAN, -3.0, &BoardConfig::default());
        assert_eq!(scale.width, 0.0);
        assert_eq!(scale.height, 0.0);
    }

    #[test]
    fn clamp_inset_respects_padding() {
        let scale = BoardScale::from_container(880.0, 1200.0, &BoardConfig::default());
        assert_eq!(
            scale.clamp_inset(Point::new(-50.0, 2000.0), 10.0),
            Point::new(10.0, 1190.0)
        );
        assert_eq!(
            scale.clamp_inset(Point::new(500.0, 500.0), 10.0),
            Point::new(500.0, 500.0)
        );
        assert!(scale.contains(Point::new(880.0, 0.0)));
        assert!(!scale.contains(Point::new(880.1, 0.0)));
    }

    #[test]
    fn layers_are_ordered_units_last() {
        assert_eq!(Layer::ORDER.last(), Some(&Layer::Units));
        assert!(Layer::Terrain < Layer::Units);
    }
}
