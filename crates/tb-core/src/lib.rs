pub mod board;
pub mod config;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod overlay;
pub mod scene;
pub mod snap;
pub mod snapshot;
pub mod warning;

pub use board::{BoardScale, Layer, TerrainImage};
pub use config::BoardConfig;
pub use geometry::{bounds_of, overlaps, resolve_overlap};
pub use id::{TokenId, UnitId};
pub use layout::{grid_dimensions, layout_token};
pub use model::*;
pub use overlay::{DeploymentZone, ObjectiveLayout, OverlayCycle};
pub use scene::{RosterItem, Scene};
pub use snap::{snap_all, snap_base};
pub use snapshot::{BaseSnapshot, TokenSnapshot};
pub use warning::BoardWarning;

// Re-export kurbo geometry so downstream crates share one set of point types.
pub use kurbo::{Affine, Point, Rect, Vec2};
