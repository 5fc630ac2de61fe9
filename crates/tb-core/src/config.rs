//! Board configuration.
//!
//! Every tunable constant of the board lives here so hosts can override
//! them (e.g. from a JSON blob at the WASM boundary) without touching the
//! engine.

use serde::{Deserialize, Serialize};

/// Tunables for board scale, placement, and interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Real-world table width in inches.
    pub table_width_in: f64,
    /// Real-world table height in inches.
    pub table_height_in: f64,
    /// Spawn points are clamped this many pixels inside the board edge.
    pub spawn_padding_px: f64,
    /// Gap between neighbouring bases in a freshly spawned token, in inches.
    pub base_spacing_in: f64,
    /// Degrees applied per discrete rotation step.
    pub rotation_step_deg: f64,
    /// Accumulated two-finger twist (degrees) that triggers one step.
    pub twist_threshold_deg: f64,
    /// Pointer travel (pixels) below which a press/release counts as a tap.
    pub tap_slop_px: f64,
    pub token_opacity: f64,
    pub token_drag_opacity: f64,
    pub base_opacity: f64,
    pub base_drag_opacity: f64,
    /// Opacity of an entity selected as touch rotation target.
    pub rotation_target_opacity: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            table_width_in: 44.0,
            table_height_in: 60.0,
            spawn_padding_px: 10.0,
            base_spacing_in: 0.1,
            rotation_step_deg: 7.5,
            twist_threshold_deg: 7.5,
            tap_slop_px: 4.0,
            token_opacity: 1.0,
            token_drag_opacity: 0.6,
            base_opacity: 0.8,
            base_drag_opacity: 0.5,
            rotation_target_opacity: 0.7,
        }
    }
}

impl BoardConfig {
    /// Table aspect ratio (width / height).
    pub fn aspect(&self) -> f64 {
        self.table_width_in / self.table_height_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_table() {
        let config = BoardConfig::default();
        assert_eq!(config.table_width_in, 44.0);
        assert_eq!(config.table_height_in, 60.0);
        assert_eq!(config.rotation_step_deg, 7.5);
        assert!((config.aspect() - 44.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"rotationStepDeg": 5.0}"#).unwrap();
        assert_eq!(config.rotation_step_deg, 5.0);
        assert_eq!(config.spawn_padding_px, 10.0);
    }
}
