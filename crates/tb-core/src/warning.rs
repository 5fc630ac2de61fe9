//! Structured, non-fatal warnings.
//!
//! Nothing on the board is fatal: a malformed operation no-ops and reports
//! one of these so the surrounding UI can decide whether to tell the user.

use crate::id::{TokenId, UnitId};
use std::fmt;

/// Kind of a soft failure.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardWarning {
    /// No catalog entry for the requested unit id or name.
    UnitNotFound(String),
    /// The token handle does not resolve to a live token.
    TokenNotFound(TokenId),
    /// A non-finite spawn point (the board center was used) or a non-finite
    /// rotation or offset in a snapshot (reset to the fresh layout).
    InvalidGeometry { x: f64, y: f64 },
    /// The operation does not apply to the target (e.g. rotating a circle).
    StateConflict(&'static str),
}

impl BoardWarning {
    pub fn unit_not_found(unit: UnitId) -> Self {
        Self::UnitNotFound(unit.as_str().to_string())
    }

    /// Short rule identifier for the UI (e.g. `"unit-not-found"`).
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "unit-not-found",
            Self::TokenNotFound(_) => "token-not-found",
            Self::InvalidGeometry { .. } => "invalid-geometry",
            Self::StateConflict(_) => "state-conflict",
        }
    }
}

impl fmt::Display for BoardWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitNotFound(unit) => write!(f, "Unit not found: {unit}"),
            Self::TokenNotFound(id) => write!(f, "Token not found: {id}"),
            Self::InvalidGeometry { x, y } => {
                write!(f, "Invalid geometry at ({x}, {y}); using a fallback")
            }
            Self::StateConflict(what) => write!(f, "Ignored: {what}"),
        }
    }
}
