//! Persistable snapshots of placed tokens.
//!
//! A snapshot carries enough to rebuild a token exactly: replay the spawn
//! at the recorded position, then restore rotation, color and per-base
//! overrides. The host stores them as JSON or as a compact MessagePack
//! blob (`encode` / `decode`).

use crate::id::UnitId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-base override within a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSnapshot {
    pub index: usize,
    /// Degrees.
    pub rotation: f64,
    /// Position in the token frame, when it differs from the fresh layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSnapshot {
    pub unit_id: UnitId,
    /// Display name, used to resolve the unit when the id is unknown.
    #[serde(default)]
    pub unit_name: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub color_index: usize,
    #[serde(default)]
    pub bases: SmallVec<[BaseSnapshot; 8]>,
}

/// Encode snapshots as MessagePack.
pub fn encode(snapshots: &[TokenSnapshot]) -> Result<Vec<u8>, String> {
    rmp_serde::to_vec_named(snapshots).map_err(|e| format!("Snapshot encode error: {e}"))
}

/// Decode snapshots produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<TokenSnapshot>, String> {
    rmp_serde::from_slice(bytes).map_err(|e| format!("Snapshot decode error: {e}"))
}
