//! Append-only movement log entries.

use serde::{Deserialize, Serialize};

use super::{Pose, PrimitiveAction};

/// One entry of the movement history.
///
/// Created by the decision engine at decision time and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    /// Wall-clock time of the decision, microseconds since the epoch.
    pub timestamp_us: u64,
    /// Action that was chosen.
    pub action: PrimitiveAction,
    /// Human-readable reason for the decision.
    pub reason: String,
    /// Pose snapshot at decision time.
    pub pose: Pose,
    /// Closest measured distance this cycle (cm; sentinel 999.0 when the
    /// frame resolved nothing).
    pub distance_cm: f32,
    /// Whether an obstacle triggered this decision.
    pub obstacle: bool,
}
