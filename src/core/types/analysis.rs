//! Per-cycle frame analysis result.

use serde::{Deserialize, Serialize};

use super::PrimitiveAction;

/// Which vertical strip of the frame an observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StripDirection {
    Left,
    Center,
    Right,
}

impl StripDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StripDirection::Left => "left",
            StripDirection::Center => "center",
            StripDirection::Right => "right",
        }
    }

    /// Bearing offset of this strip relative to the robot heading, in
    /// degrees (counterclockwise positive). The side strips sit roughly
    /// 30° off center for a typical narrow camera field of view.
    pub fn bearing_offset_deg(&self) -> f32 {
        match self {
            StripDirection::Left => 30.0,
            StripDirection::Center => 0.0,
            StripDirection::Right => -30.0,
        }
    }
}

/// Immutable result of analyzing one camera frame.
///
/// Distances are heuristic monocular estimates in centimeters;
/// `f32::INFINITY` means no obstacle was resolvable in that strip.
/// Produced fresh each cycle and never persisted (decisions derived from it
/// are logged as movement records instead).
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceAnalysis {
    /// Estimated obstacle distance in the left strip (cm).
    pub left_cm: f32,
    /// Estimated obstacle distance in the center strip (cm).
    pub center_cm: f32,
    /// Estimated obstacle distance in the right strip (cm).
    pub right_cm: f32,
    /// Minimum of the three strip distances.
    pub closest_cm: f32,
    /// Strip holding the closest obstacle. `None` when nothing resolved.
    ///
    /// Ties resolve center, then left, then right: center is the most
    /// safety-critical strip to act on.
    pub closest_direction: Option<StripDirection>,
    /// Whether the closest obstacle is beyond the safe-distance threshold.
    pub safe_to_move: bool,
    /// Action the analyzer recommends for this frame.
    pub recommended: PrimitiveAction,
}

impl DistanceAnalysis {
    /// Analysis for an absent frame or a frame in which nothing resolved:
    /// unsafe, everything at infinity, stop.
    pub fn unresolved() -> Self {
        Self {
            left_cm: f32::INFINITY,
            center_cm: f32::INFINITY,
            right_cm: f32::INFINITY,
            closest_cm: f32::INFINITY,
            closest_direction: None,
            safe_to_move: false,
            recommended: PrimitiveAction::Stop,
        }
    }

    /// Distance estimate for a given strip.
    pub fn distance_in(&self, dir: StripDirection) -> f32 {
        match dir {
            StripDirection::Left => self.left_cm,
            StripDirection::Center => self.center_cm,
            StripDirection::Right => self.right_cm,
        }
    }
}
