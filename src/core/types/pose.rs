//! Robot pose for dead-reckoned 2D navigation.

use serde::{Deserialize, Serialize};

use crate::core::math::normalize_deg;

/// Robot pose: position in meters plus heading in degrees.
///
/// Heading is normalized to [0, 360), 0° = east, counterclockwise positive.
/// The pose is owned exclusively by the pose integrator; everyone else sees
/// read-only snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Heading in degrees, normalized to [0, 360).
    pub heading_deg: f32,
}

impl Pose {
    /// Create a new pose with the heading normalized.
    #[inline]
    pub fn new(x: f32, y: f32, heading_deg: f32) -> Self {
        Self {
            x,
            y,
            heading_deg: normalize_deg(heading_deg),
        }
    }

    /// Heading in radians.
    #[inline]
    pub fn heading_rad(&self) -> f32 {
        self.heading_deg.to_radians()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading_deg: 0.0,
        }
    }
}
