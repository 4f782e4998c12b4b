//! Discrete grid coordinates.

use serde::{Deserialize, Serialize};

/// Integer cell coordinates on the exploration grid.
///
/// All coordinates handed to the ledger are clamped to
/// `[0, width) x [0, height)` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert a world position (meters) to a clamped grid coordinate.
    ///
    /// Cell index = `floor(position / cell_size)`, clamped in bounds.
    pub fn from_world(x_m: f32, y_m: f32, cell_size_m: f32, width: u32, height: u32) -> Self {
        let gx = (x_m / cell_size_m).floor() as i32;
        let gy = (y_m / cell_size_m).floor() as i32;
        Self::new(gx, gy).clamped(width, height)
    }

    /// Clamp into `[0, width) x [0, height)`.
    #[inline]
    pub fn clamped(self, width: u32, height: u32) -> Self {
        Self {
            x: self.x.clamp(0, width as i32 - 1),
            y: self.y.clamp(0, height as i32 - 1),
        }
    }

    /// Offset by a grid step (unclamped).
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev distance to another cell.
    #[inline]
    pub fn chebyshev(self, other: GridCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}
