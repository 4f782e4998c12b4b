//! Dead-reckoning pose integration.
//!
//! No wheel encoders or IMU are available; the pose is integrated purely
//! from the actions we command and their nominal durations. Accumulated
//! drift is accepted and unmodeled. Position is clamped to the physical
//! map bounds so the estimate can never leave the grid.

use parking_lot::RwLock;

use crate::config::{GridConfig, MotionConfig};
use crate::core::math::normalize_deg;
use crate::core::types::{GridCoord, Pose, PrimitiveAction, TurnStep};

/// Integrates commanded actions into a pose estimate.
///
/// Writers (the exploration loop) and readers (status queries) may be on
/// different threads; the pose lives behind a read/write lock and all
/// reads are snapshots.
pub struct PoseIntegrator {
    pose: RwLock<Pose>,
    grid: GridConfig,
    motion: MotionConfig,
}

impl PoseIntegrator {
    /// New integrator starting at the map center, heading east.
    pub fn new(grid: GridConfig, motion: MotionConfig) -> Self {
        let start = Pose::new(grid.width_m() / 2.0, grid.height_m() / 2.0, 0.0);
        Self {
            pose: RwLock::new(start),
            grid,
            motion,
        }
    }

    /// Apply one executed action over `dt` seconds. Turns use the sharp
    /// (avoidance) step.
    pub fn update(&self, action: PrimitiveAction, dt_s: f32) {
        self.update_with_step(action, dt_s, TurnStep::Sharp);
    }

    /// Apply one executed action over `dt` seconds with an explicit turn
    /// magnitude.
    pub fn update_with_step(&self, action: PrimitiveAction, dt_s: f32, step: TurnStep) {
        let turn_deg = match step {
            TurnStep::Sharp => self.motion.sharp_turn_deg,
            TurnStep::Smooth => self.motion.smooth_turn_deg,
        };

        let mut pose = self.pose.write();
        match action {
            PrimitiveAction::MoveForward | PrimitiveAction::MoveBackward => {
                let sign = if action == PrimitiveAction::MoveForward {
                    1.0
                } else {
                    -1.0
                };
                let dist = sign * self.motion.speed_mps * dt_s;
                let (sin, cos) = pose.heading_rad().sin_cos();
                pose.x = (pose.x + dist * cos).clamp(0.0, self.grid.width_m());
                pose.y = (pose.y + dist * sin).clamp(0.0, self.grid.height_m());
            }
            PrimitiveAction::TurnLeft => {
                pose.heading_deg = normalize_deg(pose.heading_deg + turn_deg);
            }
            PrimitiveAction::TurnRight => {
                pose.heading_deg = normalize_deg(pose.heading_deg - turn_deg);
            }
            PrimitiveAction::Stop => {}
        }
    }

    /// Current pose snapshot.
    pub fn snapshot(&self) -> Pose {
        *self.pose.read()
    }

    /// Grid cell containing the current position.
    pub fn current_cell(&self) -> GridCoord {
        let pose = self.snapshot();
        GridCoord::from_world(
            pose.x,
            pose.y,
            self.grid.cell_size_m,
            self.grid.width,
            self.grid.height,
        )
    }

    /// Overwrite the pose, normalizing the heading.
    pub fn reset(&self, pose: Pose) {
        *self.pose.write() = Pose::new(pose.x, pose.y, pose.heading_deg);
    }
}
