//! Simulated camera and actuator for running without hardware.
//!
//! The camera renders a synthetic scene: a dim background with faint grid
//! lines and one bright square that drifts sideways and swells and shrinks
//! over time, so the analyzer sees an obstacle approaching and receding.
//! Position jitter comes from a seeded generator, keeping runs
//! reproducible.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::PrimitiveAction;
use crate::error::Result;
use crate::vision::Frame;

use super::{Actuator, Camera};

const SIM_WIDTH: usize = 120;
const SIM_HEIGHT: usize = 90;

/// Deterministic synthetic frame source.
pub struct SimulatedCamera {
    tick: u64,
    rng: StdRng,
}

impl SimulatedCamera {
    pub fn new(seed: u64) -> Self {
        Self {
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Camera for SimulatedCamera {
    fn capture_frame(&mut self) -> Option<Frame> {
        let mut frame = Frame::filled(SIM_WIDTH, SIM_HEIGHT, 30);

        // Faint grid lines give the scene texture without strong edges.
        for y in (0..SIM_HEIGHT).step_by(20) {
            for x in 0..SIM_WIDTH {
                frame.set(x, y, 45);
            }
        }
        for x in (0..SIM_WIDTH).step_by(20) {
            for y in 0..SIM_HEIGHT {
                frame.set(x, y, 45);
            }
        }

        let t = self.tick as f32 * 0.15;
        // Obstacle sweeps across the frame while its apparent size
        // breathes, simulating approach and retreat.
        let size = (18.0 + 14.0 * t.sin()).max(6.0) as usize;
        let sweep = ((SIM_WIDTH - size) as f32 / 2.0) * (1.0 + (t * 0.4).cos());
        let jitter = self.rng.gen_range(-2i32..=2);
        let x = (sweep as i32 + jitter).clamp(0, (SIM_WIDTH - size) as i32) as usize;
        let y = (SIM_HEIGHT - size) / 2;
        frame.fill_rect(x, y, size, size, 220);

        self.tick += 1;
        Some(frame)
    }
}

/// Actuator that only logs the commands it receives.
#[derive(Debug, Default)]
pub struct LoggingActuator {
    executed: u64,
}

impl LoggingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands accepted so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }
}

impl Actuator for LoggingActuator {
    fn execute(&mut self, action: PrimitiveAction) -> Result<()> {
        self.executed += 1;
        info!("[sim] executing {}", action.as_str());
        Ok(())
    }
}
