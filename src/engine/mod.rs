//! Navigation engine: wiring, lifecycle and status.

mod decision;
mod integrator;
mod recorder;

pub use decision::{DecisionEngine, NavState};
pub use integrator::PoseIntegrator;
pub use recorder::MovementRecorder;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::info;
use parking_lot::Mutex;

use crate::config::NavConfig;
use crate::core::types::{GridCoord, MovementRecord, Pose};
use crate::error::{NavError, Result};
use crate::exploration::{Actuator, Camera, ExplorationHandle, ExplorationLoop};
use crate::ledger::{GridLedger, MapSnapshot};

/// Point-in-time view of the whole engine, safe to take while the
/// exploration thread runs.
#[derive(Debug, Clone)]
pub struct Status {
    pub state: NavState,
    pub pose: Pose,
    pub visited_cells: usize,
    pub obstacle_cells: usize,
    /// Number of logged movement decisions.
    pub path_length: usize,
    pub obstacles_avoided: u32,
    pub steps: u64,
    /// Seconds since exploration started; 0 before the first start.
    pub elapsed_s: f32,
}

/// Owns every component and the exploration thread's lifecycle.
///
/// All shared pieces sit behind `Arc`s, so status queries and map dumps
/// work concurrently with a running exploration.
pub struct NavigationEngine {
    config: NavConfig,
    ledger: Arc<GridLedger>,
    integrator: Arc<PoseIntegrator>,
    recorder: Arc<MovementRecorder>,
    decision: Arc<Mutex<DecisionEngine>>,
    handle: Mutex<Option<ExplorationHandle>>,
    completed_steps: AtomicU64,
    exploration_started: Mutex<Option<Instant>>,
}

impl NavigationEngine {
    /// Engine with no durable map storage.
    pub fn new(config: NavConfig) -> Result<Self> {
        config.validate()?;
        let ledger = Arc::new(GridLedger::in_memory(config.grid.clone()));
        Ok(Self::assemble(config, ledger))
    }

    /// Engine persisting its map to a journal file, resuming prior state.
    pub fn with_journal(config: NavConfig, path: &Path) -> Result<Self> {
        config.validate()?;
        let ledger = Arc::new(GridLedger::open(config.grid.clone(), path)?);
        Ok(Self::assemble(config, ledger))
    }

    fn assemble(config: NavConfig, ledger: Arc<GridLedger>) -> Self {
        let integrator = Arc::new(PoseIntegrator::new(
            config.grid.clone(),
            config.motion.clone(),
        ));
        let recorder = Arc::new(MovementRecorder::new());
        let decision = Arc::new(Mutex::new(DecisionEngine::new(
            Arc::clone(&ledger),
            Arc::clone(&recorder),
            config.clone(),
            integrator.snapshot(),
        )));

        Self {
            config,
            ledger,
            integrator,
            recorder,
            decision,
            handle: Mutex::new(None),
            completed_steps: AtomicU64::new(0),
            exploration_started: Mutex::new(None),
        }
    }

    /// Spawn the exploration thread. Errors if a run is already active.
    pub fn start_exploration(
        &self,
        camera: Box<dyn Camera>,
        actuator: Box<dyn Actuator>,
        max_steps: Option<u64>,
    ) -> Result<()> {
        let mut slot = self.handle.lock();
        if slot.as_ref().map(|h| h.is_running()).unwrap_or(false) {
            return Err(NavError::AlreadyRunning);
        }

        let looped = ExplorationLoop {
            config: self.config.clone(),
            ledger: Arc::clone(&self.ledger),
            integrator: Arc::clone(&self.integrator),
            recorder: Arc::clone(&self.recorder),
            decision: Arc::clone(&self.decision),
        };
        *slot = Some(looped.spawn(camera, actuator, max_steps)?);
        *self.exploration_started.lock() = Some(Instant::now());
        Ok(())
    }

    /// Ask the exploration thread to stop and mark navigation halted.
    pub fn request_stop(&self) {
        if let Some(handle) = self.handle.lock().as_ref() {
            handle.request_stop();
        }
        self.decision.lock().halt();
    }

    /// Resume after an avoidance hold.
    pub fn resume(&self) {
        self.decision.lock().resume();
    }

    /// Switch navigation to returning to the start cell.
    pub fn request_return(&self) {
        self.decision.lock().request_return();
    }

    /// Block until the exploration thread exits.
    pub fn join(&self) {
        if let Some(handle) = self.handle.lock().take() {
            // The handle dies with the join; keep its final step count
            // for later status queries.
            let steps = handle.join();
            self.completed_steps.store(steps, Ordering::SeqCst);
        }
    }

    pub fn status(&self) -> Status {
        let decision = self.decision.lock();
        Status {
            state: decision.state(),
            pose: self.integrator.snapshot(),
            visited_cells: self.ledger.visited_cells(),
            obstacle_cells: self.ledger.obstacle_cells(),
            path_length: self.recorder.len(),
            obstacles_avoided: decision.obstacles_avoided(),
            steps: self
                .handle
                .lock()
                .as_ref()
                .map(|h| h.steps())
                .unwrap_or_else(|| self.completed_steps.load(Ordering::SeqCst)),
            elapsed_s: self
                .exploration_started
                .lock()
                .map(|t| t.elapsed().as_secs_f32())
                .unwrap_or(0.0),
        }
    }

    pub fn map_snapshot(&self) -> MapSnapshot {
        self.ledger.snapshot()
    }

    /// Known obstacles within the configured search radius of the robot's
    /// current cell.
    pub fn obstacles_nearby(&self) -> Vec<(GridCoord, f32)> {
        self.ledger.nearby_obstacles(
            self.integrator.current_cell(),
            self.config.exploration.obstacle_search_radius,
        )
    }

    pub fn movement_history(&self) -> Vec<MovementRecord> {
        self.recorder.records()
    }

    /// Wipe the map, history and pose, and restart at the map center.
    ///
    /// Errors if exploration is still running; stop and join first.
    pub fn reset(&self) -> Result<()> {
        if self
            .handle
            .lock()
            .as_ref()
            .map(|h| h.is_running())
            .unwrap_or(false)
        {
            return Err(NavError::AlreadyRunning);
        }

        info!("Resetting navigation state");
        self.ledger.reset();
        self.recorder.clear();
        let center = Pose::new(
            self.config.grid.width_m() / 2.0,
            self.config.grid.height_m() / 2.0,
            0.0,
        );
        self.integrator.reset(center);
        self.decision.lock().reinitialize(center);
        self.completed_steps.store(0, Ordering::SeqCst);
        *self.exploration_started.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_config() {
        let mut config = NavConfig::default();
        config.grid.width = 0;
        assert!(NavigationEngine::new(config).is_err());
    }

    #[test]
    fn test_initial_status() {
        let engine = NavigationEngine::new(NavConfig::default()).unwrap();
        let status = engine.status();
        assert_eq!(status.state, NavState::Exploring);
        assert_eq!(status.visited_cells, 0);
        assert_eq!(status.path_length, 0);
        assert_eq!(status.steps, 0);
        // The clock starts with exploration, not with construction.
        assert_eq!(status.elapsed_s, 0.0);
    }

    #[test]
    fn test_reset_restores_center_pose() {
        let engine = NavigationEngine::new(NavConfig::default()).unwrap();
        engine.integrator.reset(Pose::new(1.0, 2.0, 45.0));
        engine.reset().unwrap();

        let status = engine.status();
        assert_eq!(status.pose, Pose::new(5.0, 5.0, 0.0));
        assert_eq!(status.state, NavState::Exploring);
    }
}
