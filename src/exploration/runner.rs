//! The exploration thread: sense, decide, act, integrate, record.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use parking_lot::Mutex;

use crate::config::NavConfig;
use crate::engine::{DecisionEngine, MovementRecorder, NavState, PoseIntegrator};
use crate::error::Result;
use crate::ledger::GridLedger;
use crate::vision::FrameAnalyzer;

use super::{Actuator, Camera};

pub const EXPLORATION_THREAD_NAME: &str = "exploration";

/// Shared pieces the loop operates on. The caller keeps clones of the same
/// `Arc`s for status queries while the loop runs.
#[derive(Clone)]
pub struct ExplorationLoop {
    pub config: NavConfig,
    pub ledger: Arc<GridLedger>,
    pub integrator: Arc<PoseIntegrator>,
    pub recorder: Arc<MovementRecorder>,
    pub decision: Arc<Mutex<DecisionEngine>>,
}

/// Control handle for a running exploration thread.
pub struct ExplorationHandle {
    running: Arc<AtomicBool>,
    steps: Arc<AtomicU64>,
    join: Option<JoinHandle<()>>,
}

impl ExplorationHandle {
    /// Cooperative stop request; the loop exits at the next cycle boundary.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Completed cycles so far.
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    /// Whether the loop has neither finished nor been asked to stop.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
            && self.join.as_ref().map(|j| !j.is_finished()).unwrap_or(false)
    }

    /// Wait for the thread to exit; returns the final step count.
    pub fn join(mut self) -> u64 {
        if let Some(handle) = self.join.take() {
            if handle.join().is_err() {
                error!("Exploration thread panicked");
            }
        }
        self.steps.load(Ordering::SeqCst)
    }
}

impl ExplorationLoop {
    /// Spawn the exploration thread.
    ///
    /// Runs until the decision engine reaches `Stopped`, `max_steps` cycles
    /// complete, an actuator command fails, or a stop is requested through
    /// the returned handle.
    pub fn spawn(
        self,
        mut camera: Box<dyn Camera>,
        mut actuator: Box<dyn Actuator>,
        max_steps: Option<u64>,
    ) -> Result<ExplorationHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let steps = Arc::new(AtomicU64::new(0));

        let thread_running = Arc::clone(&running);
        let thread_steps = Arc::clone(&steps);

        let join = thread::Builder::new()
            .name(EXPLORATION_THREAD_NAME.to_string())
            .spawn(move || {
                info!(
                    "Exploration loop started at {} Hz",
                    self.config.exploration.loop_rate_hz
                );
                self.run(&mut *camera, &mut *actuator, max_steps, &thread_running, &thread_steps);
                thread_running.store(false, Ordering::SeqCst);
                info!(
                    "Exploration loop finished after {} steps",
                    thread_steps.load(Ordering::SeqCst)
                );
            })?;

        Ok(ExplorationHandle {
            running,
            steps,
            join: Some(join),
        })
    }

    fn run(
        &self,
        camera: &mut dyn Camera,
        actuator: &mut dyn Actuator,
        max_steps: Option<u64>,
        running: &AtomicBool,
        steps: &AtomicU64,
    ) {
        let analyzer = FrameAnalyzer::new(self.config.vision.clone());
        let period = Duration::from_secs_f32(1.0 / self.config.exploration.loop_rate_hz);
        let step_duration = self.config.motion.step_duration_s;

        while running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();

            if self.cycle(camera, actuator, &analyzer, step_duration) == CycleOutcome::Halt {
                break;
            }

            let done = steps.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(limit) = max_steps {
                if done >= limit {
                    info!("Step limit ({}) reached", limit);
                    self.decision.lock().halt();
                    break;
                }
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            } else {
                debug!("Cycle overran loop period: {:?}", elapsed);
            }
        }
    }

    fn cycle(
        &self,
        camera: &mut dyn Camera,
        actuator: &mut dyn Actuator,
        analyzer: &FrameAnalyzer,
        step_duration: f32,
    ) -> CycleOutcome {
        let frame = camera.capture_frame();
        let analysis = analyzer.analyze(frame.as_ref());

        let pose = self.integrator.snapshot();
        let cell = self.integrator.current_cell();

        let (action, state) = {
            let mut decision = self.decision.lock();
            let action = decision.decide(&analysis, pose, cell);
            (action, decision.state())
        };

        if let Err(e) = actuator.execute(action) {
            error!("Actuator rejected {}: {}", action.as_str(), e);
            self.decision.lock().fail_actuator();
            return CycleOutcome::Halt;
        }

        self.integrator.update(action, step_duration);

        // The visit belongs to the cell the robot ended the cycle in, not
        // the one it decided from.
        let obstacle = analysis.closest_cm.is_finite() && !analysis.safe_to_move;
        self.ledger
            .record_visit(self.integrator.current_cell(), obstacle, analysis.closest_cm);

        match state {
            NavState::Stopped => CycleOutcome::Halt,
            // The avoidance hold lasts exactly one executed stop cycle; the
            // obstacle is on the map now, and the next decision steers
            // around it.
            NavState::Avoiding => {
                self.decision.lock().resume();
                CycleOutcome::Continue
            }
            _ => CycleOutcome::Continue,
        }
    }
}

#[derive(PartialEq, Eq)]
enum CycleOutcome {
    Continue,
    Halt,
}
