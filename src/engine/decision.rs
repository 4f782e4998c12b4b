//! Rule-based navigation decisions.
//!
//! One decision per cycle, computed from the current frame analysis, the
//! pose estimate and the grid ledger. Safety outranks everything: the
//! emergency-stop rule fires before any state-specific logic, in every
//! state.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::NavConfig;
use crate::core::math::turn_delta_deg;
use crate::core::types::{
    DistanceAnalysis, GridCoord, MovementRecord, Pose, PrimitiveAction, StripDirection,
};
use crate::ledger::{GridLedger, UNMEASURED_DISTANCE_CM};
use crate::engine::MovementRecorder;
use crate::utils::now_us;

/// High-level navigation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    /// Normal coverage-driven wandering.
    #[default]
    Exploring,
    /// An emergency stop fired; holding until resumed.
    Avoiding,
    /// Heading back to the start cell.
    Returning,
    /// Terminal until reinitialized.
    Stopped,
}

impl NavState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Exploring => "exploring",
            NavState::Avoiding => "avoiding",
            NavState::Returning => "returning",
            NavState::Stopped => "stopped",
        }
    }

    /// Whether the robot is still willing to move.
    pub fn is_active(&self) -> bool {
        !matches!(self, NavState::Stopped)
    }
}

/// Per-cycle decision maker.
///
/// Owns the navigation state machine; the exploration loop drives it with
/// one `decide` call per cycle and executes whatever comes back. Every
/// decision is appended to the movement history with its reason.
pub struct DecisionEngine {
    ledger: Arc<GridLedger>,
    recorder: Arc<MovementRecorder>,
    config: NavConfig,
    start_pose: Pose,
    start_cell: GridCoord,
    state: NavState,
    obstacles_avoided: u32,
}

/// Candidate headings for coverage redirection, in tie-break order.
const CARDINAL_HEADINGS: [f32; 4] = [0.0, 90.0, 180.0, 270.0];

impl DecisionEngine {
    pub fn new(
        ledger: Arc<GridLedger>,
        recorder: Arc<MovementRecorder>,
        config: NavConfig,
        start_pose: Pose,
    ) -> Self {
        let start_cell = GridCoord::from_world(
            start_pose.x,
            start_pose.y,
            config.grid.cell_size_m,
            config.grid.width,
            config.grid.height,
        );
        Self {
            ledger,
            recorder,
            config,
            start_pose,
            start_cell,
            state: NavState::Exploring,
            obstacles_avoided: 0,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn obstacles_avoided(&self) -> u32 {
        self.obstacles_avoided
    }

    /// Decide the action for this cycle.
    pub fn decide(
        &mut self,
        analysis: &DistanceAnalysis,
        pose: Pose,
        cell: GridCoord,
    ) -> PrimitiveAction {
        // Emergency stop outranks every active state. Stopped is terminal;
        // only reinitialize() leaves it.
        if self.state.is_active() && analysis.closest_cm <= self.config.vision.min_distance_cm {
            return self.emergency_stop(analysis, pose);
        }

        match self.state {
            NavState::Stopped => self.record(
                PrimitiveAction::Stop,
                "halted".to_string(),
                pose,
                analysis,
                false,
            ),
            NavState::Avoiding => self.record(
                PrimitiveAction::Stop,
                "holding after avoidance, awaiting resume".to_string(),
                pose,
                analysis,
                false,
            ),
            NavState::Returning => self.decide_returning(analysis, pose, cell),
            NavState::Exploring => self.decide_exploring(analysis, pose, cell),
        }
    }

    fn emergency_stop(&mut self, analysis: &DistanceAnalysis, pose: Pose) -> PrimitiveAction {
        self.state = NavState::Avoiding;
        self.obstacles_avoided += 1;

        let direction = analysis
            .closest_direction
            .unwrap_or(StripDirection::Center);
        let obstacle_cell = self.project_obstacle(pose, direction, analysis.closest_cm);
        self.ledger
            .record_obstacle(obstacle_cell, self.config.exploration.obstacle_confidence);

        warn!(
            "Emergency stop: obstacle {:.1} cm {} of heading, marked at {:?}",
            analysis.closest_cm,
            direction.as_str(),
            obstacle_cell
        );

        self.record(
            PrimitiveAction::Stop,
            format!(
                "obstacle at {:.1} cm ({}), below minimum clearance",
                analysis.closest_cm,
                direction.as_str()
            ),
            pose,
            analysis,
            true,
        )
    }

    /// Map an obstacle sighting to the grid cell it occupies, projecting
    /// along the strip bearing from the current pose.
    fn project_obstacle(
        &self,
        pose: Pose,
        direction: StripDirection,
        distance_cm: f32,
    ) -> GridCoord {
        let bearing = (pose.heading_deg + direction.bearing_offset_deg()).to_radians();
        let distance_m = distance_cm / 100.0;
        GridCoord::from_world(
            pose.x + distance_m * bearing.cos(),
            pose.y + distance_m * bearing.sin(),
            self.config.grid.cell_size_m,
            self.config.grid.width,
            self.config.grid.height,
        )
    }

    fn decide_returning(
        &mut self,
        analysis: &DistanceAnalysis,
        pose: Pose,
        cell: GridCoord,
    ) -> PrimitiveAction {
        if cell == self.start_cell {
            self.state = NavState::Stopped;
            info!("Reached start cell {:?}, exploration complete", cell);
            return self.record(
                PrimitiveAction::Stop,
                "arrived at start cell".to_string(),
                pose,
                analysis,
                false,
            );
        }

        // Greedy bearing chase; obstacles en route still trigger the
        // emergency rule above.
        let dx = self.start_pose.x - pose.x;
        let dy = self.start_pose.y - pose.y;
        let bearing = dy.atan2(dx).to_degrees();
        let delta = turn_delta_deg(pose.heading_deg, bearing);

        let (action, reason) = if delta.abs() > self.config.motion.smooth_turn_deg {
            let action = if delta > 0.0 {
                PrimitiveAction::TurnLeft
            } else {
                PrimitiveAction::TurnRight
            };
            (action, format!("returning: aligning to bearing {:.0}", bearing))
        } else {
            (
                PrimitiveAction::MoveForward,
                "returning: tracking start bearing".to_string(),
            )
        };
        self.record(action, reason, pose, analysis, false)
    }

    fn decide_exploring(
        &mut self,
        analysis: &DistanceAnalysis,
        pose: Pose,
        cell: GridCoord,
    ) -> PrimitiveAction {
        if self.ledger.is_overvisited(cell) {
            if let Some(heading) = self
                .ledger
                .least_visited_neighbor(cell, &CARDINAL_HEADINGS)
            {
                // Strictly positive delta turns left; zero and negative
                // turn right.
                let delta = turn_delta_deg(pose.heading_deg, heading);
                let action = if delta > 0.0 {
                    PrimitiveAction::TurnLeft
                } else {
                    PrimitiveAction::TurnRight
                };
                debug!(
                    "Cell {:?} overvisited, redirecting toward heading {:.0}",
                    cell, heading
                );
                return self.record(
                    action,
                    format!("cell overvisited, redirecting toward {:.0} deg", heading),
                    pose,
                    analysis,
                    false,
                );
            }
        }

        let reason = match analysis.recommended {
            PrimitiveAction::Stop => "nothing resolved, holding".to_string(),
            PrimitiveAction::MoveForward => "path clear".to_string(),
            _ => format!(
                "obstacle at {:.1} cm, steering away",
                analysis.closest_cm
            ),
        };
        self.record(analysis.recommended, reason, pose, analysis, false)
    }

    fn record(
        &self,
        action: PrimitiveAction,
        reason: String,
        pose: Pose,
        analysis: &DistanceAnalysis,
        obstacle: bool,
    ) -> PrimitiveAction {
        let distance_cm = if analysis.closest_cm.is_finite() {
            analysis.closest_cm
        } else {
            UNMEASURED_DISTANCE_CM
        };
        self.recorder.append(MovementRecord {
            timestamp_us: now_us(),
            action,
            reason,
            pose,
            distance_cm,
            obstacle,
        });
        action
    }

    /// Resume exploration after an avoidance hold. No effect in other
    /// states.
    pub fn resume(&mut self) {
        if self.state == NavState::Avoiding {
            info!("Resuming exploration after avoidance hold");
            self.state = NavState::Exploring;
        }
    }

    /// Enter the terminal stopped state.
    pub fn halt(&mut self) {
        if self.state != NavState::Stopped {
            info!("Navigation halted (was {})", self.state.as_str());
            self.state = NavState::Stopped;
        }
    }

    /// Switch to returning to the start cell.
    pub fn request_return(&mut self) {
        if self.state.is_active() {
            info!("Return to start requested from {:?}", self.start_cell);
            self.state = NavState::Returning;
        }
    }

    /// Actuator failure: the hardware state is unknown, so the only safe
    /// assumption is that the robot is no longer moving.
    pub fn fail_actuator(&mut self) {
        warn!("Actuator failure, entering stopped state");
        self.state = NavState::Stopped;
    }

    /// Restart from a fresh pose: exploring state, zeroed counters.
    pub fn reinitialize(&mut self, start_pose: Pose) {
        self.start_pose = start_pose;
        self.start_cell = GridCoord::from_world(
            start_pose.x,
            start_pose.y,
            self.config.grid.cell_size_m,
            self.config.grid.width,
            self.config.grid.height,
        );
        self.state = NavState::Exploring;
        self.obstacles_avoided = 0;
    }
}
