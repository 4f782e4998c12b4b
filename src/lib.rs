//! DrishtiNav: camera-only navigation and mapping for small ground robots.
//!
//! The pipeline each cycle: a [`vision::FrameAnalyzer`] turns a grayscale
//! frame into strip-wise obstacle distances, the [`engine::DecisionEngine`]
//! picks one primitive action, a dead-reckoning [`engine::PoseIntegrator`]
//! tracks where the robot believes it is, and the [`ledger::GridLedger`]
//! accumulates the visit/obstacle map. The [`exploration`] module runs this
//! loop on its own thread against pluggable camera and actuator seams.
//!
//! No wheel odometry, no range sensors, no SLAM: the pose estimate is
//! commanded motion integrated over time, and the map is only as good as
//! the monocular distance heuristic feeding it.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod exploration;
pub mod ledger;
pub mod utils;
pub mod vision;

pub use crate::config::NavConfig;
pub use crate::core::types::{
    DistanceAnalysis, GridCoord, MovementRecord, Pose, PrimitiveAction, StripDirection, TurnStep,
};
pub use crate::engine::{
    DecisionEngine, MovementRecorder, NavState, NavigationEngine, PoseIntegrator, Status,
};
pub use crate::error::{NavError, Result};
pub use crate::exploration::{Actuator, Camera, ExplorationHandle, ExplorationLoop};
pub use crate::ledger::{GridLedger, MapSnapshot};
pub use crate::vision::{Frame, FrameAnalyzer};
