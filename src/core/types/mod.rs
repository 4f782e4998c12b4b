//! Core value types shared across all layers.

mod action;
mod analysis;
mod grid;
mod movement;
mod pose;

pub use action::{PrimitiveAction, TurnStep};
pub use analysis::{DistanceAnalysis, StripDirection};
pub use grid::GridCoord;
pub use movement::MovementRecord;
pub use pose::Pose;
