//! Primitive motor actions.

use serde::{Deserialize, Serialize};

/// Atomic motor command emitted by the decision engine.
///
/// These are abstract symbols: the hardware transport that turns them into
/// wheel commands lives outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveAction {
    MoveForward,
    MoveBackward,
    TurnLeft,
    TurnRight,
    Stop,
}

impl PrimitiveAction {
    /// Wire symbol for the external actuator protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveAction::MoveForward => "MOVE_FORWARD",
            PrimitiveAction::MoveBackward => "MOVE_BACKWARD",
            PrimitiveAction::TurnLeft => "TURN_LEFT",
            PrimitiveAction::TurnRight => "TURN_RIGHT",
            PrimitiveAction::Stop => "STOP",
        }
    }

    /// Whether this action rotates in place.
    pub fn is_turn(&self) -> bool {
        matches!(self, PrimitiveAction::TurnLeft | PrimitiveAction::TurnRight)
    }
}

/// Turn magnitude selector for the pose integrator.
///
/// Sharp turns are the default avoidance maneuver; smooth turns are the
/// smaller heading correction used while tracking a bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnStep {
    #[default]
    Sharp,
    Smooth,
}
