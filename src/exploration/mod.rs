//! Autonomous exploration loop and its hardware seams.
//!
//! The loop runs on its own named thread at a fixed rate. Hardware enters
//! through two narrow traits: a [`Camera`] producing frames and an
//! [`Actuator`] executing primitive actions. Simulated implementations
//! live in [`sim`] so the full pipeline runs without a robot attached.

mod runner;
pub mod sim;

pub use runner::{ExplorationHandle, ExplorationLoop, EXPLORATION_THREAD_NAME};

use crate::core::types::PrimitiveAction;
use crate::error::Result;
use crate::vision::Frame;

/// Frame source for the exploration loop.
///
/// `None` means no frame was available this cycle; the analyzer treats
/// that as unsafe, so a flaky camera degrades to caution, not motion.
pub trait Camera: Send {
    fn capture_frame(&mut self) -> Option<Frame>;
}

/// Motor command sink.
///
/// An `Err` means the hardware state is unknown; the loop responds by
/// stopping navigation entirely.
pub trait Actuator: Send {
    fn execute(&mut self, action: PrimitiveAction) -> Result<()>;
}
