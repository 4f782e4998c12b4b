//! Core foundation: types and math primitives (no internal deps).

pub mod math;
pub mod types;
