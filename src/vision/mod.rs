//! Monocular frame analysis: edge detection, contour extraction and
//! heuristic distance estimation.

mod analyzer;
mod contour;
mod edges;
mod frame;

pub use analyzer::FrameAnalyzer;
pub use contour::{largest_contour_bbox, BoundingBox};
pub use edges::EdgeMap;
pub use frame::Frame;
