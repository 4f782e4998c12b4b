//! Gradient-magnitude edge detection.
//!
//! A 3x3 Sobel operator over a vertical strip of the frame. For the
//! bounding-box-width distance heuristic only the presence of edges
//! matters, not their sub-pixel quality, so no thinning or hysteresis is
//! applied.

use super::Frame;

/// Binary edge map for one vertical strip of a frame.
///
/// Coordinates are strip-local: `(0, 0)` is the top-left pixel of the
/// strip. The one-pixel border is always non-edge (the Sobel kernel needs a
/// full neighborhood).
#[derive(Debug, Clone)]
pub struct EdgeMap {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl EdgeMap {
    /// Detect edges in the frame columns `[x_start, x_end)`.
    ///
    /// `threshold` is the gradient magnitude (|gx| + |gy|, range 0..~2040)
    /// above which a pixel counts as an edge. Degenerate strips (narrower
    /// or shorter than 3 pixels) produce an all-false map.
    pub fn from_strip(frame: &Frame, x_start: usize, x_end: usize, threshold: f32) -> Self {
        let x_end = x_end.min(frame.width());
        let width = x_end.saturating_sub(x_start);
        let height = frame.height();
        let mut data = vec![false; width * height];

        if width >= 3 && height >= 3 {
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    let fx = x_start + x;
                    let p = |dx: isize, dy: isize| -> i32 {
                        frame.get(
                            (fx as isize + dx) as usize,
                            (y as isize + dy) as usize,
                        ) as i32
                    };

                    let gx = -p(-1, -1) - 2 * p(-1, 0) - p(-1, 1)
                        + p(1, -1)
                        + 2 * p(1, 0)
                        + p(1, 1);
                    let gy = -p(-1, -1) - 2 * p(0, -1) - p(1, -1)
                        + p(-1, 1)
                        + 2 * p(0, 1)
                        + p(1, 1);

                    if (gx.abs() + gy.abs()) as f32 > threshold {
                        data[y * width + x] = true;
                    }
                }
            }
        }

        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_frame_has_no_edges() {
        let frame = Frame::filled(30, 30, 128);
        let edges = EdgeMap::from_strip(&frame, 0, 30, 100.0);
        for y in 0..30 {
            for x in 0..30 {
                assert!(!edges.is_edge(x, y));
            }
        }
    }

    #[test]
    fn test_bright_square_produces_edges() {
        let mut frame = Frame::filled(30, 30, 0);
        frame.fill_rect(10, 10, 10, 10, 220);
        let edges = EdgeMap::from_strip(&frame, 0, 30, 100.0);

        // The square boundary is an edge; its interior is not.
        assert!(edges.is_edge(10, 15));
        assert!(edges.is_edge(19, 15));
        assert!(!edges.is_edge(15, 15));
        assert!(!edges.is_edge(2, 2));
    }

    #[test]
    fn test_degenerate_strip_is_empty() {
        let frame = Frame::filled(30, 30, 255);
        let edges = EdgeMap::from_strip(&frame, 28, 30, 100.0);
        assert_eq!(edges.width(), 2);
        assert!(!edges.is_edge(0, 0));
        assert!(!edges.is_edge(1, 10));
    }
}
