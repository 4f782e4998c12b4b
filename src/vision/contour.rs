//! Connected-component extraction over an edge map.

use super::EdgeMap;

/// Axis-aligned bounding box of a contour, strip-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Number of edge pixels in the component.
    pub area: usize,
}

/// Find the largest connected edge component (8-connectivity) and return
/// its bounding box, or `None` when the map holds no edges.
///
/// "Largest" means most edge pixels, not largest bounding box.
pub fn largest_contour_bbox(edges: &EdgeMap) -> Option<BoundingBox> {
    let width = edges.width();
    let height = edges.height();
    if width == 0 || height == 0 {
        return None;
    }

    let mut visited = vec![false; width * height];
    let mut best: Option<BoundingBox> = None;
    let mut stack = Vec::new();

    for start_y in 0..height {
        for start_x in 0..width {
            if visited[start_y * width + start_x] || !edges.is_edge(start_x, start_y) {
                continue;
            }

            // Flood fill one component, tracking extent and pixel count.
            let (mut min_x, mut max_x) = (start_x, start_x);
            let (mut min_y, mut max_y) = (start_y, start_y);
            let mut area = 0usize;

            visited[start_y * width + start_x] = true;
            stack.push((start_x, start_y));

            while let Some((x, y)) = stack.pop() {
                area += 1;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        if !visited[ny * width + nx] && edges.is_edge(nx, ny) {
                            visited[ny * width + nx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }

            let bbox = BoundingBox {
                x: min_x,
                y: min_y,
                width: max_x - min_x + 1,
                height: max_y - min_y + 1,
                area,
            };

            if best.map_or(true, |b| area > b.area) {
                best = Some(bbox);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::Frame;

    #[test]
    fn test_empty_map_has_no_contour() {
        let frame = Frame::filled(20, 20, 100);
        let edges = EdgeMap::from_strip(&frame, 0, 20, 100.0);
        assert!(largest_contour_bbox(&edges).is_none());
    }

    #[test]
    fn test_single_square_bbox() {
        let mut frame = Frame::filled(40, 40, 0);
        frame.fill_rect(8, 8, 12, 12, 220);
        let edges = EdgeMap::from_strip(&frame, 0, 40, 100.0);

        let bbox = largest_contour_bbox(&edges).unwrap();
        // The Sobel response straddles the intensity step, so the box is
        // the square plus at most one pixel on each side.
        assert!(bbox.width >= 12 && bbox.width <= 14, "width={}", bbox.width);
        assert!(bbox.height >= 12 && bbox.height <= 14);
        assert!(bbox.x >= 7 && bbox.x <= 8);
    }

    #[test]
    fn test_largest_of_two_wins() {
        let mut frame = Frame::filled(60, 30, 0);
        frame.fill_rect(4, 4, 5, 5, 220);
        frame.fill_rect(30, 5, 18, 18, 220);
        let edges = EdgeMap::from_strip(&frame, 0, 60, 100.0);

        let bbox = largest_contour_bbox(&edges).unwrap();
        assert!(bbox.x >= 29, "expected the big square, got x={}", bbox.x);
        assert!(bbox.width >= 18);
    }
}
