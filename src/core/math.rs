//! Angular arithmetic in degrees.
//!
//! Headings use the math convention: 0° = east, 90° = north,
//! counterclockwise positive, normalized to [0, 360).

/// Normalize a heading to [0, 360).
#[inline]
pub fn normalize_deg(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Signed minimal turn from `current` to `target`, in degrees.
///
/// Computed as `((target - current + 540) mod 360) - 180`; the result is in
/// `[-180, 180)`. Positive means a left (counterclockwise) turn.
#[inline]
pub fn turn_delta_deg(current: f32, target: f32) -> f32 {
    (target - current + 540.0).rem_euclid(360.0) - 180.0
}

/// Unit grid step for a heading: `(round(cos), round(sin))`.
///
/// Exact for cardinal headings, which is all the decision engine uses.
#[inline]
pub fn heading_to_unit_step(heading_deg: f32) -> (i32, i32) {
    let rad = heading_deg.to_radians();
    (rad.cos().round() as i32, rad.sin().round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_deg_wraps() {
        assert_relative_eq!(normalize_deg(0.0), 0.0);
        assert_relative_eq!(normalize_deg(360.0), 0.0);
        assert_relative_eq!(normalize_deg(450.0), 90.0);
        assert_relative_eq!(normalize_deg(-90.0), 270.0);
        assert_relative_eq!(normalize_deg(-720.0), 0.0);
    }

    #[test]
    fn test_turn_delta_shortest_path() {
        assert_relative_eq!(turn_delta_deg(0.0, 90.0), 90.0);
        assert_relative_eq!(turn_delta_deg(90.0, 0.0), -90.0);
        assert_relative_eq!(turn_delta_deg(350.0, 10.0), 20.0);
        assert_relative_eq!(turn_delta_deg(10.0, 350.0), -20.0);
        assert_relative_eq!(turn_delta_deg(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_turn_delta_opposite_heading() {
        // Exactly opposite headings resolve to -180 under this formula.
        assert_relative_eq!(turn_delta_deg(0.0, 180.0), -180.0);
    }

    #[test]
    fn test_heading_to_unit_step_cardinals() {
        assert_eq!(heading_to_unit_step(0.0), (1, 0));
        assert_eq!(heading_to_unit_step(90.0), (0, 1));
        assert_eq!(heading_to_unit_step(180.0), (-1, 0));
        assert_eq!(heading_to_unit_step(270.0), (0, -1));
    }
}
