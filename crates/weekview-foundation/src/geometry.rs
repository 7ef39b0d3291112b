//! Minimal 2D geometry used by gesture recognition.

use std::ops::Sub;

/// A point in screen or client coordinates. DOM-level events report
/// coordinates as doubles, so this is `f64` throughout.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of the segment from `self` to `other`, in degrees.
    /// Positive y points down (screen coordinates), so 90 degrees is "down".
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Component-wise midpoint, floored to whole pixels.
    pub fn midpoint_floored(self, other: Point) -> Point {
        Point {
            x: ((self.x + other.x) / 2.0).floor(),
            y: ((self.y + other.y) / 2.0).floor(),
        }
    }

    /// Moves `self` toward `target` by `factor` (0..=1), floored to whole
    /// pixels.
    pub fn lerp_floored(self, target: Point, factor: f64) -> Point {
        Point {
            x: (self.x + factor * (target.x - self.x)).floor(),
            y: (self.y + factor * (target.y - self.y)).floor(),
        }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Signed difference between two angles in degrees, normalized to
/// (-180, 180]. Used for pinch-rotate deltas so that crossing the
/// +/-180 boundary does not produce a full-turn jump.
pub fn angle_difference(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_angle_down_is_positive() {
        let angle = Point::ZERO.angle_to(Point::new(0.0, 10.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_floors() {
        let mid = Point::new(0.0, 0.0).midpoint_floored(Point::new(3.0, 5.0));
        assert_eq!(mid, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert_eq!(angle_difference(170.0, -170.0), 20.0);
        assert_eq!(angle_difference(-170.0, 170.0), -20.0);
        assert_eq!(angle_difference(0.0, 180.0), 180.0);
        assert_eq!(angle_difference(0.0, -180.0), 180.0);
    }
}
