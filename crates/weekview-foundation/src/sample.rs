//! Immutable pointer snapshots.

use crate::geometry::Point;

/// An immutable snapshot of one pointer position at a discrete input event.
///
/// Screen and client coordinates are both kept because consumers care about
/// different spaces: gesture thresholds and deltas are computed in screen
/// coordinates, while hit-testing by the rendering layer wants client
/// coordinates. The timestamp is in milliseconds on the host's event clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub screen: Point,
    pub client: Point,
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn new(screen: Point, client: Point, timestamp_ms: f64) -> Self {
        Self {
            screen,
            client,
            timestamp_ms,
        }
    }

    /// Builds a sample with identical screen and client coordinates.
    /// Convenient for tests and synthetic event traces.
    pub fn at(x: f64, y: f64, timestamp_ms: f64) -> Self {
        let p = Point::new(x, y);
        Self::new(p, p, timestamp_ms)
    }

    /// Euclidean distance to `other` in screen coordinates.
    pub fn distance_to(&self, other: &PointerSample) -> f64 {
        self.screen.distance_to(other.screen)
    }

    /// Angle to `other` in degrees, screen coordinates.
    pub fn angle_to(&self, other: &PointerSample) -> f64 {
        self.screen.angle_to(other.screen)
    }

    /// Floored midpoint between two samples, stamped with `timestamp_ms`.
    /// Used as the reported position of a two-finger transform.
    pub fn midpoint(&self, other: &PointerSample, timestamp_ms: f64) -> PointerSample {
        PointerSample {
            screen: self.screen.midpoint_floored(other.screen),
            client: self.client.midpoint_floored(other.client),
            timestamp_ms,
        }
    }

    /// Moves every component of the sample (including the timestamp) toward
    /// `target` by `factor`, flooring the results.
    ///
    /// When a pan or transform threshold is crossed, the gesture start is
    /// smoothed most of the way toward the crossing sample so the first
    /// emitted delta does not jump by a full threshold.
    pub fn lerp_toward(&self, target: &PointerSample, factor: f64) -> PointerSample {
        PointerSample {
            screen: self.screen.lerp_floored(target.screen, factor),
            client: self.client.lerp_floored(target.client, factor),
            timestamp_ms: (self.timestamp_ms + factor * (target.timestamp_ms - self.timestamp_ms))
                .floor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_toward_moves_most_of_the_way() {
        let start = PointerSample::at(0.0, 0.0, 0.0);
        let crossing = PointerSample::at(20.0, 0.0, 100.0);
        let smoothed = start.lerp_toward(&crossing, 0.9);
        assert_eq!(smoothed.screen.x, 18.0);
        assert_eq!(smoothed.screen.y, 0.0);
        assert_eq!(smoothed.timestamp_ms, 90.0);
    }

    #[test]
    fn test_midpoint_uses_given_timestamp() {
        let a = PointerSample::at(0.0, 0.0, 1.0);
        let b = PointerSample::at(10.0, 20.0, 2.0);
        let mid = a.midpoint(&b, 3.0);
        assert_eq!(mid.screen, Point::new(5.0, 10.0));
        assert_eq!(mid.timestamp_ms, 3.0);
    }
}
