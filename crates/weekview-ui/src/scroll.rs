//! Bounded horizontal scroll offset for the day row.

/// Horizontal scroll offset clamped to `[min, 0]`.
///
/// The week view scrolls by translating the day row left of its resting
/// position, so valid offsets are never positive and never further left
/// than the last materialized cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOffset {
    value: f64,
    min: f64,
}

impl ScrollOffset {
    pub fn new(min: f64, initial: f64) -> Self {
        Self {
            value: initial.clamp(min, 0.0),
            min,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    /// Applies a raw delta, clamping to the valid range. Returns the
    /// amount actually consumed.
    pub fn dispatch_raw_delta(&mut self, delta: f64) -> f64 {
        let target = (self.value + delta).clamp(self.min, 0.0);
        let consumed = target - self.value;
        self.value = target;
        consumed
    }

    /// Moves to `position`, clamped.
    pub fn set(&mut self, position: f64) {
        self.value = position.clamp(self.min, 0.0);
    }

    /// Snaps the offset to the nearest multiple of `cell_width` and
    /// returns the snapped value.
    pub fn snap_to_cell(&mut self, cell_width: f64) -> f64 {
        let snapped = (self.value / cell_width).round() * cell_width;
        self.set(snapped);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_clamps_at_both_bounds() {
        let mut offset = ScrollOffset::new(-580.0, -290.0);
        assert_eq!(offset.dispatch_raw_delta(1000.0), 290.0);
        assert_eq!(offset.value(), 0.0);
        assert_eq!(offset.dispatch_raw_delta(-10_000.0), -580.0);
        assert_eq!(offset.value(), -580.0);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let mut offset = ScrollOffset::new(-580.0, -123.0);
        offset.set(offset.value());
        assert_eq!(offset.value(), -123.0);
        offset.set(-9999.0);
        let clamped = offset.value();
        offset.set(clamped);
        assert_eq!(offset.value(), clamped);
    }

    #[test]
    fn test_snap_rounds_to_nearest_cell() {
        let mut offset = ScrollOffset::new(-580.0, -300.0);
        assert_eq!(offset.snap_to_cell(58.0), -290.0);
        offset.set(-30.0);
        assert_eq!(offset.snap_to_cell(58.0), -58.0);
        offset.set(-20.0);
        assert_eq!(offset.snap_to_cell(58.0), 0.0);
    }
}
