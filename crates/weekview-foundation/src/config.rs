//! Gesture recognition thresholds and tuning options.
//!
//! The pan thresholds are intentionally different for touch and mouse:
//! finger contact wobbles more than a mouse cursor, so touch gets a larger
//! dead zone before a pan starts.
//!
//! # DPI Considerations
//!
//! All values are in logical pixels. For very high-density touch screens,
//! consider scaling the thresholds by the device's DPI factor; the defaults
//! work well for typical desktop/mobile displays.

/// Movement beyond this distance (per axis) from the initial touch position
/// starts a pan and cancels tap/hold recognition.
pub const PAN_THRESHOLD: f64 = 20.0;

/// Pan threshold for mouse input. Smaller than the touch threshold because
/// a cursor has no contact-patch jitter.
pub const MOUSE_PAN_THRESHOLD: f64 = 15.0;

/// How long a contact must stay put before a hold starts, in milliseconds.
pub const HOLD_INTERVAL_MS: f64 = 1000.0;

/// Two taps within this distance (per axis) of each other can form a
/// double tap.
pub const DOUBLE_TAP_DISTANCE: f64 = 50.0;

/// Two taps within this interval of each other can form a double tap.
pub const DOUBLE_TAP_TIME_MS: f64 = 500.0;

/// Exponential smoothing factor for the pan velocity estimate:
/// `v' = v * alpha + v_instant * (1 - alpha)`.
pub const VELOCITY_SMOOTHING: f64 = 0.5;

/// Change in inter-finger distance that activates pinch scaling.
pub const SCALE_THRESHOLD: f64 = 20.0;

/// Change in inter-finger angle (degrees) that activates rotation.
pub const ROTATE_THRESHOLD: f64 = 22.5;

/// When a threshold is crossed, the recorded gesture start is moved this
/// fraction of the way toward the crossing sample so the first emitted
/// delta stays small instead of jumping by a whole threshold.
pub const THRESHOLD_SMOOTHING: f64 = 0.9;

/// Recognition options for a [`GestureDetector`](crate::GestureDetector).
///
/// All fields default to the constants above. `hold_events` is off by
/// default: arming a timer for every contact is wasted work for consumers
/// that never listen for holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    pub pan_threshold: f64,
    pub mouse_pan_threshold: f64,
    pub hold_interval_ms: f64,
    /// Whether hold gestures are recognized at all. When false, no hold
    /// timer is ever requested and holds are reported as taps or pans.
    pub hold_events: bool,
    pub double_tap_distance: f64,
    pub double_tap_time_ms: f64,
    pub velocity_smoothing: f64,
    pub scale_threshold: f64,
    pub rotate_threshold: f64,
    pub threshold_smoothing: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan_threshold: PAN_THRESHOLD,
            mouse_pan_threshold: MOUSE_PAN_THRESHOLD,
            hold_interval_ms: HOLD_INTERVAL_MS,
            hold_events: false,
            double_tap_distance: DOUBLE_TAP_DISTANCE,
            double_tap_time_ms: DOUBLE_TAP_TIME_MS,
            velocity_smoothing: VELOCITY_SMOOTHING,
            scale_threshold: SCALE_THRESHOLD,
            rotate_threshold: ROTATE_THRESHOLD,
            threshold_smoothing: THRESHOLD_SMOOTHING,
        }
    }
}

impl GestureConfig {
    /// Config with hold recognition enabled.
    pub fn with_hold_events() -> Self {
        Self {
            hold_events: true,
            ..Self::default()
        }
    }
}
