//! Semantic gesture events emitted by the detector.

use crate::sample::PointerSample;

/// A displacement in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    pub fn between(from: &PointerSample, to: &PointerSample) -> Self {
        Self {
            dx: to.screen.x - from.screen.x,
            dy: to.screen.y - from.screen.y,
        }
    }
}

/// Payload of `Pan` and `HoldMove`: displacement from the gesture start
/// (`absolute`), from the previous sample (`relative`), and the current
/// position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanDetail {
    pub absolute: Delta,
    pub relative: Delta,
    pub position: PointerSample,
}

/// Dominant direction of a swipe: the release angle classified into
/// quadrants centered on the four screen axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Classifies an angle in degrees, normalized to `[0, 360)`, where 0
    /// points right and 90 points down (screen coordinates).
    pub fn from_angle(angle: f64) -> Self {
        if !(45.0..315.0).contains(&angle) {
            SwipeDirection::Right
        } else if angle < 135.0 {
            SwipeDirection::Down
        } else if angle < 225.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Up
        }
    }
}

/// Payload of `Swipe`: total displacement, duration, smoothed velocity and
/// classified direction of a completed pan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeDetail {
    pub start: PointerSample,
    pub end: PointerSample,
    pub dx: f64,
    pub dy: f64,
    pub dt_ms: f64,
    /// Smoothed velocity in px/ms. Zero when the gesture had no
    /// measurable movement interval.
    pub vx: f64,
    pub vy: f64,
    pub direction: SwipeDirection,
    /// Release angle in degrees, `[0, 360)`.
    pub angle: f64,
}

/// Payload of `HoldEnd`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoldEndDetail {
    pub start: PointerSample,
    pub end: PointerSample,
    pub dx: f64,
    pub dy: f64,
}

/// Scale factor and rotation (degrees) of a two-finger transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleRotate {
    pub scale: f64,
    pub rotate: f64,
}

impl ScaleRotate {
    pub const IDENTITY: ScaleRotate = ScaleRotate {
        scale: 1.0,
        rotate: 0.0,
    };
}

/// Payload of `Transform` and `TransformEnd`: change since the transform
/// start (`absolute`), since the previous move (`relative`), and the
/// current inter-finger midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDetail {
    pub absolute: ScaleRotate,
    pub relative: ScaleRotate,
    pub midpoint: PointerSample,
}

/// A recognized gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// Contact released before moving past the pan threshold. Carries the
    /// initial sample.
    Tap(PointerSample),
    /// Emitted right after the second `Tap` of a double tap.
    DoubleTap(PointerSample),
    HoldStart(PointerSample),
    HoldMove(PanDetail),
    HoldEnd(HoldEndDetail),
    Pan(PanDetail),
    Swipe(SwipeDetail),
    Transform(TransformDetail),
    TransformEnd(TransformDetail),
}
