//! The normalized raw input event model.
//!
//! The host (whatever owns the actual event loop and input surface) turns
//! its platform events into [`InputEvent`]s and feeds them to the
//! [`GestureDetector`](crate::GestureDetector). Touch and mouse input are
//! both represented so the detector can hide the device differences behind
//! one gesture vocabulary.

use smallvec::SmallVec;

use crate::sample::PointerSample;

/// Platform touch identifier, stable for the lifetime of one contact.
pub type TouchId = i32;

/// One touch contact: its identifier plus the sampled position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: TouchId,
    pub sample: PointerSample,
}

impl TouchPoint {
    pub fn new(id: TouchId, sample: PointerSample) -> Self {
        Self { id, sample }
    }
}

/// Touches currently on the surface. Two is the interesting case; more than
/// two rarely happens and never allocates more than once.
pub type ActiveTouches = SmallVec<[TouchPoint; 2]>;

/// A raw input event delivered by the host.
///
/// Touch events carry the changed touch plus the full set of touches still
/// on the surface; two-finger transforms need both current positions, not
/// just the one that moved.
///
/// `HoldTimeout` is fed back by the host when a hold timer requested via
/// [`TimerOp::Start`](crate::TimerOp) fires. The detector never reads a
/// clock of its own.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    TouchStart {
        changed: TouchPoint,
        active: ActiveTouches,
    },
    TouchMove {
        changed: TouchPoint,
        active: ActiveTouches,
    },
    TouchEnd {
        changed: TouchPoint,
        active: ActiveTouches,
    },
    MouseDown(PointerSample),
    MouseMove(PointerSample),
    MouseUp(PointerSample),
    HoldTimeout,
}

/// Splits a platform-level touch-end that reports several changed touches
/// into individual [`InputEvent::TouchEnd`]s.
///
/// Some engines deliver spurious extra changed touches on touchend
/// (Gecko bug 785554); the sequence is tolerated with a warning rather
/// than rejected.
pub fn split_touch_end(changed: &[TouchPoint], active: &ActiveTouches) -> Vec<InputEvent> {
    if changed.len() > 1 {
        log::warn!(
            "touchend reported {} changed touches, expected 1; processing each",
            changed.len()
        );
    }
    changed
        .iter()
        .map(|touch| InputEvent::TouchEnd {
            changed: *touch,
            active: active.clone(),
        })
        .collect()
}

/// Looks up a touch by identifier in an active-touch list.
pub(crate) fn identified(active: &ActiveTouches, id: TouchId) -> Option<&TouchPoint> {
    active.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_touch_end_produces_one_event_per_changed_touch() {
        let a = TouchPoint::new(1, PointerSample::at(0.0, 0.0, 0.0));
        let b = TouchPoint::new(2, PointerSample::at(5.0, 5.0, 0.0));
        let events = split_touch_end(&[a, b], &ActiveTouches::new());
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            InputEvent::TouchEnd { changed, .. } if changed.id == 1
        ));
        assert!(matches!(
            &events[1],
            InputEvent::TouchEnd { changed, .. } if changed.id == 2
        ));
    }
}
