//! The gesture recognition state machine.
//!
//! Raw [`InputEvent`]s go in, semantic [`GestureEvent`]s come out. The
//! machine is a tagged-union [`State`] threaded through a pure
//! [`transition`] function, so every recognition rule is unit-testable
//! without an input surface or an event loop. [`GestureDetector`] is the
//! owned instance wrapper around it: one detector per input surface, no
//! ambient globals.
//!
//! Timing is inverted as well: the detector never reads a clock. When a
//! hold timer is needed the returned [`Output`] asks the host to arm one,
//! and the host feeds back [`InputEvent::HoldTimeout`] when it fires.

use smallvec::{smallvec, SmallVec};

use crate::config::GestureConfig;
use crate::events::{
    Delta, GestureEvent, HoldEndDetail, PanDetail, ScaleRotate, SwipeDetail, SwipeDirection,
    TransformDetail,
};
use crate::geometry::angle_difference;
use crate::input::{identified, ActiveTouches, InputEvent, TouchId, TouchPoint};
use crate::sample::PointerSample;

/// Which device owns the current gesture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Mouse,
    Touch(TouchId),
}

/// Single-contact session: the originating contact plus the initial and
/// most recent samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Session {
    pub contact: Contact,
    pub start: PointerSample,
    pub last: PointerSample,
}

/// Pan session: a [`Session`] plus the exponentially smoothed velocity
/// estimate, seeded lazily from the first measurable movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSession {
    pub contact: Contact,
    pub start: PointerSample,
    pub last: PointerSample,
    pub velocity: Option<(f64, f64)>,
}

/// Two-finger session: both touch ids, the starting and latest
/// inter-finger distance and angle, and whether the scale/rotation
/// thresholds have been crossed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSession {
    pub touch1: TouchId,
    pub touch2: TouchId,
    pub start_distance: f64,
    pub last_distance: f64,
    pub start_angle: f64,
    pub last_angle: f64,
    pub scaled: bool,
    pub rotated: bool,
    pub last_midpoint: PointerSample,
}

/// The recognition state. One active gesture session at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum State {
    /// Waiting for first contact.
    Idle,
    /// One contact down, nothing decided yet: may become a tap, a hold,
    /// a pan, or a two-finger transform.
    SingleContact(Session),
    /// Hold timer fired; emitting hold events until release.
    Holding(Session),
    /// Movement passed the pan threshold; emitting pans until release.
    Panning(PanSession),
    /// Two fingers down; emitting transforms once a threshold is crossed.
    MultiContact(TransformSession),
    /// One finger of a transform lifted. A new second finger re-enters
    /// the transform; releasing the survivor returns to idle.
    AfterTransform { touch: TouchId },
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::SingleContact(_) => "single-contact",
            State::Holding(_) => "holding",
            State::Panning(_) => "panning",
            State::MultiContact(_) => "multi-contact",
            State::AfterTransform { .. } => "after-transform",
        }
    }
}

/// Hold-timer request accompanying a transition.
///
/// The host owns the actual timer; `Start` arms it for the given number of
/// milliseconds, `Clear` cancels a previously armed one. Timer ops are only
/// produced when [`GestureConfig::hold_events`] is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerOp {
    None,
    Start(f64),
    Clear,
}

/// Result of one transition: emitted gestures (in order) and the timer
/// request.
#[derive(Clone, Debug, PartialEq)]
pub struct Output {
    pub events: SmallVec<[GestureEvent; 2]>,
    pub timer: TimerOp,
}

impl Output {
    fn none() -> Self {
        Self {
            events: SmallVec::new(),
            timer: TimerOp::None,
        }
    }

    fn emit(events: SmallVec<[GestureEvent; 2]>) -> Self {
        Self {
            events,
            timer: TimerOp::None,
        }
    }

    fn with_timer(mut self, timer: TimerOp) -> Self {
        self.timer = timer;
        self
    }
}

/// Gesture detector instance: recognition state, configuration, and the
/// remembered previous tap (which outlives a single session so double taps
/// can span two of them).
#[derive(Clone, Debug)]
pub struct GestureDetector {
    config: GestureConfig,
    state: State,
    last_tap: Option<PointerSample>,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            last_tap: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Feeds one input event through the transition function.
    pub fn handle(&mut self, event: &InputEvent) -> Output {
        let state = std::mem::replace(&mut self.state, State::Idle);
        let (next, output) = transition(state, event, &self.config, &mut self.last_tap);
        self.state = next;
        output
    }

    /// Drops any in-flight session and the remembered tap. The host calls
    /// this when detection stops (listeners detached).
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.last_tap = None;
    }
}

/// The pure transition function: `(state, event) -> (state, output)`.
pub fn transition(
    state: State,
    event: &InputEvent,
    cfg: &GestureConfig,
    last_tap: &mut Option<PointerSample>,
) -> (State, Output) {
    match state {
        State::Idle => on_idle(event, cfg),
        State::SingleContact(session) => on_single_contact(session, event, cfg, last_tap),
        State::Holding(session) => on_holding(session, event),
        State::Panning(pan) => on_panning(pan, event, cfg),
        State::MultiContact(session) => on_multi_contact(session, event, cfg),
        State::AfterTransform { touch } => on_after_transform(touch, event),
    }
}

fn on_idle(event: &InputEvent, cfg: &GestureConfig) -> (State, Output) {
    let session = match event {
        InputEvent::TouchStart { changed, .. } => Session {
            contact: Contact::Touch(changed.id),
            start: changed.sample,
            last: changed.sample,
        },
        InputEvent::MouseDown(sample) => Session {
            contact: Contact::Mouse,
            start: *sample,
            last: *sample,
        },
        _ => return (State::Idle, Output::none()),
    };

    let timer = if cfg.hold_events {
        TimerOp::Start(cfg.hold_interval_ms)
    } else {
        TimerOp::None
    };
    (State::SingleContact(session), Output::none().with_timer(timer))
}

fn on_single_contact(
    session: Session,
    event: &InputEvent,
    cfg: &GestureConfig,
    last_tap: &mut Option<PointerSample>,
) -> (State, Output) {
    // Second finger: the session becomes a two-finger transform.
    if let (Contact::Touch(touch1), InputEvent::TouchStart { changed, active }) =
        (session.contact, event)
    {
        return match begin_transform(touch1, changed.id, active, changed.sample.timestamp_ms) {
            Some(transform) => (
                State::MultiContact(transform),
                Output::none().with_timer(clear_timer(cfg)),
            ),
            None => (State::Idle, Output::none().with_timer(clear_timer(cfg))),
        };
    }

    if let Some(current) = move_sample(session.contact, event) {
        let threshold = match session.contact {
            Contact::Touch(_) => cfg.pan_threshold,
            Contact::Mouse => cfg.mouse_pan_threshold,
        };
        let dx = (current.screen.x - session.start.screen.x).abs();
        let dy = (current.screen.y - session.start.screen.y).abs();
        if dx > threshold || dy > threshold {
            let (state, mut output) = begin_pan(session, current, cfg);
            output.timer = clear_timer(cfg);
            return (state, output);
        }
        return (State::SingleContact(session), Output::none());
    }

    if let Some(end) = end_sample(session.contact, event) {
        let mut events: SmallVec<[GestureEvent; 2]> = smallvec![GestureEvent::Tap(session.start)];
        match last_tap.take() {
            Some(previous) if is_double_tap(&previous, &session.start, cfg) => {
                events.push(GestureEvent::DoubleTap(session.start));
            }
            _ => *last_tap = Some(end),
        }
        return (State::Idle, Output::emit(events).with_timer(clear_timer(cfg)));
    }

    if matches!(event, InputEvent::HoldTimeout) && cfg.hold_events {
        return (
            State::Holding(session),
            Output::emit(smallvec![GestureEvent::HoldStart(session.start)]),
        );
    }

    (State::SingleContact(session), Output::none())
}

fn on_holding(mut session: Session, event: &InputEvent) -> (State, Output) {
    if let Some(current) = move_sample(session.contact, event) {
        let detail = PanDetail {
            absolute: Delta::between(&session.start, &current),
            relative: Delta::between(&session.last, &current),
            position: current,
        };
        session.last = current;
        return (
            State::Holding(session),
            Output::emit(smallvec![GestureEvent::HoldMove(detail)]),
        );
    }

    if let Some(end) = end_sample(session.contact, event) {
        let detail = HoldEndDetail {
            start: session.start,
            end,
            dx: end.screen.x - session.start.screen.x,
            dy: end.screen.y - session.start.screen.y,
        };
        return (
            State::Idle,
            Output::emit(smallvec![GestureEvent::HoldEnd(detail)]),
        );
    }

    (State::Holding(session), Output::none())
}

fn on_panning(mut pan: PanSession, event: &InputEvent, cfg: &GestureConfig) -> (State, Output) {
    if let Some(current) = move_sample(pan.contact, event) {
        let detail = pan_step(&mut pan, current, cfg);
        return (
            State::Panning(pan),
            Output::emit(smallvec![GestureEvent::Pan(detail)]),
        );
    }

    if let Some(end) = end_sample(pan.contact, event) {
        let dx = end.screen.x - pan.start.screen.x;
        let dy = end.screen.y - pan.start.screen.y;
        let mut angle = dy.atan2(dx).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        let (vx, vy) = pan.velocity.unwrap_or((0.0, 0.0));
        let detail = SwipeDetail {
            start: pan.start,
            end,
            dx,
            dy,
            dt_ms: end.timestamp_ms - pan.start.timestamp_ms,
            vx,
            vy,
            direction: SwipeDirection::from_angle(angle),
            angle,
        };
        return (
            State::Idle,
            Output::emit(smallvec![GestureEvent::Swipe(detail)]),
        );
    }

    (State::Panning(pan), Output::none())
}

fn on_multi_contact(
    mut session: TransformSession,
    event: &InputEvent,
    cfg: &GestureConfig,
) -> (State, Output) {
    match event {
        InputEvent::TouchMove { changed, active }
            if changed.id == session.touch1 || changed.id == session.touch2 =>
        {
            let (touch1, touch2) = match (
                identified(active, session.touch1),
                identified(active, session.touch2),
            ) {
                (Some(a), Some(b)) => (*a, *b),
                _ => {
                    log::warn!(
                        "two-finger move without both tracked touches active; resetting to idle"
                    );
                    return (State::Idle, Output::none());
                }
            };

            let midpoint = touch1
                .sample
                .midpoint(&touch2.sample, changed.sample.timestamp_ms);
            let mut distance = touch1.sample.distance_to(&touch2.sample);
            let mut angle = touch1.sample.angle_to(&touch2.sample);
            let rotation = angle_difference(session.start_angle, angle);

            if !session.scaled {
                if (distance - session.start_distance).abs() > cfg.scale_threshold {
                    session.scaled = true;
                    // Smooth the recorded start toward the boundary so the
                    // first emitted scale stays close to 1.
                    let smoothed = (session.start_distance
                        + cfg.threshold_smoothing * (distance - session.start_distance))
                        .floor();
                    session.start_distance = smoothed;
                    session.last_distance = smoothed;
                } else {
                    distance = session.start_distance;
                }
            }
            if !session.rotated {
                if rotation.abs() > cfg.rotate_threshold {
                    session.rotated = true;
                } else {
                    angle = session.start_angle;
                }
            }

            if session.scaled || session.rotated {
                let detail = TransformDetail {
                    absolute: ScaleRotate {
                        scale: ratio(distance, session.start_distance),
                        rotate: angle_difference(session.start_angle, angle),
                    },
                    relative: ScaleRotate {
                        scale: ratio(distance, session.last_distance),
                        rotate: angle_difference(session.last_angle, angle),
                    },
                    midpoint,
                };
                session.last_distance = distance;
                session.last_angle = angle;
                session.last_midpoint = midpoint;
                return (
                    State::MultiContact(session),
                    Output::emit(smallvec![GestureEvent::Transform(detail)]),
                );
            }

            (State::MultiContact(session), Output::none())
        }
        InputEvent::TouchEnd { changed, .. } => {
            let survivor = if changed.id == session.touch2 {
                session.touch1
            } else if changed.id == session.touch1 {
                session.touch2
            } else {
                return (State::MultiContact(session), Output::none());
            };

            if session.scaled || session.rotated {
                let detail = TransformDetail {
                    absolute: ScaleRotate {
                        scale: ratio(session.last_distance, session.start_distance),
                        rotate: angle_difference(session.start_angle, session.last_angle),
                    },
                    relative: ScaleRotate::IDENTITY,
                    midpoint: session.last_midpoint,
                };
                (
                    State::AfterTransform { touch: survivor },
                    Output::emit(smallvec![GestureEvent::TransformEnd(detail)]),
                )
            } else {
                // Neither threshold was crossed; the two-finger contact
                // amounted to nothing.
                (State::Idle, Output::none())
            }
        }
        _ => (State::MultiContact(session), Output::none()),
    }
}

fn on_after_transform(touch: TouchId, event: &InputEvent) -> (State, Output) {
    match event {
        InputEvent::TouchStart { changed, active } => {
            match begin_transform(touch, changed.id, active, changed.sample.timestamp_ms) {
                Some(transform) => (State::MultiContact(transform), Output::none()),
                None => (State::Idle, Output::none()),
            }
        }
        InputEvent::TouchEnd { changed, .. } if changed.id == touch => {
            (State::Idle, Output::none())
        }
        _ => (State::AfterTransform { touch }, Output::none()),
    }
}

/// Builds a two-finger session from the active-touch list. Returns `None`
/// (with a warning) when the list does not contain both ids, which means
/// the host delivered an inconsistent sequence.
fn begin_transform(
    touch1: TouchId,
    touch2: TouchId,
    active: &ActiveTouches,
    timestamp_ms: f64,
) -> Option<TransformSession> {
    let (a, b) = match (identified(active, touch1), identified(active, touch2)) {
        (Some(a), Some(b)) => (*a, *b),
        _ => {
            log::warn!(
                "touchstart for transform without both touches active ({touch1}, {touch2}); \
                 resetting to idle"
            );
            return None;
        }
    };

    let distance = a.sample.distance_to(&b.sample);
    let angle = a.sample.angle_to(&b.sample);
    Some(TransformSession {
        touch1,
        touch2,
        start_distance: distance,
        last_distance: distance,
        start_angle: angle,
        last_angle: angle,
        scaled: false,
        rotated: false,
        last_midpoint: a.sample.midpoint(&b.sample, timestamp_ms),
    })
}

/// Enters the panning state: the start is smoothed toward the sample that
/// crossed the threshold, and that sample is immediately processed as the
/// first pan movement.
fn begin_pan(session: Session, current: PointerSample, cfg: &GestureConfig) -> (State, Output) {
    let smoothed = session.start.lerp_toward(&current, cfg.threshold_smoothing);
    let mut pan = PanSession {
        contact: session.contact,
        start: smoothed,
        last: smoothed,
        velocity: None,
    };
    let detail = pan_step(&mut pan, current, cfg);
    (
        State::Panning(pan),
        Output::emit(smallvec![GestureEvent::Pan(detail)]),
    )
}

/// Processes one pan movement: computes deltas, updates the smoothed
/// velocity, and advances `last`.
fn pan_step(pan: &mut PanSession, current: PointerSample, cfg: &GestureConfig) -> PanDetail {
    let detail = PanDetail {
        absolute: Delta::between(&pan.start, &current),
        relative: Delta::between(&pan.last, &current),
        position: current,
    };

    let dt = current.timestamp_ms - pan.last.timestamp_ms;
    if dt > 0.0 {
        let vx_inst = (current.screen.x - pan.last.screen.x) / dt;
        let vy_inst = (current.screen.y - pan.last.screen.y) / dt;
        let alpha = cfg.velocity_smoothing;
        pan.velocity = Some(match pan.velocity {
            None => (vx_inst, vy_inst),
            Some((vx, vy)) => (
                vx * alpha + vx_inst * (1.0 - alpha),
                vy * alpha + vy_inst * (1.0 - alpha),
            ),
        });
    }

    pan.last = current;
    detail
}

fn move_sample(contact: Contact, event: &InputEvent) -> Option<PointerSample> {
    match (contact, event) {
        (Contact::Touch(id), InputEvent::TouchMove { changed, .. }) if changed.id == id => {
            Some(changed.sample)
        }
        (Contact::Mouse, InputEvent::MouseMove(sample)) => Some(*sample),
        _ => None,
    }
}

fn end_sample(contact: Contact, event: &InputEvent) -> Option<PointerSample> {
    match (contact, event) {
        (Contact::Touch(id), InputEvent::TouchEnd { changed, .. }) if changed.id == id => {
            Some(changed.sample)
        }
        (Contact::Mouse, InputEvent::MouseUp(sample)) => Some(*sample),
        _ => None,
    }
}

/// Per-axis distance and time window check between a previous tap's
/// release and the next tap's start.
fn is_double_tap(previous: &PointerSample, start: &PointerSample, cfg: &GestureConfig) -> bool {
    (start.screen.x - previous.screen.x).abs() < cfg.double_tap_distance
        && (start.screen.y - previous.screen.y).abs() < cfg.double_tap_distance
        && start.timestamp_ms - previous.timestamp_ms < cfg.double_tap_time_ms
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        1.0
    }
}

fn clear_timer(cfg: &GestureConfig) -> TimerOp {
    if cfg.hold_events {
        TimerOp::Clear
    } else {
        TimerOp::None
    }
}
