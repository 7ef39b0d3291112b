//! Foundation elements for the week-view prototype: geometry, the normalized
//! pointer/touch input model, and the gesture recognition state machine.

pub mod config;
pub mod detector;
pub mod events;
pub mod geometry;
pub mod input;
pub mod sample;

// Re-export commonly used items
pub use config::GestureConfig;
pub use detector::{GestureDetector, Output, State, TimerOp};
pub use events::{
    Delta, GestureEvent, HoldEndDetail, PanDetail, ScaleRotate, SwipeDetail, SwipeDirection,
    TransformDetail,
};
pub use geometry::Point;
pub use input::{split_touch_end, InputEvent, TouchId, TouchPoint};
pub use sample::PointerSample;

pub mod prelude {
    pub use crate::config::GestureConfig;
    pub use crate::detector::{GestureDetector, Output, State, TimerOp};
    pub use crate::events::{GestureEvent, PanDetail, SwipeDetail, SwipeDirection};
    pub use crate::geometry::Point;
    pub use crate::input::{InputEvent, TouchId, TouchPoint};
    pub use crate::sample::PointerSample;
}
