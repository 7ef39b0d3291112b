//! Week window controller for the week-view prototype: day cells, the
//! asynchronous day data provider seam, and the virtualized 15-day window
//! that consumes pan/swipe gestures.

pub mod day;
pub mod provider;
pub mod scroll;
pub mod week;

// Re-export commonly used items
pub use day::{CalendarEvent, DayCell, HourSlot};
pub use provider::{DayProvider, EventStore, ExpansionSignal};
pub use scroll::ScrollOffset;
pub use week::{
    DateRange, RenderHost, WeekWindow, CELL_WIDTH, DAYS_AFTER_BASE, DAYS_BEFORE_BASE, MIN_X,
    START_X, VERTICAL_GUARD, WINDOW_SIZE,
};

pub mod prelude {
    pub use crate::day::{CalendarEvent, DayCell, HourSlot};
    pub use crate::provider::{DayProvider, EventStore, ExpansionSignal};
    pub use crate::week::{DateRange, RenderHost, WeekWindow};
}
