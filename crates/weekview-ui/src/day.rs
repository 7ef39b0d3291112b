//! Day cells: one calendar day's worth of event data as materialized in
//! the visible window.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// A single calendar event. `start`/`end` are naive local times; all-day
/// events ignore the time-of-day portion.
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub is_all_day: bool,
}

/// One of the 24 hour buckets of a day.
#[derive(Clone, Debug, PartialEq)]
pub struct HourSlot {
    pub hour: u32,
    pub events: Vec<CalendarEvent>,
}

/// One calendar day in the visible window: the date, 24 hour buckets for
/// timed events, and the all-day events.
///
/// Cells are created empty and populated later by the day data provider;
/// a cell whose events never arrive renders as a valid zero-event day.
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub hours: Vec<HourSlot>,
    pub allday_events: Vec<CalendarEvent>,
}

impl DayCell {
    /// A cell for `date` with 24 empty hour buckets.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            hours: (0..24)
                .map(|hour| HourSlot {
                    hour,
                    events: Vec::new(),
                })
                .collect(),
            allday_events: Vec::new(),
        }
    }

    /// Routes a batch of events into the cell: all-day events into
    /// `allday_events`, timed events into the bucket of their start hour.
    pub fn merge_events(&mut self, events: Vec<CalendarEvent>) {
        for event in events {
            if event.is_all_day {
                self.allday_events.push(event);
            } else {
                let hour = event.start.hour() as usize;
                self.hours[hour].events.push(event);
            }
        }
    }

    /// Total number of events held by this cell.
    pub fn event_count(&self) -> usize {
        self.allday_events.len() + self.hours.iter().map(|slot| slot.events.len()).sum::<usize>()
    }
}
