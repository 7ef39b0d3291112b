//! The virtualized week window.
//!
//! [`WeekWindow`] owns the anchor date, the bounded scroll offset, and the
//! fixed-size set of materialized day cells. Pan gestures move the offset,
//! a swipe snaps it to a cell boundary and shifts the anchor, and the
//! window is then recomputed: out-of-range days are evicted, missing days
//! are requested from the [`DayProvider`] and arrive asynchronously.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Datelike, Duration, NaiveDate};
use weekview_foundation::GestureEvent;

use crate::day::DayCell;
use crate::provider::DayProvider;
use crate::scroll::ScrollOffset;

/// Width of one day column in pixels.
pub const CELL_WIDTH: f64 = 58.0;

/// Leftmost reachable scroll offset: ten cells left of the origin.
pub const MIN_X: f64 = CELL_WIDTH * -10.0;

/// Resting offset: five cells left, centering the anchor date.
pub const START_X: f64 = CELL_WIDTH * -5.0;

/// Days materialized before and after the anchor date (inclusive window
/// of `DAYS_BEFORE_BASE + 1 + DAYS_AFTER_BASE` days).
pub const DAYS_BEFORE_BASE: i64 = 5;
pub const DAYS_AFTER_BASE: i64 = 9;

/// Fixed number of materialized day cells.
pub const WINDOW_SIZE: usize = 15;

/// A pan whose absolute vertical displacement exceeds this is treated as a
/// vertical scroll and ignored by the week view.
pub const VERTICAL_GUARD: f64 = 30.0;

/// The rendering collaborator: consumes the horizontal transform the
/// controller computes. A pure consumer; everything visual lives behind
/// this seam.
pub trait RenderHost {
    fn set_row_transform(&self, offset_x: f64);
}

/// Host that discards transforms. Useful for tests and headless runs.
pub struct NullRenderHost;

impl RenderHost for NullRenderHost {
    fn set_row_transform(&self, _offset_x: f64) {}
}

/// An inclusive range of calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The week window controller.
///
/// Invariants: the scroll offset stays in `[MIN_X, 0]`; `days` always
/// holds exactly [`WINDOW_SIZE`] date-contiguous cells bracketing the
/// anchor date ([`DAYS_BEFORE_BASE`] before, [`DAYS_AFTER_BASE`] after).
pub struct WeekWindow {
    base_date: NaiveDate,
    scroll: ScrollOffset,
    days: Vec<Rc<RefCell<DayCell>>>,
    provider: Rc<dyn DayProvider>,
    host: Rc<dyn RenderHost>,
}

impl WeekWindow {
    /// Builds the window around `base_date` and materializes the initial
    /// day cells.
    pub fn new(
        base_date: NaiveDate,
        provider: Rc<dyn DayProvider>,
        host: Rc<dyn RenderHost>,
    ) -> Self {
        let mut window = Self {
            base_date,
            scroll: ScrollOffset::new(MIN_X, START_X),
            days: Vec::with_capacity(WINDOW_SIZE),
            provider,
            host,
        };
        window.recompute_window();
        window
    }

    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.value()
    }

    pub fn days(&self) -> &[Rc<RefCell<DayCell>>] {
        &self.days
    }

    /// Routes a gesture from the detector. Only pans and swipes matter to
    /// the week view; everything else is for other consumers.
    pub fn on_gesture(&mut self, event: &GestureEvent) {
        match event {
            GestureEvent::Pan(detail) => {
                self.on_pan(detail.relative.dx, detail.absolute.dx, detail.absolute.dy)
            }
            GestureEvent::Swipe(_) => self.on_swipe(),
            _ => {}
        }
    }

    /// Applies one pan step. Gestures that look like vertical scrolling
    /// (too much vertical displacement, or more vertical than horizontal)
    /// are ignored so the hour list can scroll instead.
    pub fn on_pan(&mut self, relative_dx: f64, absolute_dx: f64, absolute_dy: f64) {
        if absolute_dy.abs() > VERTICAL_GUARD || absolute_dx.abs() < absolute_dy.abs() {
            return;
        }
        self.set_scroll_offset(self.scroll.value() + relative_dx);
    }

    /// Ends a pan: snaps the offset to the nearest cell boundary, shifts
    /// the anchor by the number of cells scrolled past, and recomputes the
    /// materialized window.
    pub fn on_swipe(&mut self) {
        let snapped = self.scroll.snap_to_cell(CELL_WIDTH);
        self.host.set_row_transform(snapped);
        let diff = self.scroll_diff();
        if diff != 0 {
            self.base_date += Duration::days(diff);
        }
        self.recompute_window();
    }

    /// Re-anchors the window on `date`.
    pub fn set_base_date(&mut self, date: NaiveDate) {
        self.base_date = date;
        self.recompute_window();
    }

    /// The "today" button: re-anchors on the host's current date and
    /// resets the offset to the resting position, even when the anchor
    /// did not move.
    pub fn show_today(&mut self, today: NaiveDate) {
        self.set_base_date(today);
        self.set_scroll_offset(START_X);
    }

    /// The date range the window keeps materialized.
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.base_date - Duration::days(DAYS_BEFORE_BASE),
            end: self.base_date + Duration::days(DAYS_AFTER_BASE),
        }
    }

    /// The days currently on screen, given the scroll offset.
    pub fn visible_range(&self) -> DateRange {
        let diff = self.scroll_diff();
        let start = self.range().start + Duration::days(DAYS_BEFORE_BASE + diff);
        DateRange {
            start,
            end: start + Duration::days(4),
        }
    }

    /// Header label for the visible range: "%b %Y", with the end month
    /// appended when the range spans two months.
    pub fn week_header(&self) -> String {
        let visible = self.visible_range();
        let mut header = visible.start.format("%b %Y").to_string();
        if (visible.start.year(), visible.start.month())
            != (visible.end.year(), visible.end.month())
        {
            header.push(' ');
            header.push_str(&visible.end.format("%b %Y").to_string());
        }
        header
    }

    /// Rebuilds the materialized day set for the current anchor.
    ///
    /// Cells whose dates are still in range are reused in place; only the
    /// missing dates (a contiguous prefix and/or suffix of the range) are
    /// requested from the provider. Afterwards the offset is reset to the
    /// resting position so the anchor is centered again.
    pub fn recompute_window(&mut self) {
        let range = self.range();
        let kept: Vec<_> = self
            .days
            .drain(..)
            .filter(|cell| range.contains(cell.borrow().date))
            .collect();

        if kept.len() == WINDOW_SIZE {
            // The anchor did not move; nothing to materialize and the
            // offset is already at a cell boundary.
            self.days = kept;
            return;
        }

        let mut kept = kept.into_iter().peekable();
        for i in 0..WINDOW_SIZE as i64 {
            let date = range.start + Duration::days(i);
            let reuse = kept
                .peek()
                .map(|cell| cell.borrow().date == date)
                .unwrap_or(false);
            if reuse {
                // Unwrap is fine: peek just confirmed the next item.
                self.days.push(kept.next().unwrap());
            } else {
                self.days.push(self.provider.get_day(date));
            }
        }
        if kept.next().is_some() {
            // Kept cells that found no slot mean the previous window was
            // not contiguous; the rebuild above already repaired it.
            log::warn!("discarding out-of-order day cells during window rebuild");
        }

        self.set_scroll_offset(START_X);
    }

    fn set_scroll_offset(&mut self, value: f64) {
        self.scroll.set(value);
        self.host.set_row_transform(self.scroll.value());
    }

    /// Whole cells the offset has moved from the resting position,
    /// positive when scrolled toward later dates.
    fn scroll_diff(&self) -> i64 {
        ((START_X - self.scroll.value()) / CELL_WIDTH).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::CalendarEvent;
    use crate::provider::EventStore;

    struct RecordingHost {
        transforms: RefCell<Vec<f64>>,
    }

    impl RecordingHost {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                transforms: RefCell::new(Vec::new()),
            })
        }

        fn last(&self) -> Option<f64> {
            self.transforms.borrow().last().copied()
        }
    }

    impl RenderHost for RecordingHost {
        fn set_row_transform(&self, offset_x: f64) {
            self.transforms.borrow_mut().push(offset_x);
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window_dates(window: &WeekWindow) -> Vec<NaiveDate> {
        window.days().iter().map(|c| c.borrow().date).collect()
    }

    fn new_window(base: NaiveDate) -> (WeekWindow, Rc<EventStore>) {
        let store = Rc::new(EventStore::new());
        let window = WeekWindow::new(base, store.clone(), Rc::new(NullRenderHost));
        (window, store)
    }

    #[test]
    fn test_initial_window_is_15_contiguous_days_around_anchor() {
        let (window, _) = new_window(date(2024, 1, 15));
        let dates = window_dates(&window);
        assert_eq!(dates.len(), WINDOW_SIZE);
        assert_eq!(dates[0], date(2024, 1, 10));
        assert_eq!(dates[14], date(2024, 1, 24));
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
        assert_eq!(window.scroll_offset(), START_X);
    }

    #[test]
    fn test_pan_moves_offset_and_pushes_transform() {
        let store = Rc::new(EventStore::new());
        let host = RecordingHost::new();
        let mut window = WeekWindow::new(date(2024, 1, 15), store, host.clone());

        window.on_pan(-20.0, -20.0, 2.0);
        assert_eq!(window.scroll_offset(), START_X - 20.0);
        assert_eq!(host.last(), Some(START_X - 20.0));
    }

    #[test]
    fn test_pan_is_clamped_to_bounds() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        window.on_pan(-100_000.0, -100.0, 0.0);
        assert_eq!(window.scroll_offset(), MIN_X);
        window.on_pan(100_000.0, 100.0, 0.0);
        assert_eq!(window.scroll_offset(), 0.0);
    }

    #[test]
    fn test_vertical_pan_is_ignored() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        // Too much vertical displacement.
        window.on_pan(-20.0, -50.0, 40.0);
        assert_eq!(window.scroll_offset(), START_X);
        // More vertical than horizontal.
        window.on_pan(-20.0, -10.0, 25.0);
        assert_eq!(window.scroll_offset(), START_X);
        // A legitimate horizontal pan still goes through.
        window.on_pan(-20.0, -40.0, 5.0);
        assert_eq!(window.scroll_offset(), START_X - 20.0);
    }

    #[test]
    fn test_swipe_without_cell_crossing_snaps_back() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        window.on_pan(-20.0, -20.0, 0.0);
        window.on_swipe();
        assert_eq!(window.base_date(), date(2024, 1, 15));
        assert_eq!(window.scroll_offset(), START_X);
    }

    #[test]
    fn test_swipe_shifts_anchor_by_cells_scrolled() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        // Two cell widths toward later dates.
        window.on_pan(-2.0 * CELL_WIDTH, -120.0, 0.0);
        window.on_swipe();
        assert_eq!(window.base_date(), date(2024, 1, 17));
        let dates = window_dates(&window);
        assert_eq!(dates[0], date(2024, 1, 12));
        assert_eq!(dates[14], date(2024, 1, 26));
        assert_eq!(window.scroll_offset(), START_X);
    }

    #[test]
    fn test_recompute_reuses_overlapping_cells() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        let kept_cell = window.days()[10].clone(); // 2024-01-20
        window.set_base_date(date(2024, 1, 17));
        let dates = window_dates(&window);
        let idx = dates.iter().position(|&d| d == date(2024, 1, 20)).unwrap();
        assert!(
            Rc::ptr_eq(&window.days()[idx], &kept_cell),
            "overlapping day cells must be reused, not recreated"
        );
    }

    #[test]
    fn test_anchor_shift_by_seven_days() {
        // Anchor 2024-01-15, +7 days -> window
        // 2024-01-17..2024-01-31 with the leading week evicted and the
        // trailing week created.
        let (mut window, store) = new_window(date(2024, 1, 15));
        let old_cells: Vec<_> = window.days().to_vec();
        store.resolve_all(); // settle the initial fills

        window.set_base_date(date(2024, 1, 22));
        let dates = window_dates(&window);
        assert_eq!(dates.len(), WINDOW_SIZE);
        assert_eq!(dates[0], date(2024, 1, 17));
        assert_eq!(dates[14], date(2024, 1, 31));

        // 01-10..01-16 are gone.
        for day in 10..=16 {
            assert!(!dates.contains(&date(2024, 1, day)));
        }
        // 01-17..01-24 are the same cells as before the shift.
        for (i, day) in (17..=24).enumerate() {
            let old_idx = old_cells
                .iter()
                .position(|c| c.borrow().date == date(2024, 1, day))
                .unwrap();
            assert!(Rc::ptr_eq(&window.days()[i], &old_cells[old_idx]));
        }
        // 01-25..01-31 are freshly requested from the provider.
        assert_eq!(store.pending_fills(), 7);
    }

    #[test]
    fn test_swipe_to_left_bound_shifts_five_days() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        window.on_pan(-10.0 * CELL_WIDTH, -600.0, 0.0);
        assert_eq!(window.scroll_offset(), MIN_X);
        window.on_swipe();
        assert_eq!(window.base_date(), date(2024, 1, 20));
        assert_eq!(window_dates(&window)[0], date(2024, 1, 15));
    }

    #[test]
    fn test_backward_swipe_prepends_days() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        window.on_pan(3.0 * CELL_WIDTH, 180.0, 0.0);
        window.on_swipe();
        assert_eq!(window.base_date(), date(2024, 1, 12));
        let dates = window_dates(&window);
        assert_eq!(dates[0], date(2024, 1, 7));
        assert_eq!(dates[14], date(2024, 1, 21));
    }

    #[test]
    fn test_gesture_routing() {
        use weekview_foundation::{Delta, PanDetail, PointerSample};

        let (mut window, _) = new_window(date(2024, 1, 15));
        let pan = GestureEvent::Pan(PanDetail {
            absolute: Delta { dx: -40.0, dy: 2.0 },
            relative: Delta { dx: -40.0, dy: 2.0 },
            position: PointerSample::at(100.0, 100.0, 50.0),
        });
        window.on_gesture(&pan);
        assert_eq!(window.scroll_offset(), START_X - 40.0);

        let tap = GestureEvent::Tap(PointerSample::at(0.0, 0.0, 0.0));
        window.on_gesture(&tap);
        assert_eq!(window.scroll_offset(), START_X - 40.0);
    }

    #[test]
    fn test_evicted_cell_is_not_filled_late() {
        let (mut window, store) = new_window(date(2024, 1, 15));
        let evicted_date = date(2024, 1, 10);
        store.put_events(
            evicted_date,
            vec![CalendarEvent {
                id: 1,
                title: "late arrival".into(),
                start: evicted_date.and_hms_opt(9, 0, 0).unwrap(),
                end: evicted_date.and_hms_opt(10, 0, 0).unwrap(),
                is_all_day: false,
            }],
        );

        // Shift far enough that 01-10 is evicted before its fill resolves.
        window.set_base_date(date(2024, 1, 22));
        let applied = store.resolve_all();
        // The evicted cell was dropped; fills only landed in live cells
        // (and only 01-10 had scheduled events, so nothing was applied).
        assert_eq!(applied, 0);
        assert!(window_dates(&window).iter().all(|&d| d != evicted_date));
    }

    #[test]
    fn test_unresolved_days_render_empty() {
        let (window, _) = new_window(date(2024, 1, 15));
        // No resolve_all: every cell still renders as a zero-event day.
        for cell in window.days() {
            assert_eq!(cell.borrow().event_count(), 0);
        }
    }

    #[test]
    fn test_week_header_single_and_split_month() {
        let (window, _) = new_window(date(2024, 1, 15));
        assert_eq!(window.week_header(), "Jan 2024");

        let (mut window, _) = new_window(date(2024, 1, 30));
        assert_eq!(window.week_header(), "Jan 2024 Feb 2024");

        // Scrolling the visible range fully into February drops the
        // January label.
        window.on_pan(-2.0 * CELL_WIDTH, -120.0, 0.0);
        assert_eq!(window.week_header(), "Feb 2024");
    }

    #[test]
    fn test_show_today_recenters_even_without_anchor_change() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        window.on_pan(-40.0, -40.0, 0.0);
        window.show_today(date(2024, 1, 15));
        assert_eq!(window.base_date(), date(2024, 1, 15));
        assert_eq!(window.scroll_offset(), START_X);

        window.show_today(date(2024, 3, 1));
        assert_eq!(window.base_date(), date(2024, 3, 1));
        assert_eq!(window_dates(&window)[0], date(2024, 2, 25));
    }

    #[test]
    fn test_visible_range_follows_scroll() {
        let (mut window, _) = new_window(date(2024, 1, 15));
        let visible = window.visible_range();
        assert_eq!(visible.start, date(2024, 1, 15));
        assert_eq!(visible.end, date(2024, 1, 19));

        window.on_pan(-2.0 * CELL_WIDTH, -120.0, 0.0);
        let visible = window.visible_range();
        assert_eq!(visible.start, date(2024, 1, 17));
        assert_eq!(visible.end, date(2024, 1, 21));
    }
}
