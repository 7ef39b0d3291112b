//! Headless demo: feeds a scripted drag through the gesture detector,
//! routes the recognized gestures into the week window, resolves the
//! deferred day fills and prints the resulting week.
//!
//! Usage: `weekview-demo [YYYY-MM-DD]` (defaults to today).

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use weekview_foundation::{GestureDetector, InputEvent, PointerSample, TimerOp};
use weekview_ui::{CalendarEvent, EventStore, RenderHost, WeekWindow, CELL_WIDTH};

struct LoggingHost {
    offset: Cell<f64>,
}

impl RenderHost for LoggingHost {
    fn set_row_transform(&self, offset_x: f64) {
        log::debug!("row transform -> {offset_x}");
        self.offset.set(offset_x);
    }
}

fn seed_events(store: &EventStore, base: NaiveDate) {
    let mut id = 0;
    for (day, hour, title) in [
        (0, 9, "standup"),
        (0, 14, "design review"),
        (1, 11, "1:1"),
        (3, 9, "standup"),
        (7, 10, "planning"),
    ] {
        id += 1;
        let start = (base + Duration::days(day)).and_hms_opt(hour, 0, 0).unwrap();
        store.put_events(
            start.date(),
            vec![CalendarEvent {
                id,
                title: title.to_string(),
                start,
                end: start + Duration::hours(1),
                is_all_day: false,
            }],
        );
    }
}

/// A horizontal drag from `from_x` to `to_x`, one sample every 16 ms.
fn drag_trace(from_x: f64, to_x: f64, y: f64) -> Vec<InputEvent> {
    let steps = 10;
    let mut events = vec![InputEvent::MouseDown(PointerSample::at(from_x, y, 0.0))];
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let x = from_x + t * (to_x - from_x);
        events.push(InputEvent::MouseMove(PointerSample::at(x, y, i as f64 * 16.0)));
    }
    events.push(InputEvent::MouseUp(PointerSample::at(
        to_x,
        y,
        (steps + 1) as f64 * 16.0,
    )));
    events
}

fn print_week(window: &WeekWindow) {
    println!("== {} ==", window.week_header());
    let visible = window.visible_range();
    for cell in window.days() {
        let cell = cell.borrow();
        let marker = if visible.contains(cell.date) { "*" } else { " " };
        println!(
            "{marker} {}  {} event(s)",
            cell.date.format("%a %Y-%m-%d"),
            cell.event_count()
        );
        for slot in &cell.hours {
            for event in &slot.events {
                println!("      {:02}:00  {}", slot.hour, event.title);
            }
        }
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let base = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<NaiveDate>()
            .with_context(|| format!("invalid date {arg:?}, expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };

    let store = Rc::new(EventStore::new());
    seed_events(&store, base);
    let host = Rc::new(LoggingHost {
        offset: Cell::new(0.0),
    });
    let mut window = WeekWindow::new(base, store.clone(), host.clone());
    store.resolve_all();

    println!("=== Week View Demo ===");
    print_week(&window);

    // Drag one week's worth of cells to the left and release.
    println!("-- swiping forward one week --");
    let mut detector = GestureDetector::new();
    for input in drag_trace(400.0, 400.0 - 5.0 * CELL_WIDTH, 120.0) {
        let output = detector.handle(&input);
        if !matches!(output.timer, TimerOp::None) {
            log::debug!("timer request: {:?}", output.timer);
        }
        for gesture in &output.events {
            log::info!("gesture: {gesture:?}");
            window.on_gesture(gesture);
        }
    }
    store.resolve_all();
    print_week(&window);

    println!("-- back to today --");
    window.show_today(base);
    store.resolve_all();
    print_week(&window);

    log::info!("final row transform: {}", host.offset.get());
    Ok(())
}
