//! The day data-provider seam.
//!
//! [`DayProvider`] is the collaborator the window controller asks for day
//! cells. A provider answers immediately with an empty cell and may fill
//! in the events later, on another turn of the event loop; the
//! [`ExpansionSignal`] tells the rendering layer when that happened.
//!
//! [`EventStore`] is the concrete single-threaded provider used by the
//! demo and the tests: resolution is an explicit `resolve_*` call by the
//! host, which makes the "later turn of the event loop" deterministic.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use chrono::NaiveDate;

use crate::day::{CalendarEvent, DayCell};

/// Hands out day cells for arbitrary dates. The returned cell is usable
/// immediately; events arrive later in place.
pub trait DayProvider {
    fn get_day(&self, date: NaiveDate) -> Rc<RefCell<DayCell>>;
}

/// Callback registry for the "events expanded" notification.
///
/// Listeners are identified by the id returned from [`add_listener`], so a
/// consumer can unsubscribe without holding on to the closure itself.
///
/// [`add_listener`]: ExpansionSignal::add_listener
#[derive(Default)]
pub struct ExpansionSignal {
    listeners: RefCell<HashMap<u64, Box<dyn Fn()>>>,
    next_id: Cell<u64>,
}

impl ExpansionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Box<dyn Fn()>) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.listeners.borrow_mut().insert(id, listener);
        id
    }

    pub fn remove_listener(&self, id: u64) {
        self.listeners.borrow_mut().remove(&id);
    }

    pub fn dispatch(&self) {
        for listener in self.listeners.borrow().values() {
            listener();
        }
    }
}

struct PendingFill {
    date: NaiveDate,
    cell: Weak<RefCell<DayCell>>,
}

/// Deferred in-memory day provider.
///
/// `get_day` returns an empty cell right away and queues a pending fill;
/// the host later drains the queue with [`resolve_all`] or
/// [`resolve_day`], which merges the scheduled events into the cells that
/// are still alive and fires the expansion signal. Only a weak reference
/// to each handed-out cell is kept, so a fill whose cell was evicted in
/// the meantime is dropped instead of resurrecting it.
///
/// No timeout or error path exists: a date with no scheduled events (or a
/// fill that never happens) just leaves the cell empty, which is a valid
/// zero-event day.
///
/// [`resolve_all`]: EventStore::resolve_all
/// [`resolve_day`]: EventStore::resolve_day
#[derive(Default)]
pub struct EventStore {
    schedule: RefCell<HashMap<NaiveDate, Vec<CalendarEvent>>>,
    pending: RefCell<Vec<PendingFill>>,
    on_expansion: ExpansionSignal,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the events a future fill for `date` will deliver.
    pub fn put_events(&self, date: NaiveDate, events: Vec<CalendarEvent>) {
        self.schedule.borrow_mut().entry(date).or_default().extend(events);
    }

    /// The "events expanded" notification consumed by the rendering layer.
    pub fn on_expansion(&self) -> &ExpansionSignal {
        &self.on_expansion
    }

    /// Number of fills not yet resolved (evicted cells included until the
    /// next drain).
    pub fn pending_fills(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Resolves every pending fill. Returns how many cells actually
    /// received events; fills for evicted cells are discarded silently.
    pub fn resolve_all(&self) -> usize {
        let pending = self.pending.borrow_mut().split_off(0);
        let mut applied = 0;
        for fill in pending {
            if self.apply(&fill) {
                applied += 1;
            }
        }
        applied
    }

    /// Resolves the pending fills for one date. Returns whether any cell
    /// received events.
    pub fn resolve_day(&self, date: NaiveDate) -> bool {
        let (matching, rest): (Vec<_>, Vec<_>) = self
            .pending
            .borrow_mut()
            .split_off(0)
            .into_iter()
            .partition(|fill| fill.date == date);
        *self.pending.borrow_mut() = rest;

        let mut applied = false;
        for fill in matching {
            applied |= self.apply(&fill);
        }
        applied
    }

    fn apply(&self, fill: &PendingFill) -> bool {
        // The upgrade is the eviction guard: a cell dropped by the window
        // controller must not be written to.
        let Some(cell) = fill.cell.upgrade() else {
            log::debug!("dropping fill for evicted day {}", fill.date);
            return false;
        };
        let events = self
            .schedule
            .borrow()
            .get(&fill.date)
            .cloned()
            .unwrap_or_default();
        if events.is_empty() {
            return false;
        }
        cell.borrow_mut().merge_events(events);
        self.on_expansion.dispatch();
        true
    }
}

impl DayProvider for EventStore {
    fn get_day(&self, date: NaiveDate) -> Rc<RefCell<DayCell>> {
        let cell = Rc::new(RefCell::new(DayCell::empty(date)));
        self.pending.borrow_mut().push(PendingFill {
            date,
            cell: Rc::downgrade(&cell),
        });
        cell
    }
}
