//! Change notification between columns and their consumers.
//!
//! Every mutation of a column is bracketed by an "about to change" event and a "changed" event
//! of the same category. Consumers register for the categories they need through an
//! [`EventMask`], either as a weakly held [`ColumnObserver`] (filters) or as a callback.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::rc::{Rc, Weak};

use crate::column::abstract_column::{AbstractColumn, ColumnRef};

/// A single notification emitted by a column.
#[derive(Clone)]
pub enum ColumnEvent {
    DescriptionAboutToChange,
    DescriptionChanged,
    PlotDesignationAboutToChange,
    PlotDesignationChanged,
    ModeAboutToChange,
    ModeChanged,
    DataAboutToChange,
    DataChanged,
    MaskingAboutToChange,
    MaskingChanged,
    RowsAboutToBeInserted { before: usize, count: usize },
    RowsInserted { before: usize, count: usize },
    RowsAboutToBeRemoved { first: usize, count: usize },
    RowsRemoved { first: usize, count: usize },
    /// Display format of a string-producing filter changed.
    FormatChanged,
    /// Display precision of a numeric-to-text filter changed.
    DigitsChanged,
    /// The column is being dropped; consumers must forget it.
    AboutToBeDestroyed,
    /// The column is being swapped out for another one; consumers should rewire.
    AboutToBeReplaced(ColumnRef),
}

impl ColumnEvent {
    pub fn category(&self) -> EventMask {
        match self {
            ColumnEvent::DescriptionAboutToChange | ColumnEvent::DescriptionChanged => {
                EventMask::DESCRIPTION
            }
            ColumnEvent::PlotDesignationAboutToChange | ColumnEvent::PlotDesignationChanged => {
                EventMask::PLOT_DESIGNATION
            }
            ColumnEvent::ModeAboutToChange | ColumnEvent::ModeChanged => EventMask::MODE,
            ColumnEvent::DataAboutToChange | ColumnEvent::DataChanged => EventMask::DATA,
            ColumnEvent::MaskingAboutToChange | ColumnEvent::MaskingChanged => EventMask::MASKING,
            ColumnEvent::RowsAboutToBeInserted { .. } | ColumnEvent::RowsInserted { .. } => {
                EventMask::ROWS_INSERTED
            }
            ColumnEvent::RowsAboutToBeRemoved { .. } | ColumnEvent::RowsRemoved { .. } => {
                EventMask::ROWS_REMOVED
            }
            ColumnEvent::FormatChanged | ColumnEvent::DigitsChanged => EventMask::FORMAT,
            ColumnEvent::AboutToBeDestroyed | ColumnEvent::AboutToBeReplaced(_) => {
                EventMask::LIFECYCLE
            }
        }
    }

    /// `true` for the first half of a pair.
    pub fn is_about_to_change(&self) -> bool {
        matches!(
            self,
            ColumnEvent::DescriptionAboutToChange
                | ColumnEvent::PlotDesignationAboutToChange
                | ColumnEvent::ModeAboutToChange
                | ColumnEvent::DataAboutToChange
                | ColumnEvent::MaskingAboutToChange
                | ColumnEvent::RowsAboutToBeInserted { .. }
                | ColumnEvent::RowsAboutToBeRemoved { .. }
        )
    }
}

impl fmt::Debug for ColumnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnEvent::DescriptionAboutToChange => f.write_str("DescriptionAboutToChange"),
            ColumnEvent::DescriptionChanged => f.write_str("DescriptionChanged"),
            ColumnEvent::PlotDesignationAboutToChange => f.write_str("PlotDesignationAboutToChange"),
            ColumnEvent::PlotDesignationChanged => f.write_str("PlotDesignationChanged"),
            ColumnEvent::ModeAboutToChange => f.write_str("ModeAboutToChange"),
            ColumnEvent::ModeChanged => f.write_str("ModeChanged"),
            ColumnEvent::DataAboutToChange => f.write_str("DataAboutToChange"),
            ColumnEvent::DataChanged => f.write_str("DataChanged"),
            ColumnEvent::MaskingAboutToChange => f.write_str("MaskingAboutToChange"),
            ColumnEvent::MaskingChanged => f.write_str("MaskingChanged"),
            ColumnEvent::RowsAboutToBeInserted { before, count } => f
                .debug_struct("RowsAboutToBeInserted")
                .field("before", before)
                .field("count", count)
                .finish(),
            ColumnEvent::RowsInserted { before, count } => f
                .debug_struct("RowsInserted")
                .field("before", before)
                .field("count", count)
                .finish(),
            ColumnEvent::RowsAboutToBeRemoved { first, count } => f
                .debug_struct("RowsAboutToBeRemoved")
                .field("first", first)
                .field("count", count)
                .finish(),
            ColumnEvent::RowsRemoved { first, count } => f
                .debug_struct("RowsRemoved")
                .field("first", first)
                .field("count", count)
                .finish(),
            ColumnEvent::FormatChanged => f.write_str("FormatChanged"),
            ColumnEvent::DigitsChanged => f.write_str("DigitsChanged"),
            ColumnEvent::AboutToBeDestroyed => f.write_str("AboutToBeDestroyed"),
            ColumnEvent::AboutToBeReplaced(replacement) => f
                .debug_tuple("AboutToBeReplaced")
                .field(&replacement.name())
                .finish(),
        }
    }
}

/// Set of event categories a subscriber wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventMask(u16);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const DESCRIPTION: EventMask = EventMask(1 << 0);
    pub const PLOT_DESIGNATION: EventMask = EventMask(1 << 1);
    pub const MODE: EventMask = EventMask(1 << 2);
    pub const DATA: EventMask = EventMask(1 << 3);
    pub const MASKING: EventMask = EventMask(1 << 4);
    pub const ROWS_INSERTED: EventMask = EventMask(1 << 5);
    pub const ROWS_REMOVED: EventMask = EventMask(1 << 6);
    pub const FORMAT: EventMask = EventMask(1 << 7);
    pub const LIFECYCLE: EventMask = EventMask(1 << 8);

    /// Everything a filter input listens to.
    pub const INPUT: EventMask = EventMask(
        Self::DESCRIPTION.0
            | Self::PLOT_DESIGNATION.0
            | Self::MODE.0
            | Self::DATA.0
            | Self::MASKING.0
            | Self::ROWS_INSERTED.0
            | Self::ROWS_REMOVED.0
            | Self::LIFECYCLE.0,
    );
    pub const ALL: EventMask = EventMask(Self::INPUT.0 | Self::FORMAT.0);

    pub fn contains(self, other: EventMask) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: EventMask) {
        self.0 |= rhs.0;
    }
}

/// Receiver side of a subscription held weakly by [`Signals`].
///
/// Every [`AbstractFilter`](crate::filter::AbstractFilter) is an observer; the blanket
/// implementation dispatches events to the filter's input handlers.
pub trait ColumnObserver {
    fn column_event(&self, source: &dyn AbstractColumn, event: &ColumnEvent);
}

/// Handle returned by [`Signals::connect`] and [`Signals::connect_fn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn(&dyn AbstractColumn, &ColumnEvent)>;

#[derive(Clone)]
enum Listener {
    Observer(Weak<dyn ColumnObserver>),
    Callback(Callback),
}

struct Subscription {
    id: SubscriptionId,
    mask: EventMask,
    listener: Listener,
}

/// Per-column subscriber list.
///
/// Delivery is synchronous and in subscription order. The list is snapshotted before delivery,
/// so listeners may subscribe or unsubscribe (themselves or others) from inside a handler; a
/// listener removed during delivery is not called afterwards.
#[derive(Default)]
pub struct Signals {
    next_id: Cell<u64>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, observer: Weak<dyn ColumnObserver>, mask: EventMask) -> SubscriptionId {
        self.push(mask, Listener::Observer(observer))
    }

    pub fn connect_fn<F>(&self, mask: EventMask, callback: F) -> SubscriptionId
    where
        F: Fn(&dyn AbstractColumn, &ColumnEvent) + 'static,
    {
        self.push(mask, Listener::Callback(Rc::new(callback)))
    }

    /// Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|sub| sub.id != id);
        subscriptions.len() != before
    }

    pub fn is_connected(&self, id: SubscriptionId) -> bool {
        self.subscriptions.borrow().iter().any(|sub| sub.id == id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, source: &dyn AbstractColumn, event: &ColumnEvent) {
        let category = event.category();
        let targets: Vec<(SubscriptionId, Listener)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|sub| sub.mask.contains(category))
            .map(|sub| (sub.id, sub.listener.clone()))
            .collect();

        let mut saw_dead_observer = false;
        for (id, listener) in targets {
            if !self.is_connected(id) {
                continue;
            }
            match listener {
                Listener::Observer(observer) => match observer.upgrade() {
                    Some(observer) => observer.column_event(source, event),
                    None => saw_dead_observer = true,
                },
                Listener::Callback(callback) => callback(source, event),
            }
        }

        if saw_dead_observer {
            self.subscriptions
                .borrow_mut()
                .retain(|sub| match &sub.listener {
                    Listener::Observer(observer) => observer.strong_count() > 0,
                    Listener::Callback(_) => true,
                });
        }
    }

    fn push(&self, mask: EventMask, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            mask,
            listener,
        });
        id
    }
}

impl fmt::Debug for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signals")
            .field("subscriptions", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_select_categories() {
        let rows = EventMask::ROWS_INSERTED | EventMask::ROWS_REMOVED;
        assert!(rows.contains(ColumnEvent::RowsInserted { before: 0, count: 1 }.category()));
        assert!(!rows.contains(ColumnEvent::DataChanged.category()));
        assert!(EventMask::INPUT.contains(EventMask::LIFECYCLE));
        assert!(!EventMask::INPUT.contains(EventMask::FORMAT));
        assert!(EventMask::ALL.contains(EventMask::FORMAT));
        assert!(!EventMask::ALL.contains(EventMask::NONE));
    }

    #[test]
    fn pairs_report_their_phase() {
        assert!(ColumnEvent::DataAboutToChange.is_about_to_change());
        assert!(!ColumnEvent::DataChanged.is_about_to_change());
        assert!(ColumnEvent::RowsAboutToBeRemoved { first: 1, count: 2 }.is_about_to_change());
        assert!(!ColumnEvent::AboutToBeDestroyed.is_about_to_change());
    }
}
