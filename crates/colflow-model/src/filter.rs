//! Filters: nodes of the column graph that read from input ports and expose output columns.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::column::abstract_column::{same_column, AbstractColumn, ColumnRef};
use crate::notify::{ColumnEvent, ColumnObserver, EventMask, SubscriptionId};

struct PortConnection {
    source: Weak<dyn AbstractColumn>,
    subscription: SubscriptionId,
}

/// Input port table of a filter.
///
/// Ports hold weak references to their sources plus the subscription that routes the source's
/// events to the owning filter. The table grows on demand when a higher port is connected and
/// shrinks its trailing empty ports on disconnect.
pub struct InputPorts {
    owner: Weak<dyn ColumnObserver>,
    slots: RefCell<Vec<Option<PortConnection>>>,
}

impl InputPorts {
    /// `owner` receives the events of every connected source.
    pub fn new(owner: Weak<dyn ColumnObserver>) -> Self {
        Self {
            owner,
            slots: RefCell::new(Vec::new()),
        }
    }

    /// The live source connected to `port`.
    pub fn get(&self, port: usize) -> Option<ColumnRef> {
        self.slots
            .borrow()
            .get(port)
            .and_then(|slot| slot.as_ref())
            .and_then(|conn| conn.source.upgrade())
    }

    /// Number of port slots, including empty ones below the highest connected port.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Port connected to `column`, matched by identity. Works while `column` is being dropped.
    pub fn index_of(&self, column: &dyn AbstractColumn) -> Option<usize> {
        let target = column as *const dyn AbstractColumn as *const ();
        self.slots.borrow().iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|conn| Weak::as_ptr(&conn.source) as *const () == target)
        })
    }

    fn connect(&self, port: usize, source: &ColumnRef) {
        self.disconnect(port);
        let subscription = source
            .signals()
            .connect(self.owner.clone(), EventMask::INPUT);
        let mut slots = self.slots.borrow_mut();
        if slots.len() <= port {
            slots.resize_with(port + 1, || None);
        }
        slots[port] = Some(PortConnection {
            source: Rc::downgrade(source),
            subscription,
        });
    }

    fn disconnect(&self, port: usize) {
        let taken = self
            .slots
            .borrow_mut()
            .get_mut(port)
            .and_then(|slot| slot.take());
        if let Some(conn) = taken {
            // A source that is being dropped has no subscribers left to clean up.
            if let Some(source) = conn.source.upgrade() {
                source.signals().disconnect(conn.subscription);
            }
        }
    }

    fn shrink(&self) {
        let mut slots = self.slots.borrow_mut();
        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
    }

    fn disconnect_all(&self) {
        for port in 0..self.len() {
            self.disconnect(port);
        }
        self.slots.borrow_mut().clear();
    }
}

impl Drop for InputPorts {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

/// A node with input ports and output columns.
///
/// Implementors provide the port counts, [`AbstractFilter::output`] and the
/// [`InputPorts`] table; wiring and event routing are provided. Input handlers default to
/// no-ops and are called with the source column that raised the event.
pub trait AbstractFilter {
    /// Number of input ports, `None` for any number.
    fn input_count(&self) -> Option<usize>;

    fn output_count(&self) -> usize;

    fn output(&self, port: usize) -> Option<ColumnRef>;

    fn ports(&self) -> &InputPorts;

    /// Review a prospective connection; rejected sources leave the filter unchanged.
    fn input_acceptable(&self, port: usize, source: &dyn AbstractColumn) -> bool {
        let _ = (port, source);
        true
    }

    fn input_description_about_to_change(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_description_changed(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_plot_designation_about_to_change(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_plot_designation_changed(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_mode_about_to_change(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_mode_changed(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_data_about_to_change(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_data_changed(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_masking_about_to_change(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_masking_changed(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    fn input_rows_about_to_be_inserted(&self, source: &dyn AbstractColumn, before: usize, count: usize) {
        let _ = (source, before, count);
    }

    fn input_rows_inserted(&self, source: &dyn AbstractColumn, before: usize, count: usize) {
        let _ = (source, before, count);
    }

    fn input_rows_about_to_be_removed(&self, source: &dyn AbstractColumn, first: usize, count: usize) {
        let _ = (source, first, count);
    }

    fn input_rows_removed(&self, source: &dyn AbstractColumn, first: usize, count: usize) {
        let _ = (source, first, count);
    }

    fn input_about_to_be_disconnected(&self, source: &dyn AbstractColumn) {
        let _ = source;
    }

    /// Connect `source` to `port`, or disconnect the port with `None`.
    ///
    /// Returns `false` without touching the filter when the port is out of range or the source is
    /// not acceptable. Replacing a source brackets the switch with the about-to-change handlers
    /// (called with the old source, or the new one when the port was empty) and the changed
    /// handlers (called with the new source); the mode pair is only raised when the modes differ.
    fn input(&self, port: usize, source: Option<ColumnRef>) -> bool {
        if self.input_count().is_some_and(|max| port >= max) {
            log::debug!("rejecting connection to input port {port}: out of range");
            return false;
        }
        if let Some(src) = &source {
            if !self.input_acceptable(port, src.as_ref()) {
                log::debug!(
                    "rejecting `{}` ({}) on input port {port}",
                    src.name(),
                    src.column_mode()
                );
                return false;
            }
        }

        let old = self.ports().get(port);
        let Some(new) = source else {
            if let Some(old) = old {
                self.input_about_to_be_disconnected(old.as_ref());
                self.ports().disconnect(port);
                self.ports().shrink();
            }
            return true;
        };
        if old
            .as_ref()
            .is_some_and(|old| same_column(old.as_ref(), new.as_ref()))
        {
            return true;
        }

        let previous = old.clone().unwrap_or_else(|| new.clone());
        let mode_differs = previous.column_mode() != new.column_mode();

        self.input_description_about_to_change(previous.as_ref());
        self.input_plot_designation_about_to_change(previous.as_ref());
        self.input_masking_about_to_change(previous.as_ref());
        self.input_data_about_to_change(previous.as_ref());
        if mode_differs {
            self.input_mode_about_to_change(previous.as_ref());
        }

        self.ports().connect(port, &new);

        self.input_data_changed(new.as_ref());
        self.input_masking_changed(new.as_ref());
        self.input_plot_designation_changed(new.as_ref());
        self.input_description_changed(new.as_ref());
        if mode_differs {
            self.input_mode_changed(new.as_ref());
        }
        true
    }

    /// Wire every output of `sources` to the input port with the same index.
    ///
    /// Returns `true` only if all connections were accepted.
    fn input_from_filter(&self, sources: &dyn AbstractFilter) -> bool {
        let mut all = true;
        for port in 0..sources.output_count() {
            if !self.input(port, sources.output(port)) {
                all = false;
            }
        }
        all
    }

    fn input_at(&self, port: usize) -> Option<ColumnRef> {
        self.ports().get(port)
    }

    fn port_index_of(&self, column: &dyn AbstractColumn) -> Option<usize> {
        self.ports().index_of(column)
    }

    fn highest_connected_input(&self) -> Option<usize> {
        self.ports().len().checked_sub(1)
    }

    fn input_label(&self, port: usize) -> String {
        format!("In{}", port + 1)
    }
}

impl<T: AbstractFilter> ColumnObserver for T {
    fn column_event(&self, source: &dyn AbstractColumn, event: &ColumnEvent) {
        match event {
            ColumnEvent::DescriptionAboutToChange => self.input_description_about_to_change(source),
            ColumnEvent::DescriptionChanged => self.input_description_changed(source),
            ColumnEvent::PlotDesignationAboutToChange => {
                self.input_plot_designation_about_to_change(source)
            }
            ColumnEvent::PlotDesignationChanged => self.input_plot_designation_changed(source),
            ColumnEvent::ModeAboutToChange => self.input_mode_about_to_change(source),
            ColumnEvent::ModeChanged => self.input_mode_changed(source),
            ColumnEvent::DataAboutToChange => self.input_data_about_to_change(source),
            ColumnEvent::DataChanged => self.input_data_changed(source),
            ColumnEvent::MaskingAboutToChange => self.input_masking_about_to_change(source),
            ColumnEvent::MaskingChanged => self.input_masking_changed(source),
            ColumnEvent::RowsAboutToBeInserted { before, count } => {
                self.input_rows_about_to_be_inserted(source, *before, *count)
            }
            ColumnEvent::RowsInserted { before, count } => {
                self.input_rows_inserted(source, *before, *count)
            }
            ColumnEvent::RowsAboutToBeRemoved { first, count } => {
                self.input_rows_about_to_be_removed(source, *first, *count)
            }
            ColumnEvent::RowsRemoved { first, count } => {
                self.input_rows_removed(source, *first, *count)
            }
            ColumnEvent::AboutToBeDestroyed => {
                if let Some(port) = self.port_index_of(source) {
                    log::debug!("input port {port} lost its source `{}`", source.name());
                    self.input_about_to_be_disconnected(source);
                    self.ports().disconnect(port);
                    self.ports().shrink();
                }
            }
            // The rewire itself is silent: the replaced column's own pair brackets the switch.
            ColumnEvent::AboutToBeReplaced(replacement) => {
                let Some(port) = self.port_index_of(source) else {
                    return;
                };
                if self.input_acceptable(port, replacement.as_ref()) {
                    log::debug!(
                        "input port {port}: `{}` replaced by `{}`",
                        source.name(),
                        replacement.name()
                    );
                    self.ports().connect(port, replacement);
                } else {
                    self.input_about_to_be_disconnected(source);
                    self.ports().disconnect(port);
                    self.ports().shrink();
                }
            }
            ColumnEvent::FormatChanged | ColumnEvent::DigitsChanged => {}
        }
    }
}
