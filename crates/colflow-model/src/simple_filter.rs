//! Single-input, single-output filters that are their own output column.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use chrono::NaiveDateTime;

use crate::column::abstract_column::{AbstractColumn, ColumnRef};
use crate::error::PersistError;
use crate::filter::{AbstractFilter, InputPorts};
use crate::interval::{Interval, IntervalAttribute};
use crate::mode::{ColumnMode, DataType, PlotDesignation};
use crate::notify::{ColumnEvent, ColumnObserver, Signals};

/// Per-row behaviour of a [`SimpleFilter`].
///
/// Every hook has a pass-through default, so a kernel only overrides what it changes. Accessors
/// receive the connected input column; the filter never calls them while unconnected.
pub trait FilterKernel: 'static {
    /// Tag used when saving the filter.
    fn filter_name(&self) -> &'static str;

    /// Fixed output mode, or `None` to follow the input (Text while unconnected).
    fn column_mode(&self) -> Option<ColumnMode> {
        None
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        let _ = source;
        true
    }

    fn row_count(&self, input: &dyn AbstractColumn) -> usize {
        input.row_count()
    }

    /// Output rows affected by a change of `input_rows`.
    fn dependent_rows(&self, input_rows: Interval) -> Vec<Interval> {
        vec![input_rows]
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        input.value_at(row)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        input.integer_at(row)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        input.big_int_at(row)
    }

    fn text_at(&self, input: &dyn AbstractColumn, row: usize) -> String {
        input.text_at(row)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        input.date_time_at(row)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row)
    }

    /// Extra attributes written on the `<simple_filter>` element.
    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        let _ = attributes;
    }

    /// Restore one saved attribute. Returns `Ok(false)` for attributes the kernel does not know.
    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        let _ = (name, value);
        Ok(false)
    }
}

/// A filter with one input port whose single output is the filter itself.
///
/// Row, data and plot-designation events of the input are re-emitted on the output; row ranges
/// go through [`FilterKernel::dependent_rows`]. Masking is local to the filter.
pub struct SimpleFilter<K: FilterKernel> {
    this: Weak<SimpleFilter<K>>,
    ports: InputPorts,
    kernel: RefCell<K>,
    masking: RefCell<IntervalAttribute<bool>>,
    signals: Signals,
}

impl<K: FilterKernel> SimpleFilter<K> {
    pub fn new(kernel: K) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| {
            let owner: Weak<dyn ColumnObserver> = this.clone();
            Self {
                this: this.clone(),
                ports: InputPorts::new(owner),
                kernel: RefCell::new(kernel),
                masking: RefCell::new(IntervalAttribute::new()),
                signals: Signals::new(),
            }
        })
    }

    pub fn kernel(&self) -> Ref<'_, K> {
        self.kernel.borrow()
    }

    pub fn input_column(&self) -> Option<ColumnRef> {
        self.ports.get(0)
    }

    pub fn set_masked(&self, row: usize, masked: bool) {
        self.set_masked_interval(Interval::single(row), masked);
    }

    pub fn set_masked_interval(&self, interval: Interval, masked: bool) {
        self.emit(ColumnEvent::MaskingAboutToChange);
        self.masking.borrow_mut().set(interval, masked);
        self.emit(ColumnEvent::MaskingChanged);
    }

    pub fn clear_masks(&self) {
        self.emit(ColumnEvent::MaskingAboutToChange);
        self.masking.borrow_mut().clear();
        self.emit(ColumnEvent::MaskingChanged);
    }

    /// Apply `update` to the kernel and announce `event` when it reports a change.
    pub(crate) fn update_kernel(&self, event: ColumnEvent, update: impl FnOnce(&mut K) -> bool) {
        let changed = update(&mut *self.kernel.borrow_mut());
        if changed {
            self.emit(event);
        }
    }

    fn emit(&self, event: ColumnEvent) {
        self.signals.emit(self, &event);
    }

    fn emit_rows(&self, input_rows: Option<Interval>, event: impl Fn(Interval) -> ColumnEvent) {
        let Some(input_rows) = input_rows else {
            return;
        };
        let ranges = self.kernel.borrow().dependent_rows(input_rows);
        for range in ranges {
            self.emit(event(range));
        }
    }

    fn read<T>(
        &self,
        data_type: DataType,
        neutral: T,
        read: impl FnOnce(&K, &dyn AbstractColumn) -> T,
    ) -> T {
        match self.ports.get(0) {
            Some(input) if self.mode_for(Some(input.as_ref())).data_type() == data_type => {
                let kernel = self.kernel.borrow();
                read(&*kernel, input.as_ref())
            }
            _ => neutral,
        }
    }

    fn mode_for(&self, input: Option<&dyn AbstractColumn>) -> ColumnMode {
        self.kernel
            .borrow()
            .column_mode()
            .or_else(|| input.map(|input| input.column_mode()))
            .unwrap_or(ColumnMode::Text)
    }
}

impl<K: FilterKernel> AbstractColumn for SimpleFilter<K> {
    fn name(&self) -> String {
        self.kernel.borrow().filter_name().to_string()
    }

    fn column_mode(&self) -> ColumnMode {
        let input = self.ports.get(0);
        self.mode_for(input.as_deref())
    }

    fn row_count(&self) -> usize {
        self.ports
            .get(0)
            .map_or(0, |input| self.kernel.borrow().row_count(input.as_ref()))
    }

    fn plot_designation(&self) -> PlotDesignation {
        self.ports
            .get(0)
            .map_or(PlotDesignation::None, |input| input.plot_designation())
    }

    fn value_at(&self, row: usize) -> f64 {
        self.read(DataType::Double, 0.0, |k, input| k.value_at(input, row))
    }

    fn integer_at(&self, row: usize) -> i32 {
        self.read(DataType::Integer, 0, |k, input| k.integer_at(input, row))
    }

    fn big_int_at(&self, row: usize) -> i64 {
        self.read(DataType::BigInt, 0, |k, input| k.big_int_at(input, row))
    }

    fn text_at(&self, row: usize) -> String {
        self.read(DataType::Text, String::new(), |k, input| k.text_at(input, row))
    }

    fn date_time_at(&self, row: usize) -> Option<NaiveDateTime> {
        self.read(DataType::DateTime, None, |k, input| k.date_time_at(input, row))
    }

    fn is_invalid(&self, row: usize) -> bool {
        self.ports
            .get(0)
            .is_some_and(|input| self.kernel.borrow().is_invalid(input.as_ref(), row))
    }

    fn is_masked(&self, row: usize) -> bool {
        self.masking.borrow().is_set(row)
    }

    fn is_masked_interval(&self, interval: Interval) -> bool {
        self.masking.borrow().is_set_interval(interval)
    }

    fn masked_intervals(&self) -> Vec<Interval> {
        self.masking.borrow().intervals()
    }

    fn signals(&self) -> &Signals {
        &self.signals
    }
}

impl<K: FilterKernel> AbstractFilter for SimpleFilter<K> {
    fn input_count(&self) -> Option<usize> {
        Some(1)
    }

    fn output_count(&self) -> usize {
        1
    }

    fn output(&self, port: usize) -> Option<ColumnRef> {
        if port != 0 {
            return None;
        }
        let this: Rc<dyn AbstractColumn> = self.this.upgrade()?;
        Some(this)
    }

    fn ports(&self) -> &InputPorts {
        &self.ports
    }

    fn input_acceptable(&self, port: usize, source: &dyn AbstractColumn) -> bool {
        port == 0 && self.kernel.borrow().accepts(source)
    }

    fn input_plot_designation_about_to_change(&self, _source: &dyn AbstractColumn) {
        self.emit(ColumnEvent::PlotDesignationAboutToChange);
    }

    fn input_plot_designation_changed(&self, _source: &dyn AbstractColumn) {
        self.emit(ColumnEvent::PlotDesignationChanged);
    }

    fn input_mode_about_to_change(&self, _source: &dyn AbstractColumn) {
        self.emit(ColumnEvent::DataAboutToChange);
    }

    fn input_mode_changed(&self, _source: &dyn AbstractColumn) {
        self.emit(ColumnEvent::DataChanged);
    }

    fn input_data_about_to_change(&self, _source: &dyn AbstractColumn) {
        self.emit(ColumnEvent::DataAboutToChange);
    }

    fn input_data_changed(&self, _source: &dyn AbstractColumn) {
        self.emit(ColumnEvent::DataChanged);
    }

    fn input_rows_about_to_be_inserted(&self, _source: &dyn AbstractColumn, before: usize, count: usize) {
        self.emit_rows(Interval::from_len(before, count), |range| {
            ColumnEvent::RowsAboutToBeInserted {
                before: range.start(),
                count: range.len(),
            }
        });
    }

    fn input_rows_inserted(&self, _source: &dyn AbstractColumn, before: usize, count: usize) {
        self.emit_rows(Interval::from_len(before, count), |range| ColumnEvent::RowsInserted {
            before: range.start(),
            count: range.len(),
        });
    }

    fn input_rows_about_to_be_removed(&self, _source: &dyn AbstractColumn, first: usize, count: usize) {
        self.emit_rows(Interval::from_len(first, count), |range| {
            ColumnEvent::RowsAboutToBeRemoved {
                first: range.start(),
                count: range.len(),
            }
        });
    }

    fn input_rows_removed(&self, _source: &dyn AbstractColumn, first: usize, count: usize) {
        self.emit_rows(Interval::from_len(first, count), |range| ColumnEvent::RowsRemoved {
            first: range.start(),
            count: range.len(),
        });
    }
}

impl<K: FilterKernel> Drop for SimpleFilter<K> {
    fn drop(&mut self) {
        self.signals.emit(&*self, &ColumnEvent::AboutToBeDestroyed);
    }
}

/// Object-safe view of any [`SimpleFilter`], used where the kernel type is chosen at run time.
pub trait AbstractSimpleFilter: AbstractFilter + AbstractColumn {
    /// The filter viewed as a column, for wiring it into other filters.
    fn output_column(&self) -> Option<ColumnRef>;

    fn input_column(&self) -> Option<ColumnRef>;

    fn filter_name(&self) -> &'static str;

    fn set_masked_interval(&self, interval: Interval, masked: bool);

    fn clear_masks(&self);

    /// Attributes saved on the `<simple_filter>` element, `filter_name` first.
    fn save_attributes(&self) -> Vec<(&'static str, String)>;

    /// Restore one saved attribute; unknown names return `Ok(false)`.
    fn load_attribute(&self, name: &str, value: &str) -> Result<bool, PersistError>;
}

impl<K: FilterKernel> AbstractSimpleFilter for SimpleFilter<K> {
    fn output_column(&self) -> Option<ColumnRef> {
        self.output(0)
    }

    fn input_column(&self) -> Option<ColumnRef> {
        self.ports.get(0)
    }

    fn filter_name(&self) -> &'static str {
        self.kernel.borrow().filter_name()
    }

    fn set_masked_interval(&self, interval: Interval, masked: bool) {
        SimpleFilter::set_masked_interval(self, interval, masked);
    }

    fn clear_masks(&self) {
        SimpleFilter::clear_masks(self);
    }

    fn save_attributes(&self) -> Vec<(&'static str, String)> {
        let kernel = self.kernel.borrow();
        let mut attributes = vec![("filter_name", kernel.filter_name().to_string())];
        kernel.write_attributes(&mut attributes);
        attributes
    }

    fn load_attribute(&self, name: &str, value: &str) -> Result<bool, PersistError> {
        self.kernel.borrow_mut().read_attribute(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough;

    impl FilterKernel for Passthrough {
        fn filter_name(&self) -> &'static str {
            "PassthroughFilter"
        }
    }

    #[test]
    fn unconnected_filter_is_an_empty_text_column() {
        let filter = SimpleFilter::new(Passthrough);
        assert_eq!(filter.column_mode(), ColumnMode::Text);
        assert_eq!(filter.row_count(), 0);
        assert_eq!(filter.text_at(0), "");
        assert!(!filter.is_invalid(0));
        assert_eq!(filter.input_label(0), "In1");
        assert_eq!(filter.highest_connected_input(), None);
    }

    #[test]
    fn only_port_zero_exists() {
        let filter = SimpleFilter::new(Passthrough);
        let other = SimpleFilter::new(Passthrough);
        assert!(!filter.input(1, other.output(0)));
        assert!(filter.output(1).is_none());
        assert!(filter.input(0, other.output(0)));
        assert_eq!(filter.highest_connected_input(), Some(0));
    }

    #[test]
    fn masking_is_local_to_the_filter() {
        let filter = SimpleFilter::new(Passthrough);
        filter.set_masked_interval(Interval::new(2, 4), true);
        filter.set_masked(3, false);
        assert_eq!(
            filter.masked_intervals(),
            vec![Interval::single(2), Interval::single(4)]
        );
        filter.clear_masks();
        assert!(filter.masked_intervals().is_empty());
    }
}
