//! Columns: typed row storage plus the filters translating it to and from text.

pub mod abstract_column;
mod data;
mod io;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use self::abstract_column::{collect_runs, AbstractColumn, Cell, ColumnRef};
pub use self::data::ColumnData;
pub use self::io::{ColumnStringIo, InputFilter, OutputFilter};
use crate::conversion::converter;
use crate::conversion::datetime::reference_date;
use crate::interval::{Interval, IntervalAttribute};
use crate::mode::{ColumnMode, DataType, PlotDesignation};
use crate::notify::{ColumnEvent, EventMask, Signals, SubscriptionId};
use crate::options::ColumnOptions;
use crate::simple_filter::AbstractSimpleFilter;

/// Everything a column holds per row, captured for undo.
#[derive(Debug, Clone)]
pub(crate) struct ColumnContents {
    pub(crate) data: ColumnData,
    pub(crate) validity: IntervalAttribute<bool>,
    pub(crate) masking: IntervalAttribute<bool>,
    pub(crate) formulas: IntervalAttribute<String>,
}

struct ColumnState {
    mode: ColumnMode,
    data: ColumnData,
    validity: IntervalAttribute<bool>,
    masking: IntervalAttribute<bool>,
    formulas: IntervalAttribute<String>,
    plot_designation: PlotDesignation,
    width: u32,
}

/// A named, typed column.
///
/// Storage always matches the mode's [`DataType`]. Text enters through the input filter (fed by
/// the column's [`ColumnStringIo`]) and leaves through the output filter (fed by the column), so
/// the display format lives on [`Column::output_filter`]. Every mutation is bracketed by the
/// matching pair of [`ColumnEvent`]s; calls that change nothing stay silent.
pub struct Column {
    this: Weak<Column>,
    name: RefCell<String>,
    comment: RefCell<String>,
    options: ColumnOptions,
    state: RefCell<ColumnState>,
    string_io: Rc<ColumnStringIo>,
    input_filter: RefCell<InputFilter>,
    output_filter: RefCell<OutputFilter>,
    format_subscription: RefCell<Option<SubscriptionId>>,
    signals: Signals,
}

impl Column {
    pub fn new(name: impl Into<String>, mode: ColumnMode) -> Rc<Self> {
        Self::with_options(name, mode, ColumnOptions::default())
    }

    /// Empty column whose filters are configured from `options`.
    pub fn with_options(name: impl Into<String>, mode: ColumnMode, options: ColumnOptions) -> Rc<Self> {
        let data = ColumnData::empty(mode.data_type());
        Self::build(name.into(), mode, options, data, IntervalAttribute::new())
    }

    pub fn from_values(name: impl Into<String>, values: Vec<f64>) -> Rc<Self> {
        Self::build(
            name.into(),
            ColumnMode::Numeric,
            ColumnOptions::default(),
            ColumnData::Double(values),
            IntervalAttribute::new(),
        )
    }

    pub fn from_integers(name: impl Into<String>, values: Vec<i32>) -> Rc<Self> {
        Self::build(
            name.into(),
            ColumnMode::Integer,
            ColumnOptions::default(),
            ColumnData::Integer(values),
            IntervalAttribute::new(),
        )
    }

    pub fn from_big_ints(name: impl Into<String>, values: Vec<i64>) -> Rc<Self> {
        Self::build(
            name.into(),
            ColumnMode::BigInt,
            ColumnOptions::default(),
            ColumnData::BigInt(values),
            IntervalAttribute::new(),
        )
    }

    pub fn from_texts(name: impl Into<String>, values: Vec<String>) -> Rc<Self> {
        Self::build(
            name.into(),
            ColumnMode::Text,
            ColumnOptions::default(),
            ColumnData::Text(values),
            IntervalAttribute::new(),
        )
    }

    /// Date/time column in `mode` (`DateTime`, `Month` or `Day`; anything else falls back to
    /// `DateTime`). Rows without a value are invalid in addition to those flagged in `validity`.
    pub fn from_date_times(
        name: impl Into<String>,
        mode: ColumnMode,
        values: Vec<Option<NaiveDateTime>>,
        validity: IntervalAttribute<bool>,
    ) -> Rc<Self> {
        let mode = if mode.data_type() == DataType::DateTime {
            mode
        } else {
            log::warn!("{mode} is not a date/time mode, using {}", ColumnMode::DateTime);
            ColumnMode::DateTime
        };
        let mut validity = validity;
        for run in collect_runs(values.len(), |row| values[row].is_none()) {
            validity.set(run, true);
        }
        Self::build(
            name.into(),
            mode,
            ColumnOptions::default(),
            ColumnData::DateTime(values),
            validity,
        )
    }

    fn build(
        name: String,
        mode: ColumnMode,
        options: ColumnOptions,
        data: ColumnData,
        validity: IntervalAttribute<bool>,
    ) -> Rc<Self> {
        let input_filter = InputFilter::for_mode(mode, &options);
        let output_filter = OutputFilter::for_mode(mode, &options);
        let column = Rc::new_cyclic(|this: &Weak<Column>| Column {
            this: this.clone(),
            name: RefCell::new(name),
            comment: RefCell::new(String::new()),
            options,
            state: RefCell::new(ColumnState {
                mode,
                data,
                validity,
                masking: IntervalAttribute::new(),
                formulas: IntervalAttribute::new(),
                plot_designation: PlotDesignation::None,
                width: 0,
            }),
            string_io: ColumnStringIo::new(this.clone()),
            input_filter: RefCell::new(input_filter),
            output_filter: RefCell::new(output_filter),
            format_subscription: RefCell::new(None),
            signals: Signals::new(),
        });
        column.connect_filters();
        column
    }

    /// Wire the input filter to the string view and the output filter to the column.
    fn connect_filters(&self) {
        let input = self.input_filter.borrow().filter();
        let io: ColumnRef = self.string_io.clone();
        input.input(0, Some(io));

        let output = self.output_filter.borrow().filter();
        if let Some(this) = self.this.upgrade() {
            let this: ColumnRef = this;
            output.input(0, Some(this));
        }
        let this = self.this.clone();
        let id = output
            .signals()
            .connect_fn(EventMask::FORMAT, move |_: &dyn AbstractColumn, _: &ColumnEvent| {
                if let Some(column) = this.upgrade() {
                    column.output_format_changed();
                }
            });
        self.format_subscription.replace(Some(id));
    }

    /// Display parameters changed: values are the same, their text is not.
    fn output_format_changed(&self) {
        let output = self.output_filter.borrow().clone();
        let input = self.input_filter.borrow().clone();
        if let (OutputFilter::DateTime(output), InputFilter::DateTime(input)) = (&output, &input) {
            input.set_format(Some(output.format()));
        }
        self.emit(ColumnEvent::DataAboutToChange);
        self.emit(ColumnEvent::DataChanged);
    }

    fn emit(&self, event: ColumnEvent) {
        self.signals.emit(self, &event);
    }

    pub fn options(&self) -> &ColumnOptions {
        &self.options
    }

    pub fn comment(&self) -> String {
        self.comment.borrow().clone()
    }

    pub fn width(&self) -> u32 {
        self.state.borrow().width
    }

    pub fn input_filter(&self) -> Rc<dyn AbstractSimpleFilter> {
        self.input_filter.borrow().filter()
    }

    pub fn output_filter(&self) -> OutputFilter {
        self.output_filter.borrow().clone()
    }

    pub fn formula_intervals(&self) -> Vec<(Interval, String)> {
        self.state.borrow().formulas.entries().to_vec()
    }

    /// Display text of `row` as rendered by the output filter.
    pub fn formatted_text(&self, row: usize) -> String {
        let output = self.output_filter.borrow().column();
        output.text_at(row)
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        if *self.name.borrow() == name {
            return;
        }
        self.emit(ColumnEvent::DescriptionAboutToChange);
        self.name.replace(name);
        self.emit(ColumnEvent::DescriptionChanged);
    }

    pub fn set_comment(&self, comment: impl Into<String>) {
        let comment = comment.into();
        if *self.comment.borrow() == comment {
            return;
        }
        self.emit(ColumnEvent::DescriptionAboutToChange);
        self.comment.replace(comment);
        self.emit(ColumnEvent::DescriptionChanged);
    }

    pub fn set_plot_designation(&self, designation: PlotDesignation) {
        if self.state.borrow().plot_designation == designation {
            return;
        }
        self.emit(ColumnEvent::PlotDesignationAboutToChange);
        self.state.borrow_mut().plot_designation = designation;
        self.emit(ColumnEvent::PlotDesignationChanged);
    }

    /// Display width hint; not announced.
    pub fn set_width(&self, width: u32) {
        self.state.borrow_mut().width = width;
    }

    /// Switch the column to `mode`, converting stored values when the storage kind changes.
    ///
    /// Conversion into Text renders through the current output filter, so the display format is
    /// kept. Consumers of the old output filter are rewired to the new one.
    pub fn set_column_mode(&self, mode: ColumnMode) {
        self.switch_mode(mode, None);
    }

    /// Switch to `mode` and install `filters`, or fresh filters for `mode` when `None`.
    ///
    /// Returns the detached filters it replaced, or `None` when the column already had `mode`.
    /// `filters` must have been built for `mode`.
    pub(crate) fn switch_mode(
        &self,
        mode: ColumnMode,
        filters: Option<(InputFilter, OutputFilter)>,
    ) -> Option<(InputFilter, OutputFilter)> {
        let old = self.column_mode();
        if old == mode {
            return None;
        }
        log::debug!("column `{}`: switching from {old} to {mode}", self.name());

        self.emit(ColumnEvent::ModeAboutToChange);
        let converted = (old.data_type() != mode.data_type()).then(|| {
            self.converted_storage(mode).unwrap_or_else(|| {
                log::warn!("column `{}`: no conversion from {old} to {mode}", self.name());
                let rows = self.row_count();
                let mut data = ColumnData::empty(mode.data_type());
                data.resize(rows);
                let mut validity = IntervalAttribute::new();
                if let Some(all) = Interval::from_len(0, rows) {
                    validity.set(all, true);
                }
                (data, validity)
            })
        });
        {
            let mut state = self.state.borrow_mut();
            state.mode = mode;
            if let Some((data, validity)) = converted {
                state.data = data;
                state.validity = validity;
            }
        }

        let (new_input, new_output) = filters.unwrap_or_else(|| {
            (
                InputFilter::for_mode(mode, &self.options),
                OutputFilter::for_mode(mode, &self.options),
            )
        });
        let replacement = new_output.column();
        let old_input = self.input_filter.replace(new_input);
        let old_output = self.output_filter.replace(new_output);
        self.detach_filters(&old_input, &old_output);
        self.connect_filters();

        let old_column = old_output.column();
        old_column
            .signals()
            .emit(old_column.as_ref(), &ColumnEvent::AboutToBeReplaced(replacement));
        drop(old_column);

        self.emit(ColumnEvent::ModeChanged);
        Some((old_input, old_output))
    }

    /// Unhook filters that are no longer installed from the column and its string view.
    fn detach_filters(&self, input: &InputFilter, output: &OutputFilter) {
        let output = output.filter();
        if let Some(id) = self.format_subscription.take() {
            output.signals().disconnect(id);
        }
        output.input(0, None);
        input.filter().input(0, None);
    }

    /// Current rows converted to `mode`'s storage, with validity from the converter.
    fn converted_storage(&self, mode: ColumnMode) -> Option<(ColumnData, IntervalAttribute<bool>)> {
        let rows = self.row_count();
        let filter: ColumnRef = if mode == ColumnMode::Text {
            self.output_filter.borrow().column()
        } else {
            let filter = converter(self.column_mode(), mode, &self.options)?;
            let this: ColumnRef = self.this.upgrade()?;
            if !filter.input(0, Some(this)) {
                return None;
            }
            filter.output_column()?
        };
        let data = ColumnData::read_from(filter.as_ref(), mode.data_type(), 0..rows);
        let mut validity = IntervalAttribute::new();
        for run in collect_runs(rows, |row| filter.is_invalid(row)) {
            validity.set(run, true);
        }
        Some((data, validity))
    }

    /// Replace all rows with those of `other`, including their validity.
    ///
    /// Returns `false` and changes nothing when the modes differ.
    pub fn copy(&self, other: &dyn AbstractColumn) -> bool {
        if other.column_mode() != self.column_mode() {
            log::debug!(
                "cannot copy {} column `{}` into {} column `{}`",
                other.column_mode(),
                other.name(),
                self.column_mode(),
                self.name()
            );
            return false;
        }
        let rows = other.row_count();
        let data = ColumnData::read_from(other, self.data_type(), 0..rows);
        let mut validity = IntervalAttribute::new();
        for run in other.invalid_intervals() {
            validity.set(run, true);
        }

        self.emit(ColumnEvent::DataAboutToChange);
        {
            let mut state = self.state.borrow_mut();
            state.data = data;
            state.validity = validity;
        }
        self.emit(ColumnEvent::DataChanged);
        true
    }

    /// Copy `count` rows of `other` starting at `source_start` to rows starting at `dest_start`.
    ///
    /// Rows past the end of `other` are not copied. The column grows as needed; rows between the
    /// old end and `dest_start` become invalid.
    pub fn copy_rows(
        &self,
        other: &dyn AbstractColumn,
        source_start: usize,
        dest_start: usize,
        count: usize,
    ) -> bool {
        if other.column_mode() != self.column_mode() {
            log::debug!(
                "cannot copy rows of {} column `{}` into {} column `{}`",
                other.column_mode(),
                other.name(),
                self.column_mode(),
                self.name()
            );
            return false;
        }
        let count = count.min(other.row_count().saturating_sub(source_start));
        if count == 0 {
            return true;
        }
        let rows = source_start..source_start + count;
        let data = ColumnData::read_from(other, self.data_type(), rows.clone());
        let invalid: Vec<bool> = rows.map(|row| other.is_invalid(row)).collect();

        self.emit(ColumnEvent::DataAboutToChange);
        {
            let mut state = self.state.borrow_mut();
            let old_len = state.data.len();
            state.data.write_at(dest_start, data);
            if dest_start > old_len {
                state.validity.set(Interval::new(old_len, dest_start - 1), true);
            }
            for (offset, flag) in invalid.into_iter().enumerate() {
                state.validity.set(Interval::single(dest_start + offset), flag);
            }
        }
        self.emit(ColumnEvent::DataChanged);
        true
    }

    /// Insert `count` invalid blank rows before `before` (clamped to the end).
    pub fn insert_rows(&self, before: usize, count: usize) {
        if count == 0 {
            return;
        }
        let before = before.min(self.row_count());
        self.emit(ColumnEvent::RowsAboutToBeInserted { before, count });
        {
            let mut state = self.state.borrow_mut();
            state.data.insert_rows(before, count);
            state.validity.insert_rows(before, count);
            if let Some(inserted) = Interval::from_len(before, count) {
                state.validity.set(inserted, true);
            }
            state.masking.insert_rows(before, count);
            state.formulas.insert_rows(before, count);
        }
        self.emit(ColumnEvent::RowsInserted { before, count });
    }

    /// Remove up to `count` rows starting at `first`.
    pub fn remove_rows(&self, first: usize, count: usize) {
        let count = count.min(self.row_count().saturating_sub(first));
        if count == 0 {
            return;
        }
        self.emit(ColumnEvent::RowsAboutToBeRemoved { first, count });
        {
            let mut state = self.state.borrow_mut();
            state.data.remove_rows(first, count);
            state.validity.remove_rows(first, count);
            state.masking.remove_rows(first, count);
            state.formulas.remove_rows(first, count);
        }
        self.emit(ColumnEvent::RowsRemoved { first, count });
    }

    /// Remove every row.
    pub fn clear(&self) {
        self.remove_rows(0, self.row_count());
    }

    pub fn set_value_at(&self, row: usize, value: f64) -> bool {
        self.replace_values(row, vec![value])
    }

    pub fn set_integer_at(&self, row: usize, value: i32) -> bool {
        self.replace_integers(row, vec![value])
    }

    pub fn set_big_int_at(&self, row: usize, value: i64) -> bool {
        self.replace_big_ints(row, vec![value])
    }

    pub fn set_date_time_at(&self, row: usize, value: NaiveDateTime) -> bool {
        self.replace_date_times(row, vec![value])
    }

    /// Keeps the row's time of day (midnight for rows without a value).
    pub fn set_date_at(&self, row: usize, date: NaiveDate) -> bool {
        let time = self.time_at(row).unwrap_or(NaiveTime::MIN);
        self.set_date_time_at(row, date.and_time(time))
    }

    /// Keeps the row's date (1900-01-01 for rows without a value).
    pub fn set_time_at(&self, row: usize, time: NaiveTime) -> bool {
        let date = self.date_at(row).unwrap_or_else(reference_date);
        self.set_date_time_at(row, date.and_time(time))
    }

    /// Store `text` in `row`, parsed through the input filter unless the column holds text.
    ///
    /// Text the input filter cannot parse is stored as the filter's fallback value and the row
    /// becomes invalid.
    pub fn set_text_at(&self, row: usize, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.column_mode() == ColumnMode::Text {
            return self.replace_texts(row, vec![text]);
        }
        self.string_io.set_pending(row, text);
        let input = self.input_filter();
        let parsed = input.cell(row);
        let invalid = input.is_invalid(row);
        self.string_io.clear_pending();

        match parsed {
            Some(cell) => self.replace_data(row, ColumnData::from(cell), invalid),
            None => false,
        }
    }

    pub fn replace_values(&self, first: usize, values: Vec<f64>) -> bool {
        self.replace_data(first, ColumnData::Double(values), false)
    }

    pub fn replace_integers(&self, first: usize, values: Vec<i32>) -> bool {
        self.replace_data(first, ColumnData::Integer(values), false)
    }

    pub fn replace_big_ints(&self, first: usize, values: Vec<i64>) -> bool {
        self.replace_data(first, ColumnData::BigInt(values), false)
    }

    pub fn replace_texts(&self, first: usize, values: Vec<String>) -> bool {
        self.replace_data(first, ColumnData::Text(values), false)
    }

    pub fn replace_date_times(&self, first: usize, values: Vec<NaiveDateTime>) -> bool {
        let values = values.into_iter().map(Some).collect();
        self.replace_data(first, ColumnData::DateTime(values), false)
    }

    /// Overwrite rows from `first`, growing the column; gap rows become invalid and written rows
    /// take `invalid`. Returns `false` when `values` does not match the storage kind.
    pub(crate) fn replace_data(&self, first: usize, values: ColumnData, invalid: bool) -> bool {
        if values.data_type() != self.data_type() {
            log::debug!(
                "column `{}` stores {:?}, refusing {:?} values",
                self.name(),
                self.data_type(),
                values.data_type()
            );
            return false;
        }
        let Some(written) = Interval::from_len(first, values.len()) else {
            return true;
        };

        self.emit(ColumnEvent::DataAboutToChange);
        {
            let mut state = self.state.borrow_mut();
            let old_len = state.data.len();
            state.data.write_at(first, values);
            if first > old_len {
                state.validity.set(Interval::new(old_len, first - 1), true);
            }
            state.validity.set(written, invalid);
        }
        self.emit(ColumnEvent::DataChanged);
        true
    }

    pub fn set_invalid(&self, row: usize, invalid: bool) {
        self.set_invalid_interval(Interval::single(row), invalid);
    }

    pub fn set_invalid_interval(&self, interval: Interval, invalid: bool) {
        self.emit(ColumnEvent::DataAboutToChange);
        self.state.borrow_mut().validity.set(interval, invalid);
        self.emit(ColumnEvent::DataChanged);
    }

    pub fn clear_validity(&self) {
        self.emit(ColumnEvent::DataAboutToChange);
        self.state.borrow_mut().validity.clear();
        self.emit(ColumnEvent::DataChanged);
    }

    pub fn set_masked(&self, row: usize, masked: bool) {
        self.set_masked_interval(Interval::single(row), masked);
    }

    pub fn set_masked_interval(&self, interval: Interval, masked: bool) {
        self.emit(ColumnEvent::MaskingAboutToChange);
        self.state.borrow_mut().masking.set(interval, masked);
        self.emit(ColumnEvent::MaskingChanged);
    }

    pub fn clear_masks(&self) {
        self.emit(ColumnEvent::MaskingAboutToChange);
        self.state.borrow_mut().masking.clear();
        self.emit(ColumnEvent::MaskingChanged);
    }

    /// Formulas are annotations; changing them is not announced.
    pub fn set_formula(&self, row: usize, formula: impl Into<String>) {
        self.set_formula_interval(Interval::single(row), formula);
    }

    /// An empty `formula` removes the formulas of `interval`.
    pub fn set_formula_interval(&self, interval: Interval, formula: impl Into<String>) {
        let formula = formula.into();
        let mut state = self.state.borrow_mut();
        if formula.is_empty() {
            state.formulas.reset(interval);
        } else {
            state.formulas.set_value(interval, formula);
        }
    }

    pub fn clear_formulas(&self) {
        self.state.borrow_mut().formulas.clear();
    }

    pub(crate) fn contents(&self) -> ColumnContents {
        let state = self.state.borrow();
        ColumnContents {
            data: state.data.clone(),
            validity: state.validity.clone(),
            masking: state.masking.clone(),
            formulas: state.formulas.clone(),
        }
    }

    /// Put back captured contents; announced as a data change followed by a masking change.
    pub(crate) fn restore_contents(&self, contents: ColumnContents) {
        if contents.data.data_type() != self.data_type() {
            log::warn!(
                "column `{}`: cannot restore {:?} rows into {:?} storage",
                self.name(),
                contents.data.data_type(),
                self.data_type()
            );
            return;
        }
        let ColumnContents {
            data,
            validity,
            masking,
            formulas,
        } = contents;

        self.emit(ColumnEvent::DataAboutToChange);
        {
            let mut state = self.state.borrow_mut();
            state.data = data;
            state.validity = validity;
            state.formulas = formulas;
        }
        self.emit(ColumnEvent::DataChanged);

        self.emit(ColumnEvent::MaskingAboutToChange);
        self.state.borrow_mut().masking = masking;
        self.emit(ColumnEvent::MaskingChanged);
    }

    pub(crate) fn masking(&self) -> IntervalAttribute<bool> {
        self.state.borrow().masking.clone()
    }

    pub(crate) fn restore_masking(&self, masking: IntervalAttribute<bool>) {
        self.emit(ColumnEvent::MaskingAboutToChange);
        self.state.borrow_mut().masking = masking;
        self.emit(ColumnEvent::MaskingChanged);
    }

    pub(crate) fn formulas(&self) -> IntervalAttribute<String> {
        self.state.borrow().formulas.clone()
    }

    pub(crate) fn restore_formulas(&self, formulas: IntervalAttribute<String>) {
        self.state.borrow_mut().formulas = formulas;
    }
}

impl AbstractColumn for Column {
    fn name(&self) -> String {
        self.name.borrow().clone()
    }

    fn column_mode(&self) -> ColumnMode {
        self.state.borrow().mode
    }

    fn row_count(&self) -> usize {
        self.state.borrow().data.len()
    }

    fn plot_designation(&self) -> PlotDesignation {
        self.state.borrow().plot_designation
    }

    /// NaN past the end of a Numeric column.
    fn value_at(&self, row: usize) -> f64 {
        match &self.state.borrow().data {
            ColumnData::Double(values) => values.get(row).copied().unwrap_or(f64::NAN),
            _ => 0.0,
        }
    }

    fn integer_at(&self, row: usize) -> i32 {
        match &self.state.borrow().data {
            ColumnData::Integer(values) => values.get(row).copied().unwrap_or(0),
            _ => 0,
        }
    }

    fn big_int_at(&self, row: usize) -> i64 {
        match &self.state.borrow().data {
            ColumnData::BigInt(values) => values.get(row).copied().unwrap_or(0),
            _ => 0,
        }
    }

    fn text_at(&self, row: usize) -> String {
        match &self.state.borrow().data {
            ColumnData::Text(values) => values.get(row).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn date_time_at(&self, row: usize) -> Option<NaiveDateTime> {
        match &self.state.borrow().data {
            ColumnData::DateTime(values) => values.get(row).copied().flatten(),
            _ => None,
        }
    }

    fn cell(&self, row: usize) -> Option<Cell> {
        self.state.borrow().data.cell(row)
    }

    fn is_invalid(&self, row: usize) -> bool {
        self.state.borrow().validity.is_set(row)
    }

    fn is_invalid_interval(&self, interval: Interval) -> bool {
        self.state.borrow().validity.is_set_interval(interval)
    }

    fn invalid_intervals(&self) -> Vec<Interval> {
        self.state.borrow().validity.intervals()
    }

    fn is_masked(&self, row: usize) -> bool {
        self.state.borrow().masking.is_set(row)
    }

    fn is_masked_interval(&self, interval: Interval) -> bool {
        self.state.borrow().masking.is_set_interval(interval)
    }

    fn masked_intervals(&self) -> Vec<Interval> {
        self.state.borrow().masking.intervals()
    }

    fn formula(&self, row: usize) -> Option<String> {
        self.state.borrow().formulas.value(row).cloned()
    }

    fn signals(&self) -> &Signals {
        &self.signals
    }
}

impl Drop for Column {
    fn drop(&mut self) {
        self.signals.emit(&*self, &ColumnEvent::AboutToBeDestroyed);
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name())
            .field("mode", &self.column_mode())
            .field("rows", &self.row_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_accessors_are_neutral() {
        let column = Column::from_integers("n", vec![4, 5]);
        assert_eq!(column.integer_at(1), 5);
        assert_eq!(column.value_at(1), 0.0);
        assert_eq!(column.text_at(1), "");
        assert_eq!(column.date_time_at(1), None);
        assert_eq!(column.cell(2), None);
    }

    #[test]
    fn output_filter_formats_rows() {
        let column = Column::from_values("x", vec![1.5, 2.0]);
        column.set_invalid(1, true);
        assert_eq!(column.formatted_text(0), "1.5");
        assert_eq!(column.formatted_text(1), "");
    }

    #[test]
    fn replacing_past_the_end_invalidates_the_gap() {
        let column = Column::from_values("x", vec![1.0]);
        assert!(column.replace_values(3, vec![4.0, 5.0]));
        assert_eq!(column.row_count(), 5);
        assert_eq!(column.invalid_intervals(), vec![Interval::new(1, 2)]);
        assert!(column.value_at(1).is_nan());
        assert!(!column.replace_texts(0, vec!["a".into()]));
    }

    #[test]
    fn text_is_parsed_through_the_input_filter() {
        let column = Column::new("x", ColumnMode::Integer);
        assert!(column.set_text_at(0, "42"));
        assert!(column.set_text_at(1, "forty"));
        assert_eq!(column.integer_at(0), 42);
        assert_eq!(column.integer_at(1), 0);
        assert_eq!(column.invalid_intervals(), vec![Interval::single(1)]);
    }
}
