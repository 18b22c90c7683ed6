use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::interval::Interval;
use crate::mode::{ColumnMode, DataType, PlotDesignation};
use crate::notify::Signals;

/// Shared handle to any column-like node of the graph (a [`Column`](crate::Column) or a filter
/// output).
pub type ColumnRef = Rc<dyn AbstractColumn>;

/// One cell read through the accessor matching the column's [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Double(f64),
    Integer(i32),
    BigInt(i64),
    Text(String),
    DateTime(Option<NaiveDateTime>),
}

impl Cell {
    pub fn data_type(&self) -> DataType {
        match self {
            Cell::Double(_) => DataType::Double,
            Cell::Integer(_) => DataType::Integer,
            Cell::BigInt(_) => DataType::BigInt,
            Cell::Text(_) => DataType::Text,
            Cell::DateTime(_) => DataType::DateTime,
        }
    }
}

/// Read side of a column.
///
/// Only the accessor matching [`AbstractColumn::data_type`] returns stored values; the others
/// return `0.0`, `0`, an empty string or `None`. Use [`AbstractColumn::cell`] to read a row
/// without choosing the accessor up front.
pub trait AbstractColumn {
    fn name(&self) -> String;

    fn column_mode(&self) -> ColumnMode;

    fn data_type(&self) -> DataType {
        self.column_mode().data_type()
    }

    fn row_count(&self) -> usize;

    fn plot_designation(&self) -> PlotDesignation {
        PlotDesignation::None
    }

    fn value_at(&self, row: usize) -> f64 {
        let _ = row;
        0.0
    }

    fn integer_at(&self, row: usize) -> i32 {
        let _ = row;
        0
    }

    fn big_int_at(&self, row: usize) -> i64 {
        let _ = row;
        0
    }

    fn text_at(&self, row: usize) -> String {
        let _ = row;
        String::new()
    }

    fn date_time_at(&self, row: usize) -> Option<NaiveDateTime> {
        let _ = row;
        None
    }

    fn date_at(&self, row: usize) -> Option<NaiveDate> {
        self.date_time_at(row).map(|dt| dt.date())
    }

    fn time_at(&self, row: usize) -> Option<NaiveTime> {
        self.date_time_at(row).map(|dt| dt.time())
    }

    /// The row read through the meaningful accessor, `None` past the end.
    fn cell(&self, row: usize) -> Option<Cell> {
        if row >= self.row_count() {
            return None;
        }
        Some(match self.data_type() {
            DataType::Double => Cell::Double(self.value_at(row)),
            DataType::Integer => Cell::Integer(self.integer_at(row)),
            DataType::BigInt => Cell::BigInt(self.big_int_at(row)),
            DataType::Text => Cell::Text(self.text_at(row)),
            DataType::DateTime => Cell::DateTime(self.date_time_at(row)),
        })
    }

    fn is_invalid(&self, row: usize) -> bool {
        let _ = row;
        false
    }

    fn is_invalid_interval(&self, interval: Interval) -> bool {
        interval.rows().all(|row| self.is_invalid(row))
    }

    fn invalid_intervals(&self) -> Vec<Interval> {
        collect_runs(self.row_count(), |row| self.is_invalid(row))
    }

    fn is_masked(&self, row: usize) -> bool {
        let _ = row;
        false
    }

    fn is_masked_interval(&self, interval: Interval) -> bool {
        interval.rows().all(|row| self.is_masked(row))
    }

    fn masked_intervals(&self) -> Vec<Interval> {
        Vec::new()
    }

    fn formula(&self, row: usize) -> Option<String> {
        let _ = row;
        None
    }

    fn signals(&self) -> &Signals;
}

/// Pointer identity of two graph nodes, ignoring vtables.
pub fn same_column(a: &dyn AbstractColumn, b: &dyn AbstractColumn) -> bool {
    std::ptr::eq(
        a as *const dyn AbstractColumn as *const (),
        b as *const dyn AbstractColumn as *const (),
    )
}

/// Group consecutive rows satisfying `pred` into intervals.
pub(crate) fn collect_runs(rows: usize, pred: impl Fn(usize) -> bool) -> Vec<Interval> {
    let mut runs = Vec::new();
    let mut start = None;
    for row in 0..rows {
        match (pred(row), start) {
            (true, None) => start = Some(row),
            (false, Some(s)) => {
                runs.push(Interval::new(s, row - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(Interval::new(s, rows - 1));
    }
    runs
}
