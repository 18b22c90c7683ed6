//! Typed row storage of a [`Column`](super::Column).

use std::ops::Range;

use chrono::NaiveDateTime;

use super::abstract_column::{AbstractColumn, Cell};
use crate::mode::DataType;

/// Row values of one storage kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Double(Vec<f64>),
    Integer(Vec<i32>),
    BigInt(Vec<i64>),
    Text(Vec<String>),
    /// `None` is a date/time that could not be represented.
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Double => ColumnData::Double(Vec::new()),
            DataType::Integer => ColumnData::Integer(Vec::new()),
            DataType::BigInt => ColumnData::BigInt(Vec::new()),
            DataType::Text => ColumnData::Text(Vec::new()),
            DataType::DateTime => ColumnData::DateTime(Vec::new()),
        }
    }

    /// Rows `rows` of `source`, read through the accessor for `data_type`.
    pub fn read_from(source: &dyn AbstractColumn, data_type: DataType, rows: Range<usize>) -> Self {
        match data_type {
            DataType::Double => ColumnData::Double(rows.map(|r| source.value_at(r)).collect()),
            DataType::Integer => ColumnData::Integer(rows.map(|r| source.integer_at(r)).collect()),
            DataType::BigInt => ColumnData::BigInt(rows.map(|r| source.big_int_at(r)).collect()),
            DataType::Text => ColumnData::Text(rows.map(|r| source.text_at(r)).collect()),
            DataType::DateTime => {
                ColumnData::DateTime(rows.map(|r| source.date_time_at(r)).collect())
            }
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ColumnData::Double(_) => DataType::Double,
            ColumnData::Integer(_) => DataType::Integer,
            ColumnData::BigInt(_) => DataType::BigInt,
            ColumnData::Text(_) => DataType::Text,
            ColumnData::DateTime(_) => DataType::DateTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Double(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::BigInt(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cell(&self, row: usize) -> Option<Cell> {
        match self {
            ColumnData::Double(v) => v.get(row).map(|x| Cell::Double(*x)),
            ColumnData::Integer(v) => v.get(row).map(|x| Cell::Integer(*x)),
            ColumnData::BigInt(v) => v.get(row).map(|x| Cell::BigInt(*x)),
            ColumnData::Text(v) => v.get(row).map(|x| Cell::Text(x.clone())),
            ColumnData::DateTime(v) => v.get(row).map(|x| Cell::DateTime(*x)),
        }
    }

    /// Grow with blank rows (NaN, 0, empty text, no date) or truncate.
    pub fn resize(&mut self, rows: usize) {
        match self {
            ColumnData::Double(v) => v.resize(rows, f64::NAN),
            ColumnData::Integer(v) => v.resize(rows, 0),
            ColumnData::BigInt(v) => v.resize(rows, 0),
            ColumnData::Text(v) => v.resize(rows, String::new()),
            ColumnData::DateTime(v) => v.resize(rows, None),
        }
    }

    /// Insert `count` blank rows before `before`, clamped to the end.
    pub fn insert_rows(&mut self, before: usize, count: usize) {
        let at = before.min(self.len());
        match self {
            ColumnData::Double(v) => splice_blank(v, at, count, f64::NAN),
            ColumnData::Integer(v) => splice_blank(v, at, count, 0),
            ColumnData::BigInt(v) => splice_blank(v, at, count, 0),
            ColumnData::Text(v) => splice_blank(v, at, count, String::new()),
            ColumnData::DateTime(v) => splice_blank(v, at, count, None),
        }
    }

    /// Remove up to `count` rows starting at `first`.
    pub fn remove_rows(&mut self, first: usize, count: usize) {
        let len = self.len();
        let start = first.min(len);
        let end = first.saturating_add(count).min(len);
        match self {
            ColumnData::Double(v) => drop(v.drain(start..end)),
            ColumnData::Integer(v) => drop(v.drain(start..end)),
            ColumnData::BigInt(v) => drop(v.drain(start..end)),
            ColumnData::Text(v) => drop(v.drain(start..end)),
            ColumnData::DateTime(v) => drop(v.drain(start..end)),
        }
    }

    /// Overwrite rows starting at `first` with `values`, growing with blank rows as needed.
    ///
    /// Returns `false` and leaves `self` untouched when the storage kinds differ.
    pub fn write_at(&mut self, first: usize, values: ColumnData) -> bool {
        match (self, values) {
            (ColumnData::Double(dst), ColumnData::Double(src)) => overwrite(dst, first, src, f64::NAN),
            (ColumnData::Integer(dst), ColumnData::Integer(src)) => overwrite(dst, first, src, 0),
            (ColumnData::BigInt(dst), ColumnData::BigInt(src)) => overwrite(dst, first, src, 0),
            (ColumnData::Text(dst), ColumnData::Text(src)) => {
                overwrite(dst, first, src, String::new())
            }
            (ColumnData::DateTime(dst), ColumnData::DateTime(src)) => overwrite(dst, first, src, None),
            _ => return false,
        }
        true
    }
}

impl From<Cell> for ColumnData {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Double(v) => ColumnData::Double(vec![v]),
            Cell::Integer(v) => ColumnData::Integer(vec![v]),
            Cell::BigInt(v) => ColumnData::BigInt(vec![v]),
            Cell::Text(v) => ColumnData::Text(vec![v]),
            Cell::DateTime(v) => ColumnData::DateTime(vec![v]),
        }
    }
}

fn splice_blank<T: Clone>(values: &mut Vec<T>, at: usize, count: usize, blank: T) {
    values.splice(at..at, std::iter::repeat(blank).take(count));
}

fn overwrite<T: Clone>(dst: &mut Vec<T>, first: usize, src: Vec<T>, blank: T) {
    let end = first + src.len();
    if dst.len() < end {
        dst.resize(end, blank);
    }
    for (slot, value) in dst[first..end].iter_mut().zip(src) {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_past_the_end_pads_with_blank_rows() {
        let mut data = ColumnData::Integer(vec![1, 2]);
        assert!(data.write_at(4, ColumnData::Integer(vec![7, 8])));
        assert_eq!(data, ColumnData::Integer(vec![1, 2, 0, 0, 7, 8]));
        assert!(!data.write_at(0, ColumnData::Text(vec!["x".into()])));
        assert_eq!(data.len(), 6);
    }

    #[test]
    fn row_edits_are_clamped() {
        let mut data = ColumnData::Text(vec!["a".into(), "b".into(), "c".into()]);
        data.insert_rows(10, 1);
        data.remove_rows(1, 10);
        assert_eq!(data, ColumnData::Text(vec!["a".into()]));
    }

    #[test]
    fn blank_doubles_are_nan() {
        let mut data = ColumnData::empty(DataType::Double);
        data.insert_rows(0, 2);
        match &data {
            ColumnData::Double(v) => assert!(v.iter().all(|x| x.is_nan())),
            other => panic!("unexpected storage {other:?}"),
        }
        assert_eq!(data.cell(5), None);
    }
}
