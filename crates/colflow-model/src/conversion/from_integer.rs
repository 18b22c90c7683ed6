use chrono::NaiveDateTime;
use colflow_format::format_integer;

use super::accepts_mode;
use super::datetime::{day_from_number, from_julian_day, month_from_number};
use crate::column::abstract_column::AbstractColumn;
use crate::mode::ColumnMode;
use crate::simple_filter::FilterKernel;

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToDouble;

impl FilterKernel for IntegerToDouble {
    fn filter_name(&self) -> &'static str {
        "Integer2DoubleFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Numeric)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Integer)
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        f64::from(input.integer_at(row))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToBigInt;

impl FilterKernel for IntegerToBigInt {
    fn filter_name(&self) -> &'static str {
        "Integer2BigIntFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::BigInt)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Integer)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        i64::from(input.integer_at(row))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToString;

impl FilterKernel for IntegerToString {
    fn filter_name(&self) -> &'static str {
        "Integer2StringFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Text)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Integer)
    }

    fn text_at(&self, input: &dyn AbstractColumn, row: usize) -> String {
        if input.is_invalid(row) {
            return String::new();
        }
        format_integer(i64::from(input.integer_at(row)))
    }
}

/// Whole Julian day numbers, read at noon.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToDateTime;

impl FilterKernel for IntegerToDateTime {
    fn filter_name(&self) -> &'static str {
        "Integer2DateTimeFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::DateTime)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Integer)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        from_julian_day(f64::from(input.integer_at(row)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToMonth;

impl FilterKernel for IntegerToMonth {
    fn filter_name(&self) -> &'static str {
        "Integer2MonthFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Month)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Integer)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        month_from_number(i64::from(input.integer_at(row)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerToDayOfWeek;

impl FilterKernel for IntegerToDayOfWeek {
    fn filter_name(&self) -> &'static str {
        "Integer2DayOfWeekFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Day)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Integer)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        day_from_number(i64::from(input.integer_at(row)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}
