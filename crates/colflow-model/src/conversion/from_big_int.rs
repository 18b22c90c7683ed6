use chrono::NaiveDateTime;
use colflow_format::format_integer;

use super::accepts_mode;
use super::datetime::{day_from_number, from_epoch_millis, month_from_number};
use crate::column::abstract_column::AbstractColumn;
use crate::mode::ColumnMode;
use crate::simple_filter::FilterKernel;

#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntToDouble;

impl FilterKernel for BigIntToDouble {
    fn filter_name(&self) -> &'static str {
        "BigInt2DoubleFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Numeric)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::BigInt)
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        input.big_int_at(row) as f64
    }
}

/// Values outside the `i32` range saturate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntToInteger;

impl FilterKernel for BigIntToInteger {
    fn filter_name(&self) -> &'static str {
        "BigInt2IntegerFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Integer)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::BigInt)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        let value = input.big_int_at(row);
        value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntToString;

impl FilterKernel for BigIntToString {
    fn filter_name(&self) -> &'static str {
        "BigInt2StringFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Text)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::BigInt)
    }

    fn text_at(&self, input: &dyn AbstractColumn, row: usize) -> String {
        if input.is_invalid(row) {
            return String::new();
        }
        format_integer(input.big_int_at(row))
    }
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntToDateTime;

impl FilterKernel for BigIntToDateTime {
    fn filter_name(&self) -> &'static str {
        "BigInt2DateTimeFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::DateTime)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::BigInt)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        from_epoch_millis(input.big_int_at(row))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntToMonth;

impl FilterKernel for BigIntToMonth {
    fn filter_name(&self) -> &'static str {
        "BigInt2MonthFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Month)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::BigInt)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        month_from_number(input.big_int_at(row))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntToDayOfWeek;

impl FilterKernel for BigIntToDayOfWeek {
    fn filter_name(&self) -> &'static str {
        "BigInt2DayOfWeekFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Day)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::BigInt)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        day_from_number(input.big_int_at(row))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}
