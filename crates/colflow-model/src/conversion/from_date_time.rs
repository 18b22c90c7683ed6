use super::datetime::{format_date_time, month_number, to_epoch_millis, to_julian_day, weekday_number};
use super::{accepts_date_time, accepts_mode};
use crate::column::abstract_column::AbstractColumn;
use crate::error::PersistError;
use crate::mode::ColumnMode;
use crate::options::DEFAULT_DATE_TIME_FORMAT;
use crate::notify::ColumnEvent;
use crate::simple_filter::{FilterKernel, SimpleFilter};

/// Julian day with the time of day as fraction; invalid dates read as NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToDouble;

impl FilterKernel for DateTimeToDouble {
    fn filter_name(&self) -> &'static str {
        "DateTime2DoubleFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Numeric)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_date_time(source)
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        input.date_time_at(row).map_or(f64::NAN, to_julian_day)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToInteger;

impl FilterKernel for DateTimeToInteger {
    fn filter_name(&self) -> &'static str {
        "DateTime2IntegerFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Integer)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_date_time(source)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        input
            .date_time_at(row)
            .map_or(0, |value| to_julian_day(value).round() as i32)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeToBigInt;

impl FilterKernel for DateTimeToBigInt {
    fn filter_name(&self) -> &'static str {
        "DateTime2BigIntFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::BigInt)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_date_time(source)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        input.date_time_at(row).map_or(0, to_epoch_millis)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

/// strftime rendering. Month and Day columns use it with `%B` / `%A`.
#[derive(Debug, Clone)]
pub struct DateTimeToString {
    pub format: String,
}

impl Default for DateTimeToString {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_TIME_FORMAT.to_string(),
        }
    }
}

impl DateTimeToString {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl SimpleFilter<DateTimeToString> {
    pub fn format(&self) -> String {
        self.kernel().format.clone()
    }

    pub fn set_format(&self, format: impl Into<String>) {
        let format = format.into();
        self.update_kernel(ColumnEvent::FormatChanged, |kernel| {
            if kernel.format == format {
                return false;
            }
            kernel.format = format;
            true
        });
    }
}

impl FilterKernel for DateTimeToString {
    fn filter_name(&self) -> &'static str {
        "DateTime2StringFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Text)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_date_time(source)
    }

    fn text_at(&self, input: &dyn AbstractColumn, row: usize) -> String {
        if input.is_invalid(row) {
            return String::new();
        }
        input
            .date_time_at(row)
            .map(|value| format_date_time(value, &self.format))
            .unwrap_or_default()
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }

    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        attributes.push(("format", self.format.clone()));
    }

    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        if name != "format" {
            return Ok(false);
        }
        self.format = value.to_string();
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonthToDouble;

impl FilterKernel for MonthToDouble {
    fn filter_name(&self) -> &'static str {
        "Month2DoubleFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Numeric)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Month)
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        input
            .date_time_at(row)
            .map_or(0.0, |value| f64::from(month_number(value)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonthToInteger;

impl FilterKernel for MonthToInteger {
    fn filter_name(&self) -> &'static str {
        "Month2IntegerFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Integer)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Month)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        input
            .date_time_at(row)
            .map_or(0, |value| month_number(value) as i32)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonthToBigInt;

impl FilterKernel for MonthToBigInt {
    fn filter_name(&self) -> &'static str {
        "Month2BigIntFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::BigInt)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Month)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        input
            .date_time_at(row)
            .map_or(0, |value| i64::from(month_number(value)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DayOfWeekToDouble;

impl FilterKernel for DayOfWeekToDouble {
    fn filter_name(&self) -> &'static str {
        "DayOfWeek2DoubleFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Numeric)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Day)
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        input
            .date_time_at(row)
            .map_or(0.0, |value| f64::from(weekday_number(value)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DayOfWeekToInteger;

impl FilterKernel for DayOfWeekToInteger {
    fn filter_name(&self) -> &'static str {
        "DayOfWeek2IntegerFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Integer)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Day)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        input
            .date_time_at(row)
            .map_or(0, |value| weekday_number(value) as i32)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DayOfWeekToBigInt;

impl FilterKernel for DayOfWeekToBigInt {
    fn filter_name(&self) -> &'static str {
        "DayOfWeek2BigIntFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::BigInt)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Day)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        input
            .date_time_at(row)
            .map_or(0, |value| i64::from(weekday_number(value)))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || input.date_time_at(row).is_none()
    }
}
