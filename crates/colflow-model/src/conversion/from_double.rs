use chrono::NaiveDateTime;
use colflow_format::{format_double, NumberLocale, NumericFormat, EN_US, MAX_DIGITS};

use super::datetime::{day_from_number, from_julian_day, month_from_number, round_to_i64};
use super::{accepts_mode, parse_digits, parse_numeric_format, parse_locale};
use crate::column::abstract_column::AbstractColumn;
use crate::error::PersistError;
use crate::mode::ColumnMode;
use crate::notify::ColumnEvent;
use crate::simple_filter::{FilterKernel, SimpleFilter};

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleToInteger;

impl FilterKernel for DoubleToInteger {
    fn filter_name(&self) -> &'static str {
        "Double2IntegerFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Integer)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Numeric)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        // `as` saturates and maps NaN to 0.
        input.value_at(row).round() as i32
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleToBigInt;

impl FilterKernel for DoubleToBigInt {
    fn filter_name(&self) -> &'static str {
        "Double2BigIntFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::BigInt)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Numeric)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        round_to_i64(input.value_at(row))
    }
}

/// Renders numbers printf-style; the format and digits are adjustable on the filter.
#[derive(Debug, Clone, Copy)]
pub struct DoubleToString {
    pub format: NumericFormat,
    pub digits: usize,
    pub locale: &'static NumberLocale,
}

impl Default for DoubleToString {
    fn default() -> Self {
        Self {
            format: NumericFormat::General,
            digits: 6,
            locale: &EN_US,
        }
    }
}

impl FilterKernel for DoubleToString {
    fn filter_name(&self) -> &'static str {
        "Double2StringFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Text)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Numeric)
    }

    fn text_at(&self, input: &dyn AbstractColumn, row: usize) -> String {
        if input.is_invalid(row) {
            return String::new();
        }
        format_double(input.value_at(row), self.format, self.digits, self.locale)
    }

    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        attributes.push(("format", self.format.as_char().to_string()));
        attributes.push(("digits", self.digits.to_string()));
        attributes.push(("locale", self.locale.id.to_string()));
    }

    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        match name {
            "format" => self.format = parse_numeric_format(name, value)?,
            "digits" => self.digits = parse_digits(name, value)?,
            "locale" => self.locale = parse_locale(name, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl SimpleFilter<DoubleToString> {
    pub fn numeric_format(&self) -> NumericFormat {
        self.kernel().format
    }

    pub fn digits(&self) -> usize {
        self.kernel().digits
    }

    /// Emits [`ColumnEvent::FormatChanged`] when `format` differs from the current one.
    pub fn set_numeric_format(&self, format: NumericFormat) {
        self.update_kernel(ColumnEvent::FormatChanged, |kernel| {
            let changed = kernel.format != format;
            kernel.format = format;
            changed
        });
    }

    /// Emits [`ColumnEvent::DigitsChanged`] when `digits` differs from the current value.
    /// Values above [`MAX_DIGITS`] are clamped.
    pub fn set_digits(&self, digits: usize) {
        let digits = digits.min(MAX_DIGITS);
        self.update_kernel(ColumnEvent::DigitsChanged, |kernel| {
            let changed = kernel.digits != digits;
            kernel.digits = digits;
            changed
        });
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleToDateTime;

impl FilterKernel for DoubleToDateTime {
    fn filter_name(&self) -> &'static str {
        "Double2DateTimeFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::DateTime)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Numeric)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        from_julian_day(input.value_at(row))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleToMonth;

impl FilterKernel for DoubleToMonth {
    fn filter_name(&self) -> &'static str {
        "Double2MonthFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Month)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Numeric)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        let value = input.value_at(row);
        if !value.is_finite() {
            return None;
        }
        month_from_number(round_to_i64(value))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleToDayOfWeek;

impl FilterKernel for DoubleToDayOfWeek {
    fn filter_name(&self) -> &'static str {
        "Double2DayOfWeekFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Day)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Numeric)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        let value = input.value_at(row);
        if !value.is_finite() {
            return None;
        }
        day_from_number(round_to_i64(value))
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }
}
