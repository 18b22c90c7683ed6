use chrono::NaiveDateTime;
use colflow_format::{parse_double, parse_integer, NumberLocale, EN_US};

use super::datetime::{day_from_number, month_from_number, parse_date_time, parse_day, parse_month};
use super::{accepts_mode, parse_locale};
use crate::column::abstract_column::AbstractColumn;
use crate::error::PersistError;
use crate::mode::ColumnMode;
use crate::notify::ColumnEvent;
use crate::simple_filter::{FilterKernel, SimpleFilter};

/// Locale-aware number parsing; unparseable text reads as 0 and is invalid.
#[derive(Debug, Clone, Copy)]
pub struct StringToDouble {
    pub locale: &'static NumberLocale,
}

impl Default for StringToDouble {
    fn default() -> Self {
        Self { locale: &EN_US }
    }
}

impl StringToDouble {
    fn parse(&self, input: &dyn AbstractColumn, row: usize) -> Option<f64> {
        parse_double(&input.text_at(row), self.locale)
    }
}

impl FilterKernel for StringToDouble {
    fn filter_name(&self) -> &'static str {
        "String2DoubleFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Numeric)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Text)
    }

    fn value_at(&self, input: &dyn AbstractColumn, row: usize) -> f64 {
        self.parse(input, row).unwrap_or(0.0)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.parse(input, row).is_none()
    }

    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        attributes.push(("locale", self.locale.id.to_string()));
    }

    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        if name != "locale" {
            return Ok(false);
        }
        self.locale = parse_locale(name, value)?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StringToInteger {
    pub locale: &'static NumberLocale,
}

impl Default for StringToInteger {
    fn default() -> Self {
        Self { locale: &EN_US }
    }
}

impl StringToInteger {
    fn parse(&self, input: &dyn AbstractColumn, row: usize) -> Option<i32> {
        parse_integer(&input.text_at(row), self.locale).and_then(|v| i32::try_from(v).ok())
    }
}

impl FilterKernel for StringToInteger {
    fn filter_name(&self) -> &'static str {
        "String2IntegerFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Integer)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Text)
    }

    fn integer_at(&self, input: &dyn AbstractColumn, row: usize) -> i32 {
        self.parse(input, row).unwrap_or(0)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.parse(input, row).is_none()
    }

    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        attributes.push(("locale", self.locale.id.to_string()));
    }

    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        if name != "locale" {
            return Ok(false);
        }
        self.locale = parse_locale(name, value)?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StringToBigInt {
    pub locale: &'static NumberLocale,
}

impl Default for StringToBigInt {
    fn default() -> Self {
        Self { locale: &EN_US }
    }
}

impl StringToBigInt {
    fn parse(&self, input: &dyn AbstractColumn, row: usize) -> Option<i64> {
        parse_integer(&input.text_at(row), self.locale)
    }
}

impl FilterKernel for StringToBigInt {
    fn filter_name(&self) -> &'static str {
        "String2BigIntFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::BigInt)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Text)
    }

    fn big_int_at(&self, input: &dyn AbstractColumn, row: usize) -> i64 {
        self.parse(input, row).unwrap_or(0)
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.parse(input, row).is_none()
    }

    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        attributes.push(("locale", self.locale.id.to_string()));
    }

    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        if name != "locale" {
            return Ok(false);
        }
        self.locale = parse_locale(name, value)?;
        Ok(true)
    }
}

/// Date/time parsing, trying `format` before the built-in layouts.
#[derive(Debug, Clone, Default)]
pub struct StringToDateTime {
    pub format: Option<String>,
}

impl SimpleFilter<StringToDateTime> {
    pub fn format(&self) -> Option<String> {
        self.kernel().format.clone()
    }

    pub fn set_format(&self, format: Option<String>) {
        self.update_kernel(ColumnEvent::FormatChanged, |kernel| {
            if kernel.format == format {
                return false;
            }
            kernel.format = format;
            true
        });
    }
}

impl FilterKernel for StringToDateTime {
    fn filter_name(&self) -> &'static str {
        "String2DateTimeFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::DateTime)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Text)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        parse_date_time(&input.text_at(row), self.format.as_deref())
    }

    fn is_invalid(&self, input: &dyn AbstractColumn, row: usize) -> bool {
        input.is_invalid(row) || self.date_time_at(input, row).is_none()
    }

    fn write_attributes(&self, attributes: &mut Vec<(&'static str, String)>) {
        if let Some(format) = &self.format {
            attributes.push(("format", format.clone()));
        }
    }

    fn read_attribute(&mut self, name: &str, value: &str) -> Result<bool, PersistError> {
        if name != "format" {
            return Ok(false);
        }
        self.format = (!value.is_empty()).then(|| value.to_string());
        Ok(true)
    }
}

/// Month names or numbers; anything else reads as January without being marked invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToMonth;

impl FilterKernel for StringToMonth {
    fn filter_name(&self) -> &'static str {
        "String2MonthFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Month)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Text)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        parse_month(&input.text_at(row)).or_else(|| month_from_number(1))
    }
}

/// Day names or numbers; anything else reads as Monday without being marked invalid.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringToDayOfWeek;

impl FilterKernel for StringToDayOfWeek {
    fn filter_name(&self) -> &'static str {
        "String2DayOfWeekFilter"
    }

    fn column_mode(&self) -> Option<ColumnMode> {
        Some(ColumnMode::Day)
    }

    fn accepts(&self, source: &dyn AbstractColumn) -> bool {
        accepts_mode(source, ColumnMode::Text)
    }

    fn date_time_at(&self, input: &dyn AbstractColumn, row: usize) -> Option<NaiveDateTime> {
        parse_day(&input.text_at(row)).or_else(|| day_from_number(1))
    }
}

/// Identity filter: output mode and values are those of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCopyThrough;

impl FilterKernel for SimpleCopyThrough {
    fn filter_name(&self) -> &'static str {
        "SimpleCopyThroughFilter"
    }
}
