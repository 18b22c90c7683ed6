//! Type conversion kernels between column modes.
//!
//! There is one kernel per ordered pair of storage kinds, each accepting only its source mode.
//! Kernels reading date/time storage (`DateTime2*`) accept `DateTime`, `Month` and `Day`.
//! Conversions between `DateTime`, `Month` and `Day` need no kernel since they share storage.

use std::rc::Rc;

use colflow_format::{get_locale, NumberLocale, NumericFormat, MAX_DIGITS};

pub mod datetime;
mod from_big_int;
mod from_date_time;
mod from_double;
mod from_integer;
mod from_text;

pub use from_big_int::{
    BigIntToDateTime, BigIntToDayOfWeek, BigIntToDouble, BigIntToInteger, BigIntToMonth,
    BigIntToString,
};
pub use from_date_time::{
    DateTimeToBigInt, DateTimeToDouble, DateTimeToInteger, DateTimeToString, DayOfWeekToBigInt,
    DayOfWeekToDouble, DayOfWeekToInteger, MonthToBigInt, MonthToDouble, MonthToInteger,
};
pub use from_double::{
    DoubleToBigInt, DoubleToDateTime, DoubleToDayOfWeek, DoubleToInteger, DoubleToMonth,
    DoubleToString,
};
pub use from_integer::{
    IntegerToBigInt, IntegerToDateTime, IntegerToDayOfWeek, IntegerToDouble, IntegerToMonth,
    IntegerToString,
};
pub use from_text::{
    SimpleCopyThrough, StringToBigInt, StringToDateTime, StringToDayOfWeek, StringToDouble,
    StringToInteger, StringToMonth,
};

use crate::column::abstract_column::AbstractColumn;
use crate::error::PersistError;
use crate::mode::{ColumnMode, DataType};
use crate::options::{ColumnOptions, DAY_FORMAT, MONTH_FORMAT};
use crate::simple_filter::{AbstractSimpleFilter, SimpleFilter};

/// Filter converting values of mode `from` into mode `to`, configured from `options`.
///
/// Returns `None` when no conversion is needed: equal modes, or two modes sharing date/time
/// storage.
pub fn converter(
    from: ColumnMode,
    to: ColumnMode,
    options: &ColumnOptions,
) -> Option<Rc<dyn AbstractSimpleFilter>> {
    use ColumnMode::*;

    let locale = options.number_locale();
    let filter: Rc<dyn AbstractSimpleFilter> = match (from, to) {
        (a, b) if a.data_type() == b.data_type() => return None,

        (Numeric, Integer) => SimpleFilter::new(DoubleToInteger),
        (Numeric, BigInt) => SimpleFilter::new(DoubleToBigInt),
        (Numeric, Text) => SimpleFilter::new(DoubleToString {
            format: options.numeric_format(),
            digits: options.digits,
            locale,
        }),
        (Numeric, DateTime) => SimpleFilter::new(DoubleToDateTime),
        (Numeric, Month) => SimpleFilter::new(DoubleToMonth),
        (Numeric, Day) => SimpleFilter::new(DoubleToDayOfWeek),

        (Integer, Numeric) => SimpleFilter::new(IntegerToDouble),
        (Integer, BigInt) => SimpleFilter::new(IntegerToBigInt),
        (Integer, Text) => SimpleFilter::new(IntegerToString),
        (Integer, DateTime) => SimpleFilter::new(IntegerToDateTime),
        (Integer, Month) => SimpleFilter::new(IntegerToMonth),
        (Integer, Day) => SimpleFilter::new(IntegerToDayOfWeek),

        (BigInt, Numeric) => SimpleFilter::new(BigIntToDouble),
        (BigInt, Integer) => SimpleFilter::new(BigIntToInteger),
        (BigInt, Text) => SimpleFilter::new(BigIntToString),
        (BigInt, DateTime) => SimpleFilter::new(BigIntToDateTime),
        (BigInt, Month) => SimpleFilter::new(BigIntToMonth),
        (BigInt, Day) => SimpleFilter::new(BigIntToDayOfWeek),

        (Text, Numeric) => SimpleFilter::new(StringToDouble { locale }),
        (Text, Integer) => SimpleFilter::new(StringToInteger { locale }),
        (Text, BigInt) => SimpleFilter::new(StringToBigInt { locale }),
        (Text, DateTime) => SimpleFilter::new(StringToDateTime {
            format: Some(options.date_time_format.clone()),
        }),
        (Text, Month) => SimpleFilter::new(StringToMonth),
        (Text, Day) => SimpleFilter::new(StringToDayOfWeek),

        (DateTime, Text) => {
            SimpleFilter::new(DateTimeToString::new(options.date_time_format.clone()))
        }
        (Month, Text) => SimpleFilter::new(DateTimeToString::new(MONTH_FORMAT)),
        (Day, Text) => SimpleFilter::new(DateTimeToString::new(DAY_FORMAT)),

        (DateTime, Numeric) => SimpleFilter::new(DateTimeToDouble),
        (DateTime, Integer) => SimpleFilter::new(DateTimeToInteger),
        (DateTime, BigInt) => SimpleFilter::new(DateTimeToBigInt),
        (Month, Numeric) => SimpleFilter::new(MonthToDouble),
        (Month, Integer) => SimpleFilter::new(MonthToInteger),
        (Month, BigInt) => SimpleFilter::new(MonthToBigInt),
        (Day, Numeric) => SimpleFilter::new(DayOfWeekToDouble),
        (Day, Integer) => SimpleFilter::new(DayOfWeekToInteger),
        (Day, BigInt) => SimpleFilter::new(DayOfWeekToBigInt),

        (_, _) => return None,
    };
    log::debug!("converting {from} to {to} with {}", filter.filter_name());
    Some(filter)
}

/// Default-configured filter for a saved `filter_name`.
pub fn create_filter(filter_name: &str) -> Option<Rc<dyn AbstractSimpleFilter>> {
    let filter: Rc<dyn AbstractSimpleFilter> = match filter_name {
        "Double2IntegerFilter" => SimpleFilter::new(DoubleToInteger),
        "Double2BigIntFilter" => SimpleFilter::new(DoubleToBigInt),
        "Double2StringFilter" => SimpleFilter::new(DoubleToString::default()),
        "Double2DateTimeFilter" => SimpleFilter::new(DoubleToDateTime),
        "Double2MonthFilter" => SimpleFilter::new(DoubleToMonth),
        "Double2DayOfWeekFilter" => SimpleFilter::new(DoubleToDayOfWeek),
        "Integer2DoubleFilter" => SimpleFilter::new(IntegerToDouble),
        "Integer2BigIntFilter" => SimpleFilter::new(IntegerToBigInt),
        "Integer2StringFilter" => SimpleFilter::new(IntegerToString),
        "Integer2DateTimeFilter" => SimpleFilter::new(IntegerToDateTime),
        "Integer2MonthFilter" => SimpleFilter::new(IntegerToMonth),
        "Integer2DayOfWeekFilter" => SimpleFilter::new(IntegerToDayOfWeek),
        "BigInt2DoubleFilter" => SimpleFilter::new(BigIntToDouble),
        "BigInt2IntegerFilter" => SimpleFilter::new(BigIntToInteger),
        "BigInt2StringFilter" => SimpleFilter::new(BigIntToString),
        "BigInt2DateTimeFilter" => SimpleFilter::new(BigIntToDateTime),
        "BigInt2MonthFilter" => SimpleFilter::new(BigIntToMonth),
        "BigInt2DayOfWeekFilter" => SimpleFilter::new(BigIntToDayOfWeek),
        "String2DoubleFilter" => SimpleFilter::new(StringToDouble::default()),
        "String2IntegerFilter" => SimpleFilter::new(StringToInteger::default()),
        "String2BigIntFilter" => SimpleFilter::new(StringToBigInt::default()),
        "String2DateTimeFilter" => SimpleFilter::new(StringToDateTime::default()),
        "String2MonthFilter" => SimpleFilter::new(StringToMonth),
        "String2DayOfWeekFilter" => SimpleFilter::new(StringToDayOfWeek),
        "DateTime2DoubleFilter" => SimpleFilter::new(DateTimeToDouble),
        "DateTime2IntegerFilter" => SimpleFilter::new(DateTimeToInteger),
        "DateTime2BigIntFilter" => SimpleFilter::new(DateTimeToBigInt),
        "DateTime2StringFilter" => SimpleFilter::new(DateTimeToString::default()),
        "Month2DoubleFilter" => SimpleFilter::new(MonthToDouble),
        "Month2IntegerFilter" => SimpleFilter::new(MonthToInteger),
        "Month2BigIntFilter" => SimpleFilter::new(MonthToBigInt),
        "DayOfWeek2DoubleFilter" => SimpleFilter::new(DayOfWeekToDouble),
        "DayOfWeek2IntegerFilter" => SimpleFilter::new(DayOfWeekToInteger),
        "DayOfWeek2BigIntFilter" => SimpleFilter::new(DayOfWeekToBigInt),
        "SimpleCopyThroughFilter" => SimpleFilter::new(SimpleCopyThrough),
        _ => return None,
    };
    Some(filter)
}

pub(crate) fn accepts_mode(source: &dyn AbstractColumn, mode: ColumnMode) -> bool {
    source.column_mode() == mode
}

pub(crate) fn accepts_date_time(source: &dyn AbstractColumn) -> bool {
    source.data_type() == DataType::DateTime
}

pub(crate) fn parse_numeric_format(name: &str, value: &str) -> Result<NumericFormat, PersistError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => NumericFormat::from_char(ch).ok_or_else(|| PersistError::invalid(name, value)),
        _ => Err(PersistError::invalid(name, value)),
    }
}

pub(crate) fn parse_digits(name: &str, value: &str) -> Result<usize, PersistError> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|digits| *digits <= MAX_DIGITS)
        .ok_or_else(|| PersistError::invalid(name, value))
}

pub(crate) fn parse_locale(name: &str, value: &str) -> Result<&'static NumberLocale, PersistError> {
    get_locale(value).ok_or_else(|| PersistError::invalid(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_storage_needs_no_converter() {
        let options = ColumnOptions::default();
        assert!(converter(ColumnMode::DateTime, ColumnMode::Month, &options).is_none());
        assert!(converter(ColumnMode::Day, ColumnMode::DateTime, &options).is_none());
        assert!(converter(ColumnMode::Text, ColumnMode::Text, &options).is_none());
    }

    #[test]
    fn every_storage_pair_has_a_converter() {
        let options = ColumnOptions::default();
        for from in ColumnMode::ALL {
            for to in ColumnMode::ALL {
                let shared = from.data_type() == to.data_type();
                let filter = converter(from, to, &options);
                assert_eq!(filter.is_none(), shared, "{from} -> {to}");
                if let Some(filter) = filter {
                    assert_eq!(filter.column_mode().data_type(), to.data_type(), "{from} -> {to}");
                    let by_name = create_filter(filter.filter_name());
                    assert!(by_name.is_some(), "{}", filter.filter_name());
                }
            }
        }
        assert!(create_filter("SimpleCopyThroughFilter").is_some());
        assert!(create_filter("FourierFilter").is_none());
    }

    #[test]
    fn saved_attributes_are_validated() {
        assert_eq!(parse_numeric_format("format", "e").ok(), Some(NumericFormat::Exponent));
        assert!(parse_numeric_format("format", "ee").is_err());
        assert_eq!(parse_digits("digits", " 4 ").ok(), Some(4));
        assert!(parse_digits("digits", "-1").is_err());
        assert!(parse_digits("digits", "70000").is_err());
        assert!(parse_locale("locale", "xx-YY").is_err());
    }
}
