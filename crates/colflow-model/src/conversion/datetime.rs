//! Date/time conventions shared by the conversion kernels, and the text parsing cascade.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Julian day number of the day before 0001-01-01 (proleptic Gregorian), at noon.
const JULIAN_DAY_OFFSET: i64 = 1_721_425;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Date formats tried, in order, by [`parse_date_time`].
static DATE_FORMATS: [&str; 19] = [
    "%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%Y%m%d", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y", "%d%m%Y",
    "%d-%m-%y", "%d.%m.%y", "%d/%m/%y", "%d%m%y", "%m-%Y", "%m.%Y", "%m/%Y", "%d-%m", "%d.%m",
    "%d/%m", "%d%m",
];

/// Time formats tried, in order, by [`parse_date_time`].
static TIME_FORMATS: [&str; 9] = [
    "%H",
    "%I %p",
    "%H:%M",
    "%I:%M %p",
    "%H:%M:%S",
    "%H:%M:%S%.3f",
    "%H:%M:%S:%3f",
    "%M:%S%.3f",
    "%H%M%S",
];

static DATE_TIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.3f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%Y%m%d%H%M%S",
];

static MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

static DAY_NAMES: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

pub fn date_formats() -> &'static [&'static str] {
    &DATE_FORMATS
}

pub fn time_formats() -> &'static [&'static str] {
    &TIME_FORMATS
}

/// Combined formats offered for `DateTime` display.
pub fn date_time_formats() -> &'static [&'static str] {
    &DATE_TIME_FORMATS
}

/// Reference date of the Month and Day conventions. 1900-01-01 is a Monday.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}

/// Julian day with the fraction counted from noon (2000-01-01T12:00 is 2451545.0).
pub fn to_julian_day(value: NaiveDateTime) -> f64 {
    let day = i64::from(value.date().num_days_from_ce()) + JULIAN_DAY_OFFSET;
    let from_noon = value.time().signed_duration_since(noon()).num_milliseconds();
    day as f64 + from_noon as f64 / MS_PER_DAY
}

/// Inverse of [`to_julian_day`], exact to the millisecond. Non-finite or out-of-range input
/// gives `None`.
pub fn from_julian_day(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let day = value.floor();
    let ms = ((value - day) * MS_PER_DAY).round() as i64;
    let days_from_ce = i32::try_from((day as i64).checked_sub(JULIAN_DAY_OFFSET)?).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(days_from_ce)?;
    date.and_time(noon())
        .checked_add_signed(TimeDelta::try_milliseconds(ms)?)
}

/// Milliseconds since 1970-01-01T00:00, read as UTC.
pub fn to_epoch_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

pub fn from_epoch_millis(value: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(value).map(|dt| dt.naive_utc())
}

/// Month `n` counted from January 1900 (1 is 1900-01-01, 13 is 1901-01-01, 0 is 1899-12-01).
pub fn month_from_number(number: i64) -> Option<NaiveDateTime> {
    let base = reference_date();
    let offset = number.checked_sub(1)?;
    let months = Months::new(u32::try_from(offset.unsigned_abs()).ok()?);
    let date = if offset >= 0 {
        base.checked_add_months(months)
    } else {
        base.checked_sub_months(months)
    }?;
    date.and_hms_opt(0, 0, 0)
}

/// Day `n` counted from Monday 1900-01-01, so `n` modulo 7 follows the ISO weekday.
pub fn day_from_number(number: i64) -> Option<NaiveDateTime> {
    let offset = TimeDelta::try_days(number.checked_sub(1)?)?;
    reference_date()
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(offset)
}

/// Month number 1-12.
pub fn month_number(value: NaiveDateTime) -> u32 {
    value.month()
}

/// ISO weekday number, Monday = 1.
pub fn weekday_number(value: NaiveDateTime) -> u32 {
    value.weekday().number_from_monday()
}

/// Round half away from zero into the `i64` range (NaN maps to 0).
pub(crate) fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

/// Render with a strftime format; an unusable format renders as an empty string.
pub fn format_date_time(value: NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", value.format(format)).is_err() {
        log::debug!("cannot render date/time with format `{format}`");
        return String::new();
    }
    out
}

/// Parse user-typed date/time text.
///
/// `format` is tried first. Otherwise the text is split into a date and a time token (at the
/// first comma, else at the first whitespace; a single token is used for both) and each token is
/// matched against [`date_formats`] and [`time_formats`]. A missing date means 1900-01-01, a
/// missing time means midnight. Returns `None` when nothing matches.
pub fn parse_date_time(text: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(format) = format.filter(|f| !f.is_empty()) {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    let (date_token, time_token) = split_tokens(text);
    match (parse_date(date_token), parse_time(time_token)) {
        (Some(date), Some(time)) => Some(date.and_time(time)),
        (Some(date), None) => date.and_hms_opt(0, 0, 0),
        (None, Some(time)) => Some(reference_date().and_time(time)),
        (None, None) => parse_time(text).map(|time| reference_date().and_time(time)),
    }
}

/// Month from a number (1-12, other numbers wrap like [`month_from_number`]) or an English
/// month name, full or abbreviated to three letters.
pub fn parse_month(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(number) = text.parse::<i64>() {
        return month_from_number(number);
    }
    find_name(&MONTH_NAMES, text).and_then(|idx| month_from_number(idx as i64 + 1))
}

/// Weekday from a number (1 = Monday) or an English day name, full or abbreviated.
pub fn parse_day(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(number) = text.parse::<i64>() {
        return day_from_number(number);
    }
    find_name(&DAY_NAMES, text).and_then(|idx| day_from_number(idx as i64 + 1))
}

fn find_name(names: &[&str], text: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    names
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(&lower)))
}

fn split_tokens(text: &str) -> (&str, &str) {
    if let Some((date, time)) = text.split_once(',') {
        return (date.trim(), time.trim());
    }
    match text.split_once(char::is_whitespace) {
        Some((date, time)) => (date.trim(), time.trim()),
        None => (text, text),
    }
}

fn parse_date(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|format| {
        let mut text = token.to_string();
        let mut format = (*format).to_string();
        if !format.contains("%Y") && !format.contains("%y") {
            text.push_str(" 1900");
            format.push_str(" %Y");
        }
        if !format.contains("%d") {
            text.push_str(" 1");
            format.push_str(" %d");
        }
        NaiveDate::parse_from_str(&text, &format).ok()
    })
}

fn parse_time(token: &str) -> Option<NaiveTime> {
    TIME_FORMATS.iter().find_map(|format| {
        let mut text = token.to_string();
        let mut format = (*format).to_string();
        if !format.contains("%H") && !format.contains("%I") {
            text.push_str(" 0");
            format.push_str(" %H");
        }
        if !format.contains("%M") {
            text.push_str(" 0");
            format.push_str(" %M");
        }
        NaiveTime::parse_from_str(&text, &format).ok()
    })
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}
