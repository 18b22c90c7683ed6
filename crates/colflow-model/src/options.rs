use chrono::format::{Item, StrftimeItems};
use colflow_format::{get_locale, NumberLocale, NumericFormat, EN_US, MAX_DIGITS};
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Display format used for `DateTime` columns unless configured otherwise.
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
/// Display format of `Month` columns (full English month name).
pub const MONTH_FORMAT: &str = "%B";
/// Display format of `Day` columns (full English weekday name).
pub const DAY_FORMAT: &str = "%A";

/// Presentation and parsing defaults applied to new columns and their filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Locale tag whose separators are used to render and parse numbers (`en-US`, `de_DE`, ...).
    pub locale: String,
    /// printf-style conversion character for numeric display: `f`, `e`, `E`, `g` or `G`.
    pub numeric_format: char,
    pub digits: usize,
    /// strftime-style display format of `DateTime` columns.
    pub date_time_format: String,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            locale: EN_US.id.to_string(),
            numeric_format: NumericFormat::General.as_char(),
            digits: 6,
            date_time_format: DEFAULT_DATE_TIME_FORMAT.to_string(),
        }
    }
}

impl ColumnOptions {
    /// Parse and validate options; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: ColumnOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if get_locale(&self.locale).is_none() {
            return Err(OptionsError::UnknownLocale(self.locale.clone()));
        }
        if NumericFormat::from_char(self.numeric_format).is_none() {
            return Err(OptionsError::UnknownNumericFormat(self.numeric_format));
        }
        if self.digits > MAX_DIGITS {
            return Err(OptionsError::DigitsOutOfRange(self.digits));
        }
        if !is_valid_date_time_format(&self.date_time_format) {
            return Err(OptionsError::InvalidDateTimeFormat(
                self.date_time_format.clone(),
            ));
        }
        Ok(())
    }

    /// Separators for number text. Unknown tags fall back to `en-US`.
    pub fn number_locale(&self) -> &'static NumberLocale {
        get_locale(&self.locale).unwrap_or_else(|| {
            log::warn!("unknown locale `{}`, using en-US separators", self.locale);
            &EN_US
        })
    }

    pub fn numeric_format(&self) -> NumericFormat {
        NumericFormat::from_char(self.numeric_format).unwrap_or_default()
    }
}

/// `true` when every strftime specifier in `format` is understood by chrono.
pub fn is_valid_date_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = ColumnOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.numeric_format(), NumericFormat::General);
        assert_eq!(options.number_locale().decimal_separator, '.');
    }

    #[test]
    fn rejects_broken_strftime_format() {
        assert!(is_valid_date_time_format("%d.%m.%Y %H:%M"));
        assert!(!is_valid_date_time_format("%Y-%!"));
    }
}
