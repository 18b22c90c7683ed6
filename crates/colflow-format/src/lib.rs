//! Locale-aware number rendering and parsing for colflow columns.
//!
//! This crate provides two layers:
//! - [`locale`] helpers describing decimal/thousands separators for the locales we ship.
//! - printf-style numeric rendering (`f`, `e`, `g` and their upper-case variants) plus lenient
//!   parsing of user-typed numbers, both aware of the locale separators.
//!
//! It has no dependencies so it can be reused by import/export layers that do not need the full
//! column model.

#![forbid(unsafe_code)]

pub mod locale;

mod number;

pub use crate::number::{format_double, format_integer, parse_double, parse_integer, MAX_DIGITS};
pub use locale::{get_locale, NumberLocale, DE_DE, EN_US};

/// Presentation style used when rendering a floating point value as text.
///
/// The variants map 1:1 onto the single-character codes used in saved documents and UIs
/// (`f`, `e`, `E`, `g`, `G`), see [`NumericFormat::from_char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumericFormat {
    /// Fixed notation with `digits` digits after the decimal separator (`f`).
    Fixed,
    /// Scientific notation with `digits` digits after the decimal separator (`e`).
    Exponent,
    /// Like [`NumericFormat::Exponent`] with an upper-case `E` (`E`).
    ExponentUpper,
    /// The shorter of fixed and scientific notation with `digits` significant digits (`g`).
    #[default]
    General,
    /// Like [`NumericFormat::General`] with an upper-case `E` (`G`).
    GeneralUpper,
}

impl NumericFormat {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'f' => Some(Self::Fixed),
            'e' => Some(Self::Exponent),
            'E' => Some(Self::ExponentUpper),
            'g' => Some(Self::General),
            'G' => Some(Self::GeneralUpper),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Fixed => 'f',
            Self::Exponent => 'e',
            Self::ExponentUpper => 'E',
            Self::General => 'g',
            Self::GeneralUpper => 'G',
        }
    }

    pub(crate) fn is_upper(self) -> bool {
        matches!(self, Self::ExponentUpper | Self::GeneralUpper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_format_chars_round_trip() {
        for ch in ['f', 'e', 'E', 'g', 'G'] {
            let format = NumericFormat::from_char(ch).expect("known format char");
            assert_eq!(format.as_char(), ch);
        }
        assert_eq!(NumericFormat::from_char('x'), None);
        assert_eq!(NumericFormat::default(), NumericFormat::General);
    }
}
