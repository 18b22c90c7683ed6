use crate::{NumberLocale, NumericFormat};

/// Largest digit count honoured by [`format_double`]; larger requests are clamped.
pub const MAX_DIGITS: usize = 17;

/// Render `value` printf-style (`%.*f`, `%.*e`, `%.*g`) and apply the locale decimal separator.
///
/// `digits` is the number of decimals for [`NumericFormat::Fixed`] and the exponent variants,
/// and the number of significant digits for the general variants (0 is treated as 1, like C).
/// Thousands grouping is never applied; grouped text is still accepted by [`parse_double`].
/// `digits` above [`MAX_DIGITS`] is clamped.
pub fn format_double(value: f64, format: NumericFormat, digits: usize, locale: &NumberLocale) -> String {
    let digits = digits.min(MAX_DIGITS);
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // Avoid displaying negative zero (can show up after floating point operations).
    let value = if value == 0.0 { 0.0 } else { value };

    let rendered = match format {
        NumericFormat::Fixed => format!("{value:.digits$}"),
        NumericFormat::Exponent | NumericFormat::ExponentUpper => {
            let sci = format!("{value:.digits$e}");
            let (mantissa, exp) = split_exponent(&sci);
            render_exponent(mantissa, exp, format.is_upper())
        }
        NumericFormat::General | NumericFormat::GeneralUpper => {
            format_general(value, digits.max(1), format.is_upper())
        }
    };

    if locale.decimal_separator == '.' {
        rendered
    } else {
        rendered.replacen('.', &locale.decimal_separator.to_string(), 1)
    }
}

/// Parse user-typed numeric text using the locale separators.
///
/// Leading/trailing whitespace is ignored and thousands separators are dropped. Returns `None`
/// for empty or malformed input.
pub fn parse_double(text: &str, locale: &NumberLocale) -> Option<f64> {
    let normalized = locale.normalize_numeric_text(text);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok()
}

/// Parse user-typed integer text using the locale separators.
///
/// Text with a fractional part is rejected rather than truncated.
pub fn parse_integer(text: &str, locale: &NumberLocale) -> Option<i64> {
    let normalized = locale.normalize_numeric_text(text);
    if normalized.is_empty() {
        return None;
    }
    normalized.strip_prefix('+').unwrap_or(&normalized).parse::<i64>().ok()
}

/// Render an integer without grouping.
pub fn format_integer(value: i64) -> String {
    value.to_string()
}

fn format_general(value: f64, precision: usize, upper: bool) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    // The exponent has to be taken *after* rounding to `precision` significant digits, otherwise
    // 9999999 with 6 digits would pick fixed notation and render as "10000000".
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = split_exponent(&sci);
    if exp < -4 || exp >= precision as i32 {
        return render_exponent(strip_trailing_zeros(mantissa), exp, upper);
    }

    let decimals = (precision as i32 - 1 - exp).max(0) as usize;
    let fixed = format!("{value:.decimals$}");
    strip_trailing_zeros(&fixed).to_string()
}

fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

/// C-style exponent: explicit sign and at least two digits (`1.5e+06`, `2E-12`).
fn render_exponent(mantissa: &str, exp: i32, upper: bool) -> String {
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exp.unsigned_abs())
}

fn strip_trailing_zeros(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DE_DE, EN_US};

    #[test]
    fn general_format_matches_printf() {
        let g = |v: f64, d: usize| format_double(v, NumericFormat::General, d, &EN_US);
        assert_eq!(g(3.14159, 6), "3.14159");
        assert_eq!(g(100.0, 6), "100");
        assert_eq!(g(0.0001, 6), "0.0001");
        assert_eq!(g(0.00001, 6), "1e-05");
        assert_eq!(g(1234567.0, 6), "1.23457e+06");
        assert_eq!(g(9999999.0, 6), "1e+07");
        assert_eq!(g(2.4, 0), "2");
        assert_eq!(g(-0.0, 6), "0");
    }

    #[test]
    fn fixed_and_exponent_formats() {
        assert_eq!(format_double(3.14159, NumericFormat::Fixed, 2, &EN_US), "3.14");
        assert_eq!(format_double(1500.0, NumericFormat::Exponent, 3, &EN_US), "1.500e+03");
        assert_eq!(format_double(0.00025, NumericFormat::ExponentUpper, 1, &EN_US), "2.5E-04");
        assert_eq!(format_double(1.0e100, NumericFormat::GeneralUpper, 3, &EN_US), "1E+100");
    }

    #[test]
    fn applies_locale_decimal_separator() {
        assert_eq!(format_double(1.5, NumericFormat::Fixed, 1, &DE_DE), "1,5");
        assert_eq!(format_double(-2.25e-7, NumericFormat::Exponent, 2, &DE_DE), "-2,25e-07");
    }

    #[test]
    fn oversized_digit_counts_are_clamped() {
        let fixed = format_double(0.5, NumericFormat::Fixed, 70_000, &EN_US);
        assert_eq!(fixed, format_double(0.5, NumericFormat::Fixed, MAX_DIGITS, &EN_US));
        assert_eq!(fixed.len(), 2 + MAX_DIGITS);
        assert_eq!(format_double(0.5, NumericFormat::General, usize::MAX, &EN_US), "0.5");
    }

    #[test]
    fn non_finite_values_render_as_words() {
        assert_eq!(format_double(f64::NAN, NumericFormat::General, 6, &EN_US), "NaN");
        assert_eq!(format_double(f64::NEG_INFINITY, NumericFormat::Fixed, 2, &EN_US), "-inf");
    }

    #[test]
    fn parses_locale_numbers() {
        assert_eq!(parse_double("3.14", &EN_US), Some(3.14));
        assert_eq!(parse_double("1,234.5", &EN_US), Some(1234.5));
        assert_eq!(parse_double("1.234,5", &DE_DE), Some(1234.5));
        assert_eq!(parse_double("  -2e3 ", &EN_US), Some(-2000.0));
        assert_eq!(parse_double("bad", &EN_US), None);
        assert_eq!(parse_double("", &EN_US), None);
        assert_eq!(parse_integer("+42", &EN_US), Some(42));
        assert_eq!(parse_integer("1.000", &DE_DE), Some(1000));
        assert_eq!(parse_integer("2.5", &EN_US), None);
    }
}
