use colflow_format::{
    format_double, format_integer, get_locale, parse_double, parse_integer, NumericFormat, DE_DE,
    EN_US,
};
use colflow_format::locale::FR_FR;
use pretty_assertions::assert_eq;

#[test]
fn locale_lookup_accepts_posix_tags() {
    assert_eq!(get_locale("de_DE.UTF-8").map(|l| l.id), Some("de-DE"));
    assert_eq!(get_locale("fr").map(|l| l.id), Some("fr-FR"));
    assert_eq!(get_locale("en-AU").map(|l| l.id), Some("en-US"));
    assert!(get_locale("tlh").is_none());
}

#[test]
fn rendered_text_parses_back_in_the_same_locale() {
    for locale in [&EN_US, &DE_DE, &FR_FR] {
        for value in [-0.5, 1234.5, 2.0e-7] {
            let text = format_double(value, NumericFormat::General, 6, locale);
            assert_eq!(parse_double(&text, locale), Some(value), "{} `{text}`", locale.id);
        }
    }
}

#[test]
fn french_grouping_accepts_plain_spaces() {
    assert_eq!(parse_double("1 234,5", &FR_FR), Some(1234.5));
    assert_eq!(parse_double("1\u{00A0}234,5", &FR_FR), Some(1234.5));
    assert_eq!(format_double(1234.5, NumericFormat::Fixed, 2, &FR_FR), "1234,50");
}

#[test]
fn integers_reject_fractions() {
    assert_eq!(parse_integer("-17", &EN_US), Some(-17));
    assert_eq!(parse_integer("3,5", &DE_DE), None);
    assert_eq!(format_integer(-9_000_000_000), "-9000000000");
}
