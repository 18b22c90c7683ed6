use colflow_model::{AbstractColumn, Column, ColumnMode, ColumnOptions, OptionsError};
use pretty_assertions::assert_eq;

#[test]
fn missing_fields_take_defaults() {
    let options = ColumnOptions::from_json(r#"{ "locale": "de_DE", "digits": 3 }"#)
        .expect("valid options");
    assert_eq!(options.digits, 3);
    assert_eq!(options.numeric_format, 'g');
    assert_eq!(options.number_locale().id, "de-DE");
    assert_eq!(options.date_time_format, ColumnOptions::default().date_time_format);

    let json = options.to_json().expect("serialize options");
    assert_eq!(ColumnOptions::from_json(&json).expect("reparse"), options);
}

#[test]
fn invalid_options_are_rejected() {
    assert!(matches!(
        ColumnOptions::from_json(r#"{ "locale": "ja-JP" }"#),
        Err(OptionsError::UnknownLocale(tag)) if tag == "ja-JP"
    ));
    assert!(matches!(
        ColumnOptions::from_json(r#"{ "numeric_format": "x" }"#),
        Err(OptionsError::UnknownNumericFormat('x'))
    ));
    assert!(matches!(
        ColumnOptions::from_json(r#"{ "date_time_format": "%Y-%!" }"#),
        Err(OptionsError::InvalidDateTimeFormat(_))
    ));
    assert!(matches!(
        ColumnOptions::from_json(r#"{ "digits": "three" }"#),
        Err(OptionsError::Json(_))
    ));
    assert!(matches!(
        ColumnOptions::from_json(r#"{ "digits": 70000 }"#),
        Err(OptionsError::DigitsOutOfRange(70000))
    ));
}

#[test]
fn columns_parse_and_render_with_their_locale() {
    let options = ColumnOptions {
        locale: "de-DE".to_string(),
        ..ColumnOptions::default()
    };
    let column = Column::with_options("x", ColumnMode::Numeric, options);

    assert!(column.set_text_at(0, "1.234,5"));
    assert_eq!(column.value_at(0), 1234.5);
    assert_eq!(column.formatted_text(0), "1234,5");

    column.set_text_at(1, "abc");
    assert!(column.is_invalid(1));
    assert!(!column.is_invalid(0));
}
