use chrono::{NaiveDate, NaiveDateTime};
use colflow_model::conversion::{DoubleToInteger, DoubleToString};
use colflow_model::{
    load_column, load_filter, read_filter, save_column, save_filter, AbstractColumn,
    AbstractFilter, AbstractSimpleFilter, Column, ColumnMode, ColumnRef, Interval,
    IntervalAttribute, OutputFilter, PersistError, PlotDesignation, SimpleFilter,
};
use colflow_format::{NumericFormat, MAX_DIGITS};
use pretty_assertions::assert_eq;

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_milli_opt(h, min, s, ms))
        .expect("valid timestamp")
}

#[test]
fn numeric_column_round_trips() {
    let column = Column::from_values("x", vec![1.5, -2.0, 1.0 / 3.0]);
    column.set_plot_designation(PlotDesignation::X);
    column.set_width(40);
    column.set_comment("measured <raw>");
    column.insert_rows(1, 1);
    column.set_masked_interval(Interval::new(2, 3), true);
    column.set_formula_interval(Interval::new(0, 1), "x*2");
    match column.output_filter() {
        OutputFilter::Double(filter) => filter.set_digits(3),
        _ => panic!("numeric columns format with a double filter"),
    }

    let xml = save_column(&column).expect("save column");
    assert!(xml.starts_with(r#"<column name="x" mode="Numeric" plot_designation="X" width="40">"#));
    assert!(xml.contains(r#"<row index="1" invalid="1">NaN</row>"#));
    assert!(xml.contains(r#"<mask start_row="2" end_row="3"/>"#));

    let loaded = load_column(&xml).expect("load column");
    assert_eq!(loaded.name(), "x");
    assert_eq!(loaded.column_mode(), ColumnMode::Numeric);
    assert_eq!(loaded.plot_designation(), PlotDesignation::X);
    assert_eq!(loaded.width(), 40);
    assert_eq!(loaded.comment(), "measured <raw>");
    assert_eq!(loaded.row_count(), 4);
    assert_eq!(loaded.value_at(0), 1.5);
    assert!(loaded.value_at(1).is_nan());
    assert_eq!(loaded.value_at(3), 1.0 / 3.0);
    assert_eq!(loaded.invalid_intervals(), vec![Interval::single(1)]);
    assert_eq!(loaded.masked_intervals(), vec![Interval::new(2, 3)]);
    assert_eq!(loaded.formula(1).as_deref(), Some("x*2"));
    assert_eq!(loaded.formatted_text(3), "0.333");
}

#[test]
fn date_time_rows_keep_milliseconds_and_gaps() {
    let moment = dt(2024, 2, 29, 13, 45, 7, 250);
    let column = Column::from_date_times(
        "t",
        ColumnMode::Month,
        vec![Some(moment), None],
        IntervalAttribute::new(),
    );

    let xml = save_column(&column).expect("save column");
    assert!(xml.contains(r#"<row index="0">2024-02-29T13:45:07.250</row>"#));
    assert!(xml.contains(r#"<row index="1" invalid="1"/>"#));

    let loaded = load_column(&xml).expect("load column");
    assert_eq!(loaded.column_mode(), ColumnMode::Month);
    assert_eq!(loaded.date_time_at(0), Some(moment));
    assert_eq!(loaded.date_time_at(1), None);
    assert!(loaded.is_invalid(1));
    assert_eq!(loaded.formatted_text(0), "February");
}

#[test]
fn unknown_content_is_skipped() {
    let xml = r#"<column name="notes" mode="Text" plot_designation="None" width="0" color="red">
  <comment>free text</comment>
  <view_state zoom="2"><inner/></view_state>
  <row index="0"> padded </row>
  <row index="2">last</row>
</column>"#;

    let column = load_column(xml).expect("load column");
    assert_eq!(column.comment(), "free text");
    assert_eq!(column.row_count(), 3);
    assert_eq!(column.text_at(0), " padded ");
    assert_eq!(column.text_at(2), "last");
    assert_eq!(column.invalid_intervals(), vec![Interval::single(1)]);
}

#[test]
fn malformed_columns_are_rejected() {
    let missing_mode = r#"<column name="x"></column>"#;
    assert!(matches!(
        load_column(missing_mode),
        Err(PersistError::MissingAttribute { attribute: "mode", .. })
    ));

    let wrong_root = r#"<table name="x"/>"#;
    assert!(matches!(
        load_column(wrong_root),
        Err(PersistError::UnexpectedElement { expected: "column", .. })
    ));

    let bad_row = r#"<column name="x" mode="Integer"><row index="0">abc</row></column>"#;
    assert!(matches!(
        load_column(bad_row),
        Err(PersistError::InvalidAttribute { .. })
    ));

    let unknown_mode = r#"<column name="x" mode="Complex"/>"#;
    assert!(matches!(load_column(unknown_mode), Err(PersistError::UnknownName(_))));
}

#[test]
fn filters_round_trip_with_their_parameters() {
    let filter = SimpleFilter::new(DoubleToString::default());
    filter.set_digits(2);
    filter.set_masked_interval(Interval::new(4, 6), true);

    let xml = save_filter(&*filter).expect("save filter");
    let restored = read_filter(&xml).expect("read filter");
    assert_eq!(restored.filter_name(), "Double2StringFilter");
    assert_eq!(restored.save_attributes(), filter.save_attributes());
    assert_eq!(restored.masked_intervals(), vec![Interval::new(4, 6)]);

    let fresh = SimpleFilter::new(DoubleToString::default());
    load_filter(&*fresh, &xml).expect("load filter");
    assert_eq!(fresh.digits(), 2);
}

#[test]
fn loading_into_another_kind_of_filter_fails() {
    let xml = save_filter(&*SimpleFilter::new(DoubleToString::default())).expect("save filter");
    let target = SimpleFilter::new(DoubleToInteger);

    match load_filter(&*target, &xml) {
        Err(PersistError::IncompatibleFilter { expected, found }) => {
            assert_eq!(expected, "Double2IntegerFilter");
            assert_eq!(found, "Double2StringFilter");
        }
        other => panic!("expected an incompatible filter error, got {other:?}"),
    }
    assert!(read_filter(r#"<simple_filter filter_name="Bogus2Filter"/>"#).is_err());
}

#[test]
fn far_out_row_indices_are_rejected() {
    for index in ["18446744073709551615", "100000000"] {
        let xml = format!(r#"<column name="x" mode="Numeric"><row index="{index}">1</row></column>"#);
        match load_column(&xml) {
            Err(PersistError::InvalidAttribute { attribute, value }) => {
                assert_eq!(attribute, "index");
                assert_eq!(value, index);
            }
            other => panic!("expected an invalid index error, got {other:?}"),
        }
    }
}

#[test]
fn oversized_digit_counts_do_not_reach_the_formatter() {
    let filter = SimpleFilter::new(DoubleToString::default());
    let xml = r#"<simple_filter filter_name="Double2StringFilter" format="f" digits="70000"/>"#;
    assert!(matches!(
        load_filter(&*filter, xml),
        Err(PersistError::InvalidAttribute { .. })
    ));

    let column: ColumnRef = Column::from_values("x", vec![0.5]);
    assert!(filter.input(0, Some(column)));
    filter.set_numeric_format(NumericFormat::Fixed);
    filter.set_digits(70_000);
    assert_eq!(filter.digits(), MAX_DIGITS);
    assert_eq!(filter.text_at(0), format!("0.5{}", "0".repeat(MAX_DIGITS - 1)));
}
