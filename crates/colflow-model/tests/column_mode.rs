use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use colflow_model::{
    AbstractColumn, Column, ColumnMode, Interval, IntervalAttribute, OutputFilter,
};
use pretty_assertions::assert_eq;

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid timestamp")
}

fn date_time_column(mode: ColumnMode, values: Vec<NaiveDateTime>) -> std::rc::Rc<Column> {
    let values = values.into_iter().map(Some).collect();
    Column::from_date_times("t", mode, values, IntervalAttribute::new())
}

#[test]
fn text_to_numeric_marks_unparseable_rows() {
    let column = Column::from_texts("x", vec!["3.14".into(), "bad".into(), "2.0".into()]);
    column.set_column_mode(ColumnMode::Numeric);

    assert_eq!(column.column_mode(), ColumnMode::Numeric);
    let values: Vec<f64> = (0..3).map(|row| column.value_at(row)).collect();
    assert_eq!(values, vec![3.14, 0.0, 2.0]);
    assert_eq!(column.invalid_intervals(), vec![Interval::single(1)]);
    assert_eq!(column.formatted_text(0), "3.14");
    assert_eq!(column.formatted_text(1), "");
}

#[test]
fn month_and_day_count_from_1900() {
    let months = date_time_column(ColumnMode::DateTime, vec![dt(1900, 1, 1, 0, 0, 0)]);
    months.set_column_mode(ColumnMode::Month);
    assert_eq!(months.formatted_text(0), "January");
    months.set_column_mode(ColumnMode::Numeric);
    assert_eq!(months.value_at(0), 1.0);

    let days = date_time_column(ColumnMode::DateTime, vec![dt(1900, 1, 1, 0, 0, 0)]);
    days.set_column_mode(ColumnMode::Day);
    assert_eq!(days.formatted_text(0), "Monday");
    days.set_column_mode(ColumnMode::Numeric);
    assert_eq!(days.value_at(0), 1.0);
}

#[test]
fn numbers_become_months_and_weekdays() {
    let column = Column::from_integers("n", vec![14, 7]);
    column.set_column_mode(ColumnMode::Month);
    assert_eq!(column.date_time_at(0), Some(dt(1901, 2, 1, 0, 0, 0)));
    assert_eq!(column.formatted_text(1), "July");

    let column = Column::from_integers("n", vec![3]);
    column.set_column_mode(ColumnMode::Day);
    assert_eq!(column.formatted_text(0), "Wednesday");
}

#[test]
fn date_time_survives_a_trip_through_julian_days() {
    let moment = dt(2000, 1, 1, 12, 0, 0);
    let column = date_time_column(ColumnMode::DateTime, vec![moment, dt(2024, 2, 29, 6, 30, 0)]);

    column.set_column_mode(ColumnMode::Numeric);
    assert_eq!(column.value_at(0), 2_451_545.0);
    column.set_column_mode(ColumnMode::DateTime);

    assert_eq!(column.date_time_at(0), Some(moment));
    assert_eq!(column.date_time_at(1), Some(dt(2024, 2, 29, 6, 30, 0)));
    assert_eq!(column.formatted_text(0), "2000-01-01 12:00:00.000");
    assert!(column.invalid_intervals().is_empty());
}

#[test]
fn months_survive_a_trip_through_big_ints() {
    let column = date_time_column(
        ColumnMode::Month,
        vec![dt(2024, 3, 15, 8, 30, 0), dt(2023, 12, 1, 0, 0, 0)],
    );

    column.set_column_mode(ColumnMode::BigInt);
    assert_eq!(column.big_int_at(0), 3);
    assert_eq!(column.big_int_at(1), 12);

    column.set_column_mode(ColumnMode::Month);
    assert_eq!(column.date_time_at(0), Some(dt(1900, 3, 1, 0, 0, 0)));
    assert_eq!(column.formatted_text(0), "March");
    assert_eq!(column.formatted_text(1), "December");
    assert!(column.invalid_intervals().is_empty());
}

#[test]
fn integer_days_round_to_noon() {
    let column = date_time_column(ColumnMode::DateTime, vec![dt(2000, 1, 1, 18, 0, 0)]);
    column.set_column_mode(ColumnMode::Integer);
    assert_eq!(column.integer_at(0), 2_451_545);
    column.set_column_mode(ColumnMode::DateTime);
    assert_eq!(column.date_time_at(0), Some(dt(2000, 1, 1, 12, 0, 0)));
}

#[test]
fn big_ints_are_epoch_milliseconds() {
    let column = date_time_column(ColumnMode::DateTime, vec![dt(1970, 1, 1, 0, 0, 1)]);
    column.set_column_mode(ColumnMode::BigInt);
    assert_eq!(column.big_int_at(0), 1000);

    column.replace_big_ints(1, vec![86_400_000]);
    column.set_column_mode(ColumnMode::DateTime);
    assert_eq!(column.date_time_at(1), Some(dt(1970, 1, 2, 0, 0, 0)));
}

#[test]
fn conversion_to_text_keeps_the_display_format() {
    let column = Column::from_values("x", vec![3.14159, 2.0]);
    column.set_invalid(1, true);
    match column.output_filter() {
        OutputFilter::Double(filter) => filter.set_digits(2),
        _ => panic!("numeric columns format with a double filter"),
    }

    column.set_column_mode(ColumnMode::Text);
    assert_eq!(column.text_at(0), "3.1");
    assert_eq!(column.text_at(1), "");
    assert_eq!(column.invalid_intervals(), vec![Interval::single(1)]);
}

#[test]
fn text_to_date_time_tries_the_known_layouts() {
    let column = Column::from_texts(
        "t",
        vec!["2024-03-05 14:30:15".into(), "05.03.2024".into(), "soon".into()],
    );
    column.set_column_mode(ColumnMode::DateTime);
    assert_eq!(column.date_time_at(0), Some(dt(2024, 3, 5, 14, 30, 15)));
    assert_eq!(column.date_time_at(1), Some(dt(2024, 3, 5, 0, 0, 0)));
    assert_eq!(column.date_time_at(2), None);
    assert_eq!(column.invalid_intervals(), vec![Interval::single(2)]);
}

#[test]
fn inserted_rows_are_blank_and_invalid() {
    let column = Column::from_values("x", vec![1.0, 2.0]);
    column.insert_rows(1, 2);
    assert_eq!(column.row_count(), 4);
    assert!(column.value_at(1).is_nan());
    assert_eq!(column.value_at(3), 2.0);
    assert_eq!(column.invalid_intervals(), vec![Interval::new(1, 2)]);
}

#[test]
fn date_and_time_setters_keep_the_other_half() {
    let column = date_time_column(ColumnMode::DateTime, vec![dt(2024, 3, 5, 14, 30, 0)]);
    let date = NaiveDate::from_ymd_opt(2020, 1, 2).expect("valid date");
    let time = NaiveTime::from_hms_opt(8, 0, 0).expect("valid time");

    assert!(column.set_date_at(0, date));
    assert_eq!(column.date_time_at(0), Some(dt(2020, 1, 2, 14, 30, 0)));
    assert!(column.set_time_at(1, time));
    assert_eq!(column.date_time_at(1), Some(dt(1900, 1, 1, 8, 0, 0)));
}

#[test]
fn typed_text_follows_the_display_format() {
    let column = date_time_column(ColumnMode::DateTime, vec![dt(2024, 3, 5, 0, 0, 0)]);
    assert!(column.set_text_at(0, "2024|07|04"));
    assert!(column.is_invalid(0));

    match column.output_filter() {
        OutputFilter::DateTime(filter) => filter.set_format("%Y|%m|%d"),
        _ => panic!("date/time columns format with a date/time filter"),
    }
    assert!(column.set_text_at(0, "2024|07|04"));
    assert!(!column.is_invalid(0));
    assert_eq!(column.date_time_at(0), Some(dt(2024, 7, 4, 0, 0, 0)));
    assert_eq!(column.formatted_text(0), "2024|07|04");
}

#[test]
fn lenient_month_text_defaults_to_january() {
    let column = Column::new("m", ColumnMode::Month);
    assert!(column.set_text_at(0, "Brumaire"));
    assert!(column.set_text_at(1, "sep"));
    assert_eq!(column.formatted_text(0), "January");
    assert_eq!(column.formatted_text(1), "September");
    assert!(!column.is_invalid(0));
}

#[test]
fn same_storage_switch_keeps_values() {
    let column = date_time_column(ColumnMode::DateTime, vec![dt(2023, 8, 15, 9, 0, 0)]);
    column.set_column_mode(ColumnMode::Month);
    column.set_column_mode(ColumnMode::Day);
    assert_eq!(column.date_time_at(0), Some(dt(2023, 8, 15, 9, 0, 0)));
    assert_eq!(column.formatted_text(0), "Tuesday");
}
