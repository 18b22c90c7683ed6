//! XML persistence of simple filters and columns.
//!
//! A filter is saved as `<simple_filter filter_name="..." .../>` with its kernel parameters as
//! extra attributes and its masked rows as `<mask start_row=".." end_row=".."/>` children. A
//! column wraps its two filters and its rows:
//!
//! ```xml
//! <column name="x" mode="Numeric" plot_designation="X" width="0">
//!   <comment>...</comment>
//!   <input_filter><simple_filter filter_name="String2DoubleFilter" locale="en-US"/></input_filter>
//!   <output_filter><simple_filter filter_name="Double2StringFilter" .../></output_filter>
//!   <mask start_row="1" end_row="2"/>
//!   <formula start_row="0" end_row="3">x*2</formula>
//!   <row index="0">1.5</row>
//!   <row index="1" invalid="1"/>
//! </column>
//! ```
//!
//! Unknown elements and attributes are skipped with a warning.

use std::io::{Cursor, Write};
use std::rc::Rc;

use chrono::NaiveDateTime;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::column::abstract_column::{AbstractColumn, Cell};
use crate::column::{Column, ColumnContents, ColumnData};
use crate::conversion::create_filter;
use crate::error::PersistError;
use crate::interval::{Interval, IntervalAttribute};
use crate::mode::{ColumnMode, DataType, PlotDesignation};
use crate::simple_filter::AbstractSimpleFilter;

const ROW_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Rows a `<column>` may leave out; larger row indices are rejected as corrupt.
const MAX_MISSING_ROWS: usize = 1 << 16;

pub fn save_filter(filter: &dyn AbstractSimpleFilter) -> Result<String, PersistError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_filter(&mut writer, filter)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

pub fn write_filter<W: Write>(
    writer: &mut Writer<W>,
    filter: &dyn AbstractSimpleFilter,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("simple_filter");
    for (name, value) in filter.save_attributes() {
        start.push_attribute((name, value.as_str()));
    }
    let masks = filter.masked_intervals();
    if masks.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for mask in masks {
        writer.write_event(Event::Empty(interval_element("mask", mask)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("simple_filter")))?;
    Ok(())
}

/// Restore `filter` from a saved `<simple_filter>` element.
///
/// Fails with [`PersistError::IncompatibleFilter`] when the element was saved by a different
/// kind of filter; `filter` is left unchanged in that case.
pub fn load_filter(filter: &dyn AbstractSimpleFilter, xml: &str) -> Result<(), PersistError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => return read_filter_element(&mut reader, &e, false, filter),
            Event::Empty(e) => return read_filter_element(&mut reader, &e, true, filter),
            Event::Eof => return Err(PersistError::UnexpectedEof("simple_filter")),
            _ => {}
        }
        buf.clear();
    }
}

/// Build the filter named by a saved `<simple_filter>` element and restore it.
pub fn read_filter(xml: &str) -> Result<Rc<dyn AbstractSimpleFilter>, PersistError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let (start, empty) = loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => break (e.into_owned(), false),
            Event::Empty(e) => break (e.into_owned(), true),
            Event::Eof => return Err(PersistError::UnexpectedEof("simple_filter")),
            _ => {}
        }
        buf.clear();
    };
    expect_element(&start, "simple_filter")?;
    let name = attribute(&start, "filter_name")?.ok_or(PersistError::MissingAttribute {
        element: "simple_filter",
        attribute: "filter_name",
    })?;
    let filter = create_filter(&name).ok_or_else(|| PersistError::invalid("filter_name", &name))?;
    read_filter_element(&mut reader, &start, empty, filter.as_ref())?;
    Ok(filter)
}

fn read_filter_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    empty: bool,
    filter: &dyn AbstractSimpleFilter,
) -> Result<(), PersistError> {
    expect_element(start, "simple_filter")?;
    let attributes = attributes(start)?;
    let found = attributes
        .iter()
        .find(|(name, _)| name == "filter_name")
        .map(|(_, value)| value.clone())
        .ok_or(PersistError::MissingAttribute {
            element: "simple_filter",
            attribute: "filter_name",
        })?;
    if found != filter.filter_name() {
        return Err(PersistError::IncompatibleFilter {
            expected: filter.filter_name().to_string(),
            found,
        });
    }
    for (name, value) in &attributes {
        if name == "filter_name" {
            continue;
        }
        if !filter.load_attribute(name, value)? {
            log::warn!("ignoring unknown attribute `{name}` of {found}");
        }
    }
    if empty {
        return Ok(());
    }

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) if e.local_name().as_ref() == b"mask" => {
                filter.set_masked_interval(read_interval(&e, "mask")?, true);
            }
            Event::Start(e) if e.local_name().as_ref() == b"mask" => {
                filter.set_masked_interval(read_interval(&e, "mask")?, true);
                reader.read_to_end_into(e.name(), &mut Vec::new())?;
            }
            Event::Start(e) => {
                warn_unknown(&e, "simple_filter");
                reader.read_to_end_into(e.name(), &mut Vec::new())?;
            }
            Event::Empty(e) => warn_unknown(&e, "simple_filter"),
            Event::End(e) if e.local_name().as_ref() == b"simple_filter" => break,
            Event::Eof => return Err(PersistError::UnexpectedEof("simple_filter")),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

pub fn save_column(column: &Column) -> Result<String, PersistError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_column(&mut writer, column)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

pub fn write_column<W: Write>(writer: &mut Writer<W>, column: &Column) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new("column");
    start.push_attribute(("name", column.name().as_str()));
    start.push_attribute(("mode", column.column_mode().as_str()));
    start.push_attribute(("plot_designation", column.plot_designation().as_str()));
    start.push_attribute(("width", column.width().to_string().as_str()));
    writer.write_event(Event::Start(start))?;

    let comment = column.comment();
    if !comment.is_empty() {
        write_text_element(writer, BytesStart::new("comment"), &comment)?;
    }

    writer.write_event(Event::Start(BytesStart::new("input_filter")))?;
    write_filter(writer, column.input_filter().as_ref())?;
    writer.write_event(Event::End(BytesEnd::new("input_filter")))?;
    writer.write_event(Event::Start(BytesStart::new("output_filter")))?;
    write_filter(writer, column.output_filter().filter().as_ref())?;
    writer.write_event(Event::End(BytesEnd::new("output_filter")))?;

    for mask in column.masked_intervals() {
        writer.write_event(Event::Empty(interval_element("mask", mask)))?;
    }
    for (interval, formula) in column.formula_intervals() {
        write_text_element(writer, interval_element("formula", interval), &formula)?;
    }
    for row in 0..column.row_count() {
        let mut element = BytesStart::new("row");
        element.push_attribute(("index", row.to_string().as_str()));
        if column.is_invalid(row) {
            element.push_attribute(("invalid", "1"));
        }
        let text = column.cell(row).map(|cell| cell_text(&cell)).unwrap_or_default();
        write_text_element(writer, element, &text)?;
    }

    writer.write_event(Event::End(BytesEnd::new("column")))?;
    Ok(())
}

struct SavedRow {
    index: usize,
    text: String,
    invalid: bool,
}

/// Rebuild a column from a saved `<column>` element.
pub fn load_column(xml: &str) -> Result<Rc<Column>, PersistError> {
    let mut reader = Reader::from_str(xml);
    // Text cells keep their surrounding whitespace.
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let start = loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => break e.into_owned(),
            Event::Empty(e) => {
                expect_element(&e, "column")?;
                return column_from_attributes(&e);
            }
            Event::Eof => return Err(PersistError::UnexpectedEof("column")),
            _ => {}
        }
        buf.clear();
    };
    expect_element(&start, "column")?;
    let column = column_from_attributes(&start)?;

    let mut masking = IntervalAttribute::new();
    let mut formulas = IntervalAttribute::new();
    let mut rows = Vec::new();
    buf.clear();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"comment" => column.set_comment(read_text(&mut reader, "comment")?),
                b"input_filter" => {
                    let filter = column.input_filter();
                    read_wrapped_filter(&mut reader, "input_filter", filter.as_ref())?;
                }
                b"output_filter" => {
                    let filter = column.output_filter().filter();
                    read_wrapped_filter(&mut reader, "output_filter", filter.as_ref())?;
                }
                b"formula" => {
                    let interval = read_interval(&e, "formula")?;
                    let formula = read_text(&mut reader, "formula")?;
                    if !formula.is_empty() {
                        formulas.set_value(interval, formula);
                    }
                }
                b"row" => {
                    let (index, invalid) = read_row_attributes(&e)?;
                    let text = read_text(&mut reader, "row")?;
                    rows.push(SavedRow {
                        index,
                        text,
                        invalid,
                    });
                }
                b"mask" => {
                    masking.set(read_interval(&e, "mask")?, true);
                    reader.read_to_end_into(e.name(), &mut Vec::new())?;
                }
                _ => {
                    warn_unknown(&e, "column");
                    reader.read_to_end_into(e.name(), &mut Vec::new())?;
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"mask" => masking.set(read_interval(&e, "mask")?, true),
                b"row" => {
                    let (index, invalid) = read_row_attributes(&e)?;
                    rows.push(SavedRow {
                        index,
                        text: String::new(),
                        invalid,
                    });
                }
                b"comment" | b"input_filter" | b"output_filter" | b"formula" => {}
                _ => warn_unknown(&e, "column"),
            },
            Event::End(e) if e.local_name().as_ref() == b"column" => break,
            Event::Eof => return Err(PersistError::UnexpectedEof("column")),
            _ => {}
        }
        buf.clear();
    }

    let (data, validity) = parse_rows(column.data_type(), rows)?;
    column.restore_contents(ColumnContents {
        data,
        validity,
        masking,
        formulas,
    });
    Ok(column)
}

fn column_from_attributes(start: &BytesStart<'_>) -> Result<Rc<Column>, PersistError> {
    let mut name = None;
    let mut mode = None;
    let mut designation = PlotDesignation::None;
    let mut width: u32 = 0;
    for (key, value) in attributes(start)? {
        match key.as_str() {
            "name" => name = Some(value),
            "mode" => mode = Some(value.parse::<ColumnMode>()?),
            "plot_designation" => designation = value.parse::<PlotDesignation>()?,
            "width" => {
                width = value
                    .trim()
                    .parse()
                    .map_err(|_| PersistError::invalid("width", &value))?
            }
            _ => log::warn!("ignoring unknown attribute `{key}` of <column>"),
        }
    }
    let name = name.ok_or(PersistError::MissingAttribute {
        element: "column",
        attribute: "name",
    })?;
    let mode = mode.ok_or(PersistError::MissingAttribute {
        element: "column",
        attribute: "mode",
    })?;

    let column = Column::new(name, mode);
    column.set_plot_designation(designation);
    column.set_width(width);
    Ok(column)
}

/// Read the `<simple_filter>` inside a wrapper element up to the wrapper's end tag.
fn read_wrapped_filter(
    reader: &mut Reader<&[u8]>,
    wrapper: &'static str,
    filter: &dyn AbstractSimpleFilter,
) -> Result<(), PersistError> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"simple_filter" => {
                read_filter_element(reader, &e, false, filter)?;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"simple_filter" => {
                read_filter_element(reader, &e, true, filter)?;
            }
            Event::Start(e) => {
                warn_unknown(&e, wrapper);
                reader.read_to_end_into(e.name(), &mut Vec::new())?;
            }
            Event::Empty(e) => warn_unknown(&e, wrapper),
            Event::End(e) if e.local_name().as_ref() == wrapper.as_bytes() => break,
            Event::Eof => return Err(PersistError::UnexpectedEof(wrapper)),
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

/// Text content up to the end tag of the element just opened; nested elements are skipped.
fn read_text(reader: &mut Reader<&[u8]>, element: &'static str) -> Result<String, PersistError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(e) => {
                warn_unknown(&e, element);
                reader.read_to_end_into(e.name(), &mut Vec::new())?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(PersistError::UnexpectedEof(element)),
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

fn read_row_attributes(e: &BytesStart<'_>) -> Result<(usize, bool), PersistError> {
    let index = attribute(e, "index")?.ok_or(PersistError::MissingAttribute {
        element: "row",
        attribute: "index",
    })?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| PersistError::invalid("index", &index))?;
    let invalid = attribute(e, "invalid")?.is_some_and(|v| v == "1" || v == "true");
    Ok((index, invalid))
}

fn parse_rows(
    data_type: DataType,
    rows: Vec<SavedRow>,
) -> Result<(ColumnData, IntervalAttribute<bool>), PersistError> {
    let limit = rows.len().saturating_add(MAX_MISSING_ROWS);
    if let Some(row) = rows.iter().find(|row| row.index >= limit) {
        return Err(PersistError::invalid("index", &row.index.to_string()));
    }
    let len = rows.iter().map(|row| row.index + 1).max().unwrap_or(0);
    let mut data = ColumnData::empty(data_type);
    data.resize(len);
    let mut validity = IntervalAttribute::new();
    // Rows missing from the document stay blank and invalid.
    if let Some(all) = Interval::from_len(0, len) {
        validity.set(all, true);
    }
    for row in rows {
        data.write_at(row.index, parse_cell(data_type, &row.text, row.invalid)?);
        validity.set(Interval::single(row.index), row.invalid);
    }
    Ok((data, validity))
}

/// Invalid rows may hold text that does not parse; they read back as blank.
fn parse_cell(data_type: DataType, text: &str, invalid: bool) -> Result<ColumnData, PersistError> {
    let bad = || PersistError::invalid("row", text);
    let blank = invalid && text.trim().is_empty();
    Ok(match data_type {
        DataType::Text => ColumnData::Text(vec![text.to_string()]),
        DataType::Double if blank => ColumnData::Double(vec![f64::NAN]),
        DataType::Double => ColumnData::Double(vec![text.trim().parse().map_err(|_| bad())?]),
        DataType::Integer if blank => ColumnData::Integer(vec![0]),
        DataType::Integer => ColumnData::Integer(vec![text.trim().parse().map_err(|_| bad())?]),
        DataType::BigInt if blank => ColumnData::BigInt(vec![0]),
        DataType::BigInt => ColumnData::BigInt(vec![text.trim().parse().map_err(|_| bad())?]),
        DataType::DateTime if text.trim().is_empty() => ColumnData::DateTime(vec![None]),
        DataType::DateTime => {
            let value = NaiveDateTime::parse_from_str(text.trim(), ROW_DATE_TIME_FORMAT)
                .map_err(|_| bad())?;
            ColumnData::DateTime(vec![Some(value)])
        }
    })
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Double(value) => value.to_string(),
        Cell::Integer(value) => value.to_string(),
        Cell::BigInt(value) => value.to_string(),
        Cell::Text(value) => value.clone(),
        Cell::DateTime(Some(value)) => value.format(ROW_DATE_TIME_FORMAT).to_string(),
        Cell::DateTime(None) => String::new(),
    }
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), quick_xml::Error> {
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

fn interval_element(name: &str, interval: Interval) -> BytesStart<'_> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("start_row", interval.start().to_string().as_str()));
    element.push_attribute(("end_row", interval.end().to_string().as_str()));
    element
}

fn read_interval(e: &BytesStart<'_>, element: &'static str) -> Result<Interval, PersistError> {
    let row = |name: &'static str| -> Result<usize, PersistError> {
        let value = attribute(e, name)?.ok_or(PersistError::MissingAttribute {
            element,
            attribute: name,
        })?;
        value
            .trim()
            .parse()
            .map_err(|_| PersistError::invalid(name, &value))
    };
    Ok(Interval::new(row("start_row")?, row("end_row")?))
}

fn expect_element(e: &BytesStart<'_>, expected: &'static str) -> Result<(), PersistError> {
    if e.local_name().as_ref() == expected.as_bytes() {
        return Ok(());
    }
    Err(PersistError::UnexpectedElement {
        expected,
        found: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
    })
}

fn warn_unknown(e: &BytesStart<'_>, parent: &str) {
    log::warn!(
        "skipping unknown element <{}> in <{parent}>",
        String::from_utf8_lossy(e.local_name().as_ref())
    );
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, PersistError> {
    let mut out = Vec::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        out.push((key, attr.unescape_value()?.into_owned()));
    }
    Ok(out)
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, PersistError> {
    Ok(attributes(e)?
        .into_iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_text_round_trips_every_storage_kind() {
        let moment = NaiveDateTime::parse_from_str("2024-02-29T13:45:07.25", ROW_DATE_TIME_FORMAT)
            .expect("valid timestamp");
        for cell in [
            Cell::Double(-0.125),
            Cell::Integer(-7),
            Cell::BigInt(1 << 40),
            Cell::Text(" padded ".into()),
            Cell::DateTime(Some(moment)),
        ] {
            let text = cell_text(&cell);
            let parsed = parse_cell(cell.data_type(), &text, false).expect("parses");
            assert_eq!(parsed, ColumnData::from(cell));
        }
    }

    #[test]
    fn unparseable_rows_are_errors_unless_blank_and_invalid() {
        assert!(parse_cell(DataType::Integer, "x", false).is_err());
        assert_eq!(
            parse_cell(DataType::Integer, "", true).ok(),
            Some(ColumnData::Integer(vec![0]))
        );
    }
}
