use colflow_model::command::{
    ClearFormulasCommand, CopyCommand, RemoveRowsCommand, ReplaceValuesCommand,
    SetColumnModeCommand, SetFormulaCommand, SetMaskedCommand,
};
use colflow_model::{
    AbstractColumn, Column, ColumnData, ColumnMode, ColumnRef, EventMask, Interval,
    OutputFilter, UndoStack,
};
use pretty_assertions::assert_eq;

mod common;

use common::{strings, EventLog};

fn values(column: &Column) -> Vec<f64> {
    (0..column.row_count()).map(|row| column.value_at(row)).collect()
}

#[test]
fn lossy_mode_change_is_undone_exactly() {
    let column = Column::from_values("x", vec![1.5, 2.7]);
    let mut stack = UndoStack::new();

    stack.push(Box::new(SetColumnModeCommand::new(column.clone(), ColumnMode::Integer)));
    assert_eq!(column.integer_at(0), 2);
    assert_eq!(stack.undo_text().as_deref(), Some("x: change column type to Integer"));

    assert!(stack.undo());
    assert_eq!(column.column_mode(), ColumnMode::Numeric);
    assert_eq!(values(&column), vec![1.5, 2.7]);

    assert!(stack.redo());
    assert_eq!(column.column_mode(), ColumnMode::Integer);
    assert_eq!(column.integer_at(1), 3);
}

#[test]
fn undoing_a_mode_change_keeps_the_display_settings() {
    let column = Column::from_values("x", vec![1.0 / 3.0]);
    let digits = |column: &Column| match column.output_filter() {
        OutputFilter::Double(filter) => filter.digits(),
        _ => panic!("numeric columns format with a double filter"),
    };
    if let OutputFilter::Double(filter) = column.output_filter() {
        filter.set_digits(3);
    }
    let mut stack = UndoStack::new();

    stack.push(Box::new(SetColumnModeCommand::new(column.clone(), ColumnMode::Text)));
    assert_eq!(column.text_at(0), "0.333");
    stack.undo();
    assert_eq!(digits(&column), 3);
    assert_eq!(column.formatted_text(0), "0.333");
    assert_eq!(column.value_at(0), 1.0 / 3.0);

    stack.redo();
    assert_eq!(column.text_at(0), "0.333");
    stack.undo();
    assert_eq!(digits(&column), 3);

    let data = EventLog::attach(&*column, EventMask::DATA);
    if let OutputFilter::Double(filter) = column.output_filter() {
        filter.set_digits(2);
    }
    assert_eq!(data.take(), strings(&["DataAboutToChange", "DataChanged"]));
    assert_eq!(column.formatted_text(0), "0.33");
}

#[test]
fn removed_rows_come_back_with_their_flags() {
    let column = Column::from_values("x", vec![1.0, 2.0, 3.0, 4.0]);
    column.set_invalid(2, true);
    column.set_masked(1, true);
    column.set_formula(2, "x+1");
    let mut stack = UndoStack::new();

    stack.push(Box::new(RemoveRowsCommand::new(column.clone(), 1, 10)));
    assert_eq!(values(&column), vec![1.0]);
    assert!(column.invalid_intervals().is_empty());

    stack.undo();
    assert_eq!(values(&column), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(column.invalid_intervals(), vec![Interval::single(2)]);
    assert_eq!(column.masked_intervals(), vec![Interval::single(1)]);
    assert_eq!(column.formula(2).as_deref(), Some("x+1"));
}

#[test]
fn copy_can_be_reverted() {
    let target = Column::from_values("target", vec![9.0, 9.0]);
    let source = Column::from_values("source", vec![1.0, 2.0, 3.0]);
    source.set_invalid(0, true);
    let source_ref: ColumnRef = source.clone();
    let mut stack = UndoStack::new();

    stack.push(Box::new(CopyCommand::rows(target.clone(), source_ref.clone(), 1, 3, 2)));
    assert_eq!(target.row_count(), 5);
    assert_eq!(target.value_at(3), 2.0);
    assert_eq!(target.value_at(4), 3.0);
    assert_eq!(target.invalid_intervals(), vec![Interval::single(2)]);

    stack.push(Box::new(CopyCommand::new(target.clone(), source_ref)));
    assert_eq!(values(&target).len(), 3);
    assert_eq!(target.invalid_intervals(), vec![Interval::single(0)]);

    stack.undo();
    stack.undo();
    assert_eq!(values(&target), vec![9.0, 9.0]);
    assert!(target.invalid_intervals().is_empty());
}

#[test]
fn copying_across_modes_is_refused() {
    let target = Column::from_values("target", vec![1.0]);
    let text: ColumnRef = Column::from_texts("t", vec!["a".into()]);
    assert!(!target.copy(text.as_ref()));
    assert!(!target.copy_rows(text.as_ref(), 0, 0, 1));
    assert_eq!(values(&target), vec![1.0]);
}

#[test]
fn masking_and_formulas_are_undoable() {
    let column = Column::from_values("x", vec![1.0, 2.0, 3.0]);
    let mut stack = UndoStack::new();

    stack.push(Box::new(SetMaskedCommand::new(column.clone(), Interval::new(0, 1), true)));
    stack.push(Box::new(SetFormulaCommand::new(column.clone(), Interval::new(0, 2), "2*i")));
    stack.push(Box::new(ClearFormulasCommand::new(column.clone())));
    assert_eq!(column.formula(1), None);
    assert_eq!(stack.undo_text().as_deref(), Some("x: clear all formulas"));

    stack.undo();
    assert_eq!(column.formula(1).as_deref(), Some("2*i"));
    stack.undo();
    assert_eq!(column.formula(1), None);
    assert_eq!(stack.undo_text().as_deref(), Some("x: mask cells [0,1]"));
    stack.undo();
    assert!(column.masked_intervals().is_empty());
    assert!(!stack.can_undo());
}

#[test]
fn replaced_values_restore_the_old_length() {
    let column = Column::from_integers("n", vec![1, 2]);
    let log = EventLog::attach(&*column, EventMask::ALL);
    let mut stack = UndoStack::new();

    stack.push(Box::new(ReplaceValuesCommand::new(
        column.clone(),
        3,
        ColumnData::Integer(vec![7]),
    )));
    assert_eq!(column.row_count(), 4);
    assert_eq!(column.invalid_intervals(), vec![Interval::single(2)]);

    stack.undo();
    assert_eq!(column.row_count(), 2);
    assert!(column.invalid_intervals().is_empty());
    assert_eq!(
        log.take(),
        strings(&[
            "DataAboutToChange",
            "DataChanged",
            "DataAboutToChange",
            "DataChanged",
            "MaskingAboutToChange",
            "MaskingChanged",
        ])
    );
}
