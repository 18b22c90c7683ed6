//! Reversible column edits and an undo stack to run them on.
//!
//! Each command performs its edit through the regular [`Column`] API, so it emits the same
//! notifications as a direct call. Reverting restores the captured state exactly, which matters
//! for lossy edits such as a mode change.

use std::rc::Rc;

use crate::column::abstract_column::{AbstractColumn, ColumnRef};
use crate::column::{Column, ColumnContents, ColumnData, InputFilter, OutputFilter};
use crate::interval::{Interval, IntervalAttribute};
use crate::mode::{ColumnMode, PlotDesignation};

/// An edit that can be applied and reverted any number of times, alternately.
pub trait ColumnCommand {
    /// Short description for undo/redo menus.
    fn text(&self) -> String;

    fn apply(&mut self);

    fn revert(&mut self);
}

/// Applied commands with their undo/redo history.
#[derive(Default)]
pub struct UndoStack {
    done: Vec<Box<dyn ColumnCommand>>,
    undone: Vec<Box<dyn ColumnCommand>>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command` and record it. Drops the redo history.
    pub fn push(&mut self, mut command: Box<dyn ColumnCommand>) {
        log::debug!("apply: {}", command.text());
        command.apply();
        self.done.push(command);
        self.undone.clear();
    }

    pub fn undo(&mut self) -> bool {
        let Some(mut command) = self.done.pop() else {
            return false;
        };
        log::debug!("undo: {}", command.text());
        command.revert();
        self.undone.push(command);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(mut command) = self.undone.pop() else {
            return false;
        };
        log::debug!("redo: {}", command.text());
        command.apply();
        self.done.push(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_text(&self) -> Option<String> {
        self.done.last().map(|command| command.text())
    }

    pub fn redo_text(&self) -> Option<String> {
        self.undone.last().map(|command| command.text())
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}

impl std::fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoStack")
            .field("done", &self.done.len())
            .field("undone", &self.undone.len())
            .finish()
    }
}

/// Change the column mode. Reverting puts back the filters that were replaced, so display
/// settings such as digits survive an undo.
pub struct SetColumnModeCommand {
    column: Rc<Column>,
    mode: ColumnMode,
    previous: Option<PreviousMode>,
    installed: Option<(InputFilter, OutputFilter)>,
}

struct PreviousMode {
    mode: ColumnMode,
    contents: ColumnContents,
    filters: (InputFilter, OutputFilter),
}

impl SetColumnModeCommand {
    pub fn new(column: Rc<Column>, mode: ColumnMode) -> Self {
        Self {
            column,
            mode,
            previous: None,
            installed: None,
        }
    }
}

impl ColumnCommand for SetColumnModeCommand {
    fn text(&self) -> String {
        format!("{}: change column type to {}", self.column.name(), self.mode)
    }

    fn apply(&mut self) {
        let mode = self.column.column_mode();
        let contents = self.column.contents();
        if let Some(filters) = self.column.switch_mode(self.mode, self.installed.take()) {
            self.previous = Some(PreviousMode {
                mode,
                contents,
                filters,
            });
        }
    }

    fn revert(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.installed = self
                .column
                .switch_mode(previous.mode, Some(previous.filters));
            self.column.restore_contents(previous.contents);
        }
    }
}

/// Copy all rows of a source column, or a range of them.
pub struct CopyCommand {
    column: Rc<Column>,
    source: ColumnRef,
    rows: Option<(usize, usize, usize)>,
    previous: Option<ColumnContents>,
}

impl CopyCommand {
    pub fn new(column: Rc<Column>, source: ColumnRef) -> Self {
        Self {
            column,
            source,
            rows: None,
            previous: None,
        }
    }

    /// Copy `count` rows from `source_start` to `dest_start`.
    pub fn rows(
        column: Rc<Column>,
        source: ColumnRef,
        source_start: usize,
        dest_start: usize,
        count: usize,
    ) -> Self {
        Self {
            column,
            source,
            rows: Some((source_start, dest_start, count)),
            previous: None,
        }
    }
}

impl ColumnCommand for CopyCommand {
    fn text(&self) -> String {
        format!("{}: copy values from {}", self.column.name(), self.source.name())
    }

    fn apply(&mut self) {
        self.previous = Some(self.column.contents());
        let copied = match self.rows {
            None => self.column.copy(self.source.as_ref()),
            Some((source_start, dest_start, count)) => {
                self.column
                    .copy_rows(self.source.as_ref(), source_start, dest_start, count)
            }
        };
        if !copied {
            self.previous = None;
        }
    }

    fn revert(&mut self) {
        if let Some(contents) = self.previous.take() {
            self.column.restore_contents(contents);
        }
    }
}

pub struct InsertRowsCommand {
    column: Rc<Column>,
    before: usize,
    count: usize,
    inserted_at: Option<usize>,
}

impl InsertRowsCommand {
    pub fn new(column: Rc<Column>, before: usize, count: usize) -> Self {
        Self {
            column,
            before,
            count,
            inserted_at: None,
        }
    }
}

impl ColumnCommand for InsertRowsCommand {
    fn text(&self) -> String {
        format!("{}: insert {} rows", self.column.name(), self.count)
    }

    fn apply(&mut self) {
        let before = self.before.min(self.column.row_count());
        self.column.insert_rows(before, self.count);
        self.inserted_at = Some(before);
    }

    fn revert(&mut self) {
        if let Some(before) = self.inserted_at.take() {
            self.column.remove_rows(before, self.count);
        }
    }
}

pub struct RemoveRowsCommand {
    column: Rc<Column>,
    first: usize,
    count: usize,
    removed: Option<(usize, ColumnContents)>,
}

impl RemoveRowsCommand {
    pub fn new(column: Rc<Column>, first: usize, count: usize) -> Self {
        Self {
            column,
            first,
            count,
            removed: None,
        }
    }
}

impl ColumnCommand for RemoveRowsCommand {
    fn text(&self) -> String {
        format!("{}: remove {} rows", self.column.name(), self.count)
    }

    fn apply(&mut self) {
        let count = self
            .count
            .min(self.column.row_count().saturating_sub(self.first));
        self.removed = Some((count, self.column.contents()));
        self.column.remove_rows(self.first, count);
    }

    fn revert(&mut self) {
        if let Some((count, contents)) = self.removed.take() {
            self.column.insert_rows(self.first, count);
            self.column.restore_contents(contents);
        }
    }
}

pub struct SetMaskedCommand {
    column: Rc<Column>,
    interval: Interval,
    masked: bool,
    previous: Option<IntervalAttribute<bool>>,
}

impl SetMaskedCommand {
    pub fn new(column: Rc<Column>, interval: Interval, masked: bool) -> Self {
        Self {
            column,
            interval,
            masked,
            previous: None,
        }
    }
}

impl ColumnCommand for SetMaskedCommand {
    fn text(&self) -> String {
        let verb = if self.masked { "mask" } else { "unmask" };
        format!("{}: {verb} cells {}", self.column.name(), self.interval)
    }

    fn apply(&mut self) {
        self.previous = Some(self.column.masking());
        self.column.set_masked_interval(self.interval, self.masked);
    }

    fn revert(&mut self) {
        if let Some(masking) = self.previous.take() {
            self.column.restore_masking(masking);
        }
    }
}

pub struct ClearMasksCommand {
    column: Rc<Column>,
    previous: Option<IntervalAttribute<bool>>,
}

impl ClearMasksCommand {
    pub fn new(column: Rc<Column>) -> Self {
        Self {
            column,
            previous: None,
        }
    }
}

impl ColumnCommand for ClearMasksCommand {
    fn text(&self) -> String {
        format!("{}: clear masks", self.column.name())
    }

    fn apply(&mut self) {
        self.previous = Some(self.column.masking());
        self.column.clear_masks();
    }

    fn revert(&mut self) {
        if let Some(masking) = self.previous.take() {
            self.column.restore_masking(masking);
        }
    }
}

pub struct SetPlotDesignationCommand {
    column: Rc<Column>,
    designation: PlotDesignation,
    previous: Option<PlotDesignation>,
}

impl SetPlotDesignationCommand {
    pub fn new(column: Rc<Column>, designation: PlotDesignation) -> Self {
        Self {
            column,
            designation,
            previous: None,
        }
    }
}

impl ColumnCommand for SetPlotDesignationCommand {
    fn text(&self) -> String {
        format!(
            "{}: set plot designation to {}",
            self.column.name(),
            self.designation
        )
    }

    fn apply(&mut self) {
        self.previous = Some(self.column.plot_designation());
        self.column.set_plot_designation(self.designation);
    }

    fn revert(&mut self) {
        if let Some(designation) = self.previous.take() {
            self.column.set_plot_designation(designation);
        }
    }
}

pub struct SetFormulaCommand {
    column: Rc<Column>,
    interval: Interval,
    formula: String,
    previous: Option<IntervalAttribute<String>>,
}

impl SetFormulaCommand {
    pub fn new(column: Rc<Column>, interval: Interval, formula: impl Into<String>) -> Self {
        Self {
            column,
            interval,
            formula: formula.into(),
            previous: None,
        }
    }
}

impl ColumnCommand for SetFormulaCommand {
    fn text(&self) -> String {
        format!("{}: set cell formula", self.column.name())
    }

    fn apply(&mut self) {
        self.previous = Some(self.column.formulas());
        self.column
            .set_formula_interval(self.interval, self.formula.clone());
    }

    fn revert(&mut self) {
        if let Some(formulas) = self.previous.take() {
            self.column.restore_formulas(formulas);
        }
    }
}

pub struct ClearFormulasCommand {
    column: Rc<Column>,
    previous: Option<IntervalAttribute<String>>,
}

impl ClearFormulasCommand {
    pub fn new(column: Rc<Column>) -> Self {
        Self {
            column,
            previous: None,
        }
    }
}

impl ColumnCommand for ClearFormulasCommand {
    fn text(&self) -> String {
        format!("{}: clear all formulas", self.column.name())
    }

    fn apply(&mut self) {
        self.previous = Some(self.column.formulas());
        self.column.clear_formulas();
    }

    fn revert(&mut self) {
        if let Some(formulas) = self.previous.take() {
            self.column.restore_formulas(formulas);
        }
    }
}

/// Overwrite rows from `first` with typed values, growing the column as needed.
pub struct ReplaceValuesCommand {
    column: Rc<Column>,
    first: usize,
    values: ColumnData,
    previous: Option<ColumnContents>,
}

impl ReplaceValuesCommand {
    pub fn new(column: Rc<Column>, first: usize, values: ColumnData) -> Self {
        Self {
            column,
            first,
            values,
            previous: None,
        }
    }
}

impl ColumnCommand for ReplaceValuesCommand {
    fn text(&self) -> String {
        format!("{}: replace values", self.column.name())
    }

    fn apply(&mut self) {
        let contents = self.column.contents();
        if self.column.replace_data(self.first, self.values.clone(), false) {
            self.previous = Some(contents);
        }
    }

    fn revert(&mut self) {
        if let Some(contents) = self.previous.take() {
            self.column.restore_contents(contents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_walk_the_history() {
        let column = Column::from_values("x", vec![1.0, 2.0]);
        let mut stack = UndoStack::new();
        stack.push(Box::new(InsertRowsCommand::new(column.clone(), 1, 2)));
        assert_eq!(column.row_count(), 4);
        assert_eq!(stack.undo_text().as_deref(), Some("x: insert 2 rows"));

        assert!(stack.undo());
        assert_eq!(column.row_count(), 2);
        assert!(!stack.undo());
        assert!(stack.redo());
        assert_eq!(column.row_count(), 4);
        assert!(!stack.can_redo());

        stack.clear();
        assert!(!stack.can_undo());
    }

    #[test]
    fn pushing_drops_the_redo_history() {
        let column = Column::new("x", ColumnMode::Numeric);
        let mut stack = UndoStack::new();
        stack.push(Box::new(SetPlotDesignationCommand::new(column.clone(), PlotDesignation::X)));
        stack.undo();
        assert!(stack.can_redo());
        stack.push(Box::new(ClearMasksCommand::new(column.clone())));
        assert!(!stack.can_redo());
        assert_eq!(column.plot_designation(), PlotDesignation::None);
    }
}
