//! Text front end of a [`Column`]: the string view fed into its input filter and the typed
//! handles to its input and output filters.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::abstract_column::{AbstractColumn, ColumnRef};
use super::Column;
use crate::conversion::{
    BigIntToString, DateTimeToString, DoubleToString, IntegerToString, SimpleCopyThrough,
    StringToBigInt, StringToDateTime, StringToDayOfWeek, StringToDouble, StringToInteger,
    StringToMonth,
};
use crate::mode::ColumnMode;
use crate::notify::Signals;
use crate::options::{ColumnOptions, DAY_FORMAT, MONTH_FORMAT};
use crate::simple_filter::{AbstractSimpleFilter, SimpleFilter};

/// Text view of a column, used as the source of the column's input filter.
///
/// Rows read as the column's formatted output, except for the one row whose new text is being
/// parsed by [`Column::set_text_at`].
pub struct ColumnStringIo {
    owner: Weak<Column>,
    pending: RefCell<Option<(usize, String)>>,
    signals: Signals,
}

impl ColumnStringIo {
    pub(crate) fn new(owner: Weak<Column>) -> Rc<Self> {
        Rc::new(Self {
            owner,
            pending: RefCell::new(None),
            signals: Signals::new(),
        })
    }

    pub(crate) fn set_pending(&self, row: usize, text: String) {
        self.pending.replace(Some((row, text)));
    }

    pub(crate) fn clear_pending(&self) {
        self.pending.replace(None);
    }

    fn pending_text(&self, row: usize) -> Option<String> {
        self.pending
            .borrow()
            .as_ref()
            .filter(|(pending, _)| *pending == row)
            .map(|(_, text)| text.clone())
    }
}

impl AbstractColumn for ColumnStringIo {
    fn name(&self) -> String {
        self.owner
            .upgrade()
            .map(|owner| owner.name())
            .unwrap_or_default()
    }

    fn column_mode(&self) -> ColumnMode {
        ColumnMode::Text
    }

    fn row_count(&self) -> usize {
        let rows = self.owner.upgrade().map_or(0, |owner| owner.row_count());
        match &*self.pending.borrow() {
            Some((row, _)) => rows.max(row + 1),
            None => rows,
        }
    }

    fn text_at(&self, row: usize) -> String {
        if let Some(text) = self.pending_text(row) {
            return text;
        }
        self.owner
            .upgrade()
            .map(|owner| owner.formatted_text(row))
            .unwrap_or_default()
    }

    fn is_invalid(&self, row: usize) -> bool {
        if self.pending_text(row).is_some() {
            return false;
        }
        self.owner
            .upgrade()
            .is_some_and(|owner| owner.is_invalid(row))
    }

    fn signals(&self) -> &Signals {
        &self.signals
    }
}

/// Parser from text to the column's storage, chosen by mode.
#[derive(Clone)]
pub enum InputFilter {
    Double(Rc<SimpleFilter<StringToDouble>>),
    Integer(Rc<SimpleFilter<StringToInteger>>),
    BigInt(Rc<SimpleFilter<StringToBigInt>>),
    Text(Rc<SimpleFilter<SimpleCopyThrough>>),
    DateTime(Rc<SimpleFilter<StringToDateTime>>),
    Month(Rc<SimpleFilter<StringToMonth>>),
    Day(Rc<SimpleFilter<StringToDayOfWeek>>),
}

impl InputFilter {
    pub(crate) fn for_mode(mode: ColumnMode, options: &ColumnOptions) -> Self {
        let locale = options.number_locale();
        match mode {
            ColumnMode::Numeric => InputFilter::Double(SimpleFilter::new(StringToDouble { locale })),
            ColumnMode::Integer => {
                InputFilter::Integer(SimpleFilter::new(StringToInteger { locale }))
            }
            ColumnMode::BigInt => InputFilter::BigInt(SimpleFilter::new(StringToBigInt { locale })),
            ColumnMode::Text => InputFilter::Text(SimpleFilter::new(SimpleCopyThrough)),
            ColumnMode::DateTime => InputFilter::DateTime(SimpleFilter::new(StringToDateTime {
                format: Some(options.date_time_format.clone()),
            })),
            ColumnMode::Month => InputFilter::Month(SimpleFilter::new(StringToMonth)),
            ColumnMode::Day => InputFilter::Day(SimpleFilter::new(StringToDayOfWeek)),
        }
    }

    pub fn filter(&self) -> Rc<dyn AbstractSimpleFilter> {
        match self {
            InputFilter::Double(f) => f.clone(),
            InputFilter::Integer(f) => f.clone(),
            InputFilter::BigInt(f) => f.clone(),
            InputFilter::Text(f) => f.clone(),
            InputFilter::DateTime(f) => f.clone(),
            InputFilter::Month(f) => f.clone(),
            InputFilter::Day(f) => f.clone(),
        }
    }
}

/// Formatter from the column's storage to display text, chosen by storage kind.
///
/// Month and Day columns use [`OutputFilter::DateTime`] with the `%B` / `%A` formats.
#[derive(Clone)]
pub enum OutputFilter {
    Double(Rc<SimpleFilter<DoubleToString>>),
    Integer(Rc<SimpleFilter<IntegerToString>>),
    BigInt(Rc<SimpleFilter<BigIntToString>>),
    Text(Rc<SimpleFilter<SimpleCopyThrough>>),
    DateTime(Rc<SimpleFilter<DateTimeToString>>),
}

impl OutputFilter {
    pub(crate) fn for_mode(mode: ColumnMode, options: &ColumnOptions) -> Self {
        match mode {
            ColumnMode::Numeric => OutputFilter::Double(SimpleFilter::new(DoubleToString {
                format: options.numeric_format(),
                digits: options.digits,
                locale: options.number_locale(),
            })),
            ColumnMode::Integer => OutputFilter::Integer(SimpleFilter::new(IntegerToString)),
            ColumnMode::BigInt => OutputFilter::BigInt(SimpleFilter::new(BigIntToString)),
            ColumnMode::Text => OutputFilter::Text(SimpleFilter::new(SimpleCopyThrough)),
            ColumnMode::DateTime => OutputFilter::DateTime(SimpleFilter::new(
                DateTimeToString::new(options.date_time_format.clone()),
            )),
            ColumnMode::Month => {
                OutputFilter::DateTime(SimpleFilter::new(DateTimeToString::new(MONTH_FORMAT)))
            }
            ColumnMode::Day => {
                OutputFilter::DateTime(SimpleFilter::new(DateTimeToString::new(DAY_FORMAT)))
            }
        }
    }

    pub fn filter(&self) -> Rc<dyn AbstractSimpleFilter> {
        match self {
            OutputFilter::Double(f) => f.clone(),
            OutputFilter::Integer(f) => f.clone(),
            OutputFilter::BigInt(f) => f.clone(),
            OutputFilter::Text(f) => f.clone(),
            OutputFilter::DateTime(f) => f.clone(),
        }
    }

    /// The filter's output column.
    pub fn column(&self) -> ColumnRef {
        match self {
            OutputFilter::Double(f) => f.clone(),
            OutputFilter::Integer(f) => f.clone(),
            OutputFilter::BigInt(f) => f.clone(),
            OutputFilter::Text(f) => f.clone(),
            OutputFilter::DateTime(f) => f.clone(),
        }
    }
}
