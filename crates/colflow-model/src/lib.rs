//! `colflow-model` implements typed spreadsheet columns wired into a filter graph.
//!
//! A [`Column`] owns typed storage and exposes it through the [`AbstractColumn`] read API.
//! Filters ([`AbstractFilter`]) read columns through weakly held input ports and expose output
//! columns of their own, so conversions and transformations chain into an acyclic graph. Every
//! change travels through that graph as paired notifications ([`ColumnEvent`]).
//!
//! The crate is single-threaded by construction (`Rc`/`RefCell`); the layers built on top of it
//! (import/export, views, plots) consume it through the read, mutate and wire calls only.

#![forbid(unsafe_code)]

pub mod column;
pub mod command;
pub mod conversion;
mod error;
pub mod filter;
pub mod interval;
mod mode;
pub mod notify;
mod options;
pub mod persist;
pub mod simple_filter;

pub use column::abstract_column::{same_column, AbstractColumn, Cell, ColumnRef};
pub use column::{Column, ColumnData, ColumnStringIo, InputFilter, OutputFilter};
pub use command::{ColumnCommand, UndoStack};
pub use conversion::{converter, create_filter};
pub use error::{OptionsError, PersistError};
pub use filter::{AbstractFilter, InputPorts};
pub use interval::{Interval, IntervalAttribute};
pub use mode::{ColumnMode, DataType, PlotDesignation, UnknownNameError};
pub use notify::{ColumnEvent, ColumnObserver, EventMask, Signals, SubscriptionId};
pub use options::{
    is_valid_date_time_format, ColumnOptions, DAY_FORMAT, DEFAULT_DATE_TIME_FORMAT, MONTH_FORMAT,
};
pub use persist::{load_column, load_filter, read_filter, save_column, save_filter};
pub use simple_filter::{AbstractSimpleFilter, FilterKernel, SimpleFilter};
