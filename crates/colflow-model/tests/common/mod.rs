#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use colflow_model::{AbstractColumn, ColumnEvent, EventMask};

/// Events delivered to a callback subscription, rendered with `Debug`.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn attach(column: &dyn AbstractColumn, mask: EventMask) -> Self {
        let log = EventLog::default();
        let sink = log.0.clone();
        column
            .signals()
            .connect_fn(mask, move |_: &dyn AbstractColumn, event: &ColumnEvent| {
                sink.borrow_mut().push(format!("{event:?}"));
            });
        log
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Raw events, for checks that need the variants themselves.
#[derive(Clone, Default)]
pub struct EventTrace(Rc<RefCell<Vec<ColumnEvent>>>);

impl EventTrace {
    pub fn attach(column: &dyn AbstractColumn) -> Self {
        let trace = EventTrace::default();
        let sink = trace.0.clone();
        column
            .signals()
            .connect_fn(EventMask::ALL, move |_: &dyn AbstractColumn, event: &ColumnEvent| {
                sink.borrow_mut().push(event.clone());
            });
        trace
    }

    pub fn take(&self) -> Vec<ColumnEvent> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
