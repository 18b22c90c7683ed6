use std::cell::RefCell;
use std::rc::{Rc, Weak};

use colflow_model::conversion::DoubleToString;
use colflow_model::{
    same_column, AbstractColumn, AbstractFilter, Column, ColumnMode, ColumnObserver, ColumnRef,
    InputPorts, SimpleFilter,
};
use pretty_assertions::assert_eq;

mod common;

use common::strings;

/// Two-port sink that records the wiring handlers it receives.
struct Probe {
    ports: InputPorts,
    calls: RefCell<Vec<String>>,
}

impl Probe {
    fn new() -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Probe>| {
            let owner: Weak<dyn ColumnObserver> = this.clone();
            Probe {
                ports: InputPorts::new(owner),
                calls: RefCell::new(Vec::new()),
            }
        })
    }

    fn record(&self, what: &str, source: &dyn AbstractColumn) {
        self.calls
            .borrow_mut()
            .push(format!("{what} {}", source.name()));
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

impl AbstractFilter for Probe {
    fn input_count(&self) -> Option<usize> {
        Some(2)
    }

    fn output_count(&self) -> usize {
        0
    }

    fn output(&self, _port: usize) -> Option<ColumnRef> {
        None
    }

    fn ports(&self) -> &InputPorts {
        &self.ports
    }

    fn input_acceptable(&self, _port: usize, source: &dyn AbstractColumn) -> bool {
        source.column_mode() != ColumnMode::Day
    }

    fn input_mode_about_to_change(&self, source: &dyn AbstractColumn) {
        self.record("mode?", source);
    }

    fn input_mode_changed(&self, source: &dyn AbstractColumn) {
        self.record("mode!", source);
    }

    fn input_data_about_to_change(&self, source: &dyn AbstractColumn) {
        self.record("data?", source);
    }

    fn input_data_changed(&self, source: &dyn AbstractColumn) {
        self.record("data!", source);
    }

    fn input_about_to_be_disconnected(&self, source: &dyn AbstractColumn) {
        self.record("gone", source);
    }
}

fn column_ref(column: &Rc<Column>) -> ColumnRef {
    column.clone()
}

#[test]
fn connecting_an_empty_port_announces_the_new_source() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.0]);

    assert!(probe.input(0, Some(column_ref(&x))));
    assert_eq!(probe.take(), strings(&["data? x", "data! x"]));
    assert_eq!(probe.highest_connected_input(), Some(0));
    assert_eq!(probe.port_index_of(&*x), Some(0));
}

#[test]
fn switching_to_another_mode_raises_the_mode_pair() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.0]);
    let t = Column::from_texts("t", vec!["a".into()]);
    probe.input(0, Some(column_ref(&x)));
    probe.take();

    assert!(probe.input(0, Some(column_ref(&t))));
    assert_eq!(
        probe.take(),
        strings(&["data? x", "mode? x", "data! t", "mode! t"])
    );

    // Reconnecting the current source changes nothing.
    assert!(probe.input(0, Some(column_ref(&t))));
    assert_eq!(probe.take(), Vec::<String>::new());
}

#[test]
fn rejected_sources_leave_the_port_alone() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.0]);
    let days = Column::new("d", ColumnMode::Day);
    probe.input(0, Some(column_ref(&x)));
    probe.take();

    assert!(!probe.input(0, Some(column_ref(&days))));
    assert!(!probe.input(2, Some(column_ref(&x))));
    assert_eq!(probe.take(), Vec::<String>::new());
    let connected = probe.input_at(0).expect("port 0 still connected");
    assert!(same_column(connected.as_ref(), &*x));
}

#[test]
fn ports_grow_and_shrink() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.0]);

    assert!(probe.input(1, Some(column_ref(&x))));
    assert_eq!(probe.highest_connected_input(), Some(1));
    assert!(probe.input_at(0).is_none());
    assert_eq!(probe.input_label(1), "In2");

    assert!(probe.input(1, None));
    assert_eq!(probe.highest_connected_input(), None);
    assert!(probe.take().contains(&"gone x".to_string()));
}

#[test]
fn destroyed_sources_are_disconnected() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.0]);
    let y = Column::from_values("y", vec![2.0]);
    probe.input(0, Some(column_ref(&x)));
    probe.input(1, Some(column_ref(&y)));
    probe.take();

    drop(y);
    assert_eq!(probe.take(), strings(&["gone y"]));
    assert_eq!(probe.highest_connected_input(), Some(0));

    drop(x);
    assert_eq!(probe.take(), strings(&["gone x"]));
    assert!(probe.input_at(0).is_none());
    assert_eq!(probe.highest_connected_input(), None);
}

#[test]
fn consumers_follow_a_replaced_output_filter() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.5]);
    probe.input(0, Some(x.output_filter().column()));
    probe.take();

    x.set_column_mode(ColumnMode::Text);
    assert_eq!(
        probe.take(),
        strings(&["data? Double2StringFilter", "data! SimpleCopyThroughFilter"])
    );

    let rewired = probe.input_at(0).expect("probe follows the new output filter");
    assert!(same_column(rewired.as_ref(), x.output_filter().column().as_ref()));
    assert_eq!(rewired.text_at(0), "1.5");
    assert_eq!(rewired.column_mode(), ColumnMode::Text);
}

#[test]
fn sources_of_another_filter_wire_port_by_port() {
    let probe = Probe::new();
    let x = Column::from_values("x", vec![1.0]);
    let formatter = SimpleFilter::new(DoubleToString::default());
    formatter.input(0, Some(column_ref(&x)));

    assert!(probe.input_from_filter(&*formatter));
    let connected = probe.input_at(0).expect("port 0 wired");
    assert!(same_column(connected.as_ref(), &*formatter));
    assert_eq!(connected.text_at(0), "1");
}
