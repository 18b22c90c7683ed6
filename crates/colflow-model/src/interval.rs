#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed, non-empty range of row indices `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    /// Build the interval spanning both endpoints (they may be given in either order).
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(row: usize) -> Self {
        Self { start: row, end: row }
    }

    /// `count` rows starting at `start`, or `None` when `count == 0`.
    pub fn from_len(start: usize, count: usize) -> Option<Self> {
        (count > 0).then(|| Self {
            start,
            end: start + count - 1,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Intervals always hold at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, row: usize) -> bool {
        self.start <= row && row <= self.end
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        self.intersects(other).then(|| Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// The parts of `self` left of and right of `other`.
    pub fn subtract(&self, other: &Interval) -> (Option<Interval>, Option<Interval>) {
        if !self.intersects(other) {
            return if self.end < other.start {
                (Some(*self), None)
            } else {
                (None, Some(*self))
            };
        }
        let left = (self.start < other.start).then(|| Interval::new(self.start, other.start - 1));
        let right = (self.end > other.end).then(|| Interval::new(other.end + 1, self.end));
        (left, right)
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    fn shifted_up(&self, count: usize) -> Interval {
        Interval {
            start: self.start + count,
            end: self.end + count,
        }
    }

    fn shifted_down(&self, count: usize) -> Interval {
        Interval {
            start: self.start - count,
            end: self.end - count,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.start, self.end)
    }
}

/// Sparse per-row attribute stored as disjoint row intervals.
///
/// Rows not covered by any interval are "unset". Neighbouring intervals carrying equal values
/// are always merged, so the stored list is the minimal representation of the attribute. Row
/// insertion/removal shifts the intervals the same way the owning column shifts its rows.
///
/// Columns use `IntervalAttribute<bool>` for validity and masking (a covered row is invalid /
/// masked) and `IntervalAttribute<String>` for per-row formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalAttribute<T> {
    entries: Vec<(Interval, T)>,
}

impl<T> Default for IntervalAttribute<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Clone + PartialEq> IntervalAttribute<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give every row in `interval` the value `value`; rows outside keep their previous value.
    pub fn set_value(&mut self, interval: Interval, value: T) {
        self.cut(interval);
        let pos = self
            .entries
            .partition_point(|(iv, _)| iv.start() < interval.start());
        self.entries.insert(pos, (interval, value));
        self.coalesce();
    }

    /// Return every row in `interval` to the unset state.
    pub fn reset(&mut self, interval: Interval) {
        self.cut(interval);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn value(&self, row: usize) -> Option<&T> {
        let idx = self.entries.partition_point(|(iv, _)| iv.end() < row);
        match self.entries.get(idx) {
            Some((iv, value)) if iv.contains(row) => Some(value),
            _ => None,
        }
    }

    pub fn is_set(&self, row: usize) -> bool {
        self.value(row).is_some()
    }

    /// `true` only if every row of `interval` is set.
    pub fn is_set_interval(&self, interval: Interval) -> bool {
        let mut next = interval.start();
        let first = self.entries.partition_point(|(iv, _)| iv.end() < next);
        for (iv, _) in &self.entries[first..] {
            if !iv.contains(next) {
                return false;
            }
            if iv.end() >= interval.end() {
                return true;
            }
            next = iv.end() + 1;
        }
        false
    }

    /// The stored intervals in ascending order.
    pub fn intervals(&self) -> Vec<Interval> {
        self.entries.iter().map(|(iv, _)| *iv).collect()
    }

    pub fn entries(&self) -> &[(Interval, T)] {
        &self.entries
    }

    /// Make room for `count` rows at `before`: intervals at or after `before` move down by `count`
    /// and an interval straddling `before` is split around the new rows.
    pub fn insert_rows(&mut self, before: usize, count: usize) {
        if count == 0 {
            return;
        }
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        for (iv, value) in self.entries.drain(..) {
            if iv.start() >= before {
                out.push((iv.shifted_up(count), value));
            } else if iv.end() >= before {
                out.push((Interval::new(iv.start(), before - 1), value.clone()));
                out.push((Interval::new(before + count, iv.end() + count), value));
            } else {
                out.push((iv, value));
            }
        }
        self.entries = out;
    }

    /// Drop `count` rows starting at `first`; later intervals move up and pieces that become
    /// neighbours are merged again.
    pub fn remove_rows(&mut self, first: usize, count: usize) {
        let Some(removed) = Interval::from_len(first, count) else {
            return;
        };
        let mut out = Vec::with_capacity(self.entries.len());
        for (iv, value) in self.entries.drain(..) {
            let (left, right) = iv.subtract(&removed);
            if let Some(left) = left {
                out.push((left, value.clone()));
            }
            if let Some(right) = right {
                out.push((right.shifted_down(count), value));
            }
        }
        self.entries = out;
        self.coalesce();
    }

    fn cut(&mut self, interval: Interval) {
        if !self.entries.iter().any(|(iv, _)| iv.intersects(&interval)) {
            return;
        }
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        for (iv, value) in self.entries.drain(..) {
            if !iv.intersects(&interval) {
                out.push((iv, value));
                continue;
            }
            let (left, right) = iv.subtract(&interval);
            if let Some(left) = left {
                out.push((left, value.clone()));
            }
            if let Some(right) = right {
                out.push((right, value));
            }
        }
        self.entries = out;
    }

    fn coalesce(&mut self) {
        let mut out: Vec<(Interval, T)> = Vec::with_capacity(self.entries.len());
        for (iv, value) in self.entries.drain(..) {
            if let Some((last, last_value)) = out.last_mut() {
                if *last_value == value && last.end() + 1 == iv.start() {
                    *last = Interval::new(last.start(), iv.end());
                    continue;
                }
            }
            out.push((iv, value));
        }
        self.entries = out;
    }
}

impl IntervalAttribute<bool> {
    /// Flag or unflag every row in `interval`.
    pub fn set(&mut self, interval: Interval, flag: bool) {
        if flag {
            self.set_value(interval, true);
        } else {
            self.reset(interval);
        }
    }
}
