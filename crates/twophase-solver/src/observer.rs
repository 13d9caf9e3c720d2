//! Hooks for displaying intermediate tableaus.
//!
//! The solver reports every tableau it produces, and a short summary at the
//! end of each phase, to a [`TableauObserver`]. Observers only ever receive
//! owned copies, so nothing they do can reach back into the solve.

use crate::tableau::{Phase, PivotPosition, Tableau};

/// An immutable copy of a tableau at one step of the method.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TableauSnapshot {
    /// Caption such as `Initial Tableau` or `Tableau 3`
    pub caption: String,
    pub phase: Phase,
    /// Column labels, RHS last
    pub labels: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    /// The pivot the next step will use, if any
    pub pivot: Option<PivotPosition>,
}

impl TableauSnapshot {
    pub fn capture(caption: impl Into<String>, tableau: &Tableau, pivot: Option<PivotPosition>) -> Self {
        Self {
            caption: caption.into(),
            phase: tableau.phase(),
            labels: tableau.registry().labels().to_vec(),
            rows: tableau.rows().to_vec(),
            pivot,
        }
    }

    /// Whether row `row` is the saved original objective of phase one.
    pub fn is_saved_objective_row(&self, row: usize) -> bool {
        self.phase == Phase::One && row + 1 == self.rows.len()
    }
}

pub trait TableauObserver {
    /// Called once per produced tableau, in order.
    fn snapshot(&mut self, snapshot: TableauSnapshot);

    /// Called with a human-readable line at the end of each phase.
    fn summary(&mut self, _text: &str) {}

    /// Observers that drop everything can skip the cost of copying.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Observer used when nothing is displayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl TableauObserver for NoDisplay {
    fn snapshot(&mut self, _snapshot: TableauSnapshot) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Keeps everything it is shown.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    pub snapshots: Vec<TableauSnapshot>,
    pub summaries: Vec<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captions(&self, phase: Phase) -> Vec<&str> {
        self.snapshots
            .iter()
            .filter(|s| s.phase == phase)
            .map(|s| s.caption.as_str())
            .collect()
    }
}

impl TableauObserver for Recorder {
    fn snapshot(&mut self, snapshot: TableauSnapshot) {
        self.snapshots.push(snapshot);
    }

    fn summary(&mut self, text: &str) {
        self.summaries.push(text.to_string());
    }
}

impl<F> TableauObserver for F
where
    F: FnMut(TableauSnapshot),
{
    fn snapshot(&mut self, snapshot: TableauSnapshot) {
        self(snapshot)
    }
}
